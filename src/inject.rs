use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::binding::Filled;
use crate::*;

/// Type-erased realized value: an `Arc<T>` for the bound type `T`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// The wired object graph.
///
/// Bindings are installed while the [InjectorCreator] builds it; afterwards the
/// injector is read-only and can be shared between threads.
pub struct Injector {
    bindings: HashMap<Key, Filled>,
    order: Vec<Key>,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Obtain the value bound to the target type.
    ///
    /// Return an error if the type is not bound or could not be realized.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, WiringError> {
        self.get_by_key_as(Key::of::<T>())
    }

    /// Obtain the value bound to the target type under the given name.
    pub fn get_named<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &'static str,
    ) -> Result<Arc<T>, WiringError> {
        self.get_by_key_as(Key::named::<T>(name))
    }

    /// Obtain the type-erased value bound to a key.
    pub fn get_by_key(&self, key: Key) -> Result<Instance, WiringError> {
        let filled = self
            .bindings
            .get(&key)
            .ok_or(WiringError::NotFound { key })?;
        let _guard = ResolutionGuard::enter(key)?;
        trace!(%key, scope = %filled.scope(), "resolving");
        filled.binding.get(self)
    }

    /// Obtain the value bound to a key, checking that it holds a `T`.
    pub fn get_by_key_as<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: Key,
    ) -> Result<Arc<T>, WiringError> {
        let instance = self.get_by_key(key)?;
        instance
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(WiringError::TypeMismatch {
                key,
                expected: type_name::<T>(),
            })
    }

    /// Accessors returning `None` instead of an error.
    pub fn lenient(&self) -> Lenient<'_> {
        Lenient(self)
    }

    pub fn contains(&self, key: Key) -> bool {
        self.bindings.contains_key(&key)
    }

    /// Bound keys, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn scope_of(&self, key: Key) -> Option<Scope> {
        self.bindings.get(&key).map(Filled::scope)
    }

    /// Dependencies declared by the strategy bound to a key.
    pub fn dependencies_of(&self, key: Key) -> Option<&[Dependency]> {
        self.bindings.get(&key).map(|f| f.dependencies.as_slice())
    }

    /// Install a filled binding, replacing a previous one for the same key.
    pub(crate) fn set(&mut self, key: Key, filled: Filled) {
        debug!(%key, kind = filled.kind, scope = %filled.scope(), "filled binding");
        if self.bindings.insert(key, filled).is_some() {
            warn!(%key, "binding overridden by a later declaration");
        } else {
            self.order.push(key);
        }
    }

    /// Filled bindings, in declaration order.
    pub(crate) fn bindings(&self) -> impl Iterator<Item = (Key, &Filled)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.bindings.get(key).map(|filled| (*key, filled)))
    }

    /// Run the strategy of a binding once.
    pub(crate) fn check(&self, key: Key, filled: &Filled) -> Result<(), WiringError> {
        let _guard = ResolutionGuard::enter(key)?;
        filled.binding.ok(self)
    }

    /// Check that a binding can be realized without running it.
    pub(crate) fn check_declared(&self, key: Key, filled: &Filled) -> Result<(), WiringError> {
        if !filled.constructible {
            return Err(WiringError::Unconstructible { key });
        }
        match filled
            .dependencies
            .iter()
            .find(|dep| !dep.optional && !self.contains(dep.key))
        {
            Some(dep) => Err(WiringError::UnsatisfiedDependency {
                key,
                dependency: dep.key,
            }),
            None => Ok(()),
        }
    }

    /// Walk the declared dependencies of every binding and reject the first cycle found.
    ///
    /// Only bound keys are followed.
    pub(crate) fn check_acyclic(&self) -> Result<(), WiringError> {
        let mut path = Vec::new();
        let mut done = HashSet::new();
        for key in &self.order {
            self.visit(*key, &mut path, &mut done)?;
        }
        Ok(())
    }

    fn visit(&self, key: Key, path: &mut Vec<Key>, done: &mut HashSet<Key>) -> Result<(), WiringError> {
        if done.contains(&key) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|k| *k == key) {
            return Err(cycle(&path[start..], key));
        }
        let Some(filled) = self.bindings.get(&key) else {
            return Ok(());
        };
        path.push(key);
        for dep in &filled.dependencies {
            trace!(%key, dependency = %dep, "following declared dependency");
            self.visit(dep.key, path, done)?;
        }
        path.pop();
        done.insert(key);
        Ok(())
    }
}

/// Report `path` closed by `key` as "A -> B -> A".
fn cycle(path: &[Key], key: Key) -> WiringError {
    let chain = path
        .iter()
        .chain(std::iter::once(&key))
        .map(Key::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    WiringError::CyclicResolution { chain }
}

/// Silent-miss accessors: errors are discarded and reported as `None`.
pub struct Lenient<'a>(&'a Injector);

impl<'a> Lenient<'a> {
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.get_by_key_as(Key::of::<T>())
    }

    pub fn get_named<T: ?Sized + Send + Sync + 'static>(&self, name: &'static str) -> Option<Arc<T>> {
        self.get_by_key_as(Key::named::<T>(name))
    }

    pub fn get_by_key(&self, key: Key) -> Option<Instance> {
        self.0.get_by_key(key).map_err(discarded).ok()
    }

    pub fn get_by_key_as<T: ?Sized + Send + Sync + 'static>(&self, key: Key) -> Option<Arc<T>> {
        self.0.get_by_key_as(key).map_err(discarded).ok()
    }
}

fn discarded(e: WiringError) {
    debug!(error = %e, "lenient lookup discarded an error");
}

thread_local! {
    static RESOLVING: RefCell<Vec<Key>> = const { RefCell::new(Vec::new()) };
}

/// Marks a key as being resolved on the current thread until dropped.
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(key: Key) -> Result<Self, WiringError> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|k| *k == key) {
                return Err(cycle(&stack[start..], key));
            }
            stack.push(key);
            Ok(ResolutionGuard)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/*
 * The following is used to inject up to 10 parameters into any function
 * inspired by https://nickbryan.co.uk/software/using-a-type-map-for-dependency-injection-in-rust/
 */

/// A Callable has a ```call``` function with a single argument and a single return type.
///
/// This trait is implemented for all functions with up to 10 arguments, using a tuple to
/// wrap them all in a single type.
pub trait Callable<Args, Ret> {
    fn call(&self, args: Args) -> Ret;
}

/// Positional arguments of a constructor, resolved by type.
///
/// This trait is implemented for tuples of [Resolvable] types
pub trait Arguments: Sized {
    fn dependencies() -> Vec<Dependency>;
    fn resolve(injector: &Injector) -> Result<Self, WiringError>;
}

macro_rules! callable_tuple ({ $($param:ident)* } => {
    impl<Func, Ret, $($param,)*> Callable<($($param,)*), Ret> for Func
    where
        Func: Fn($($param),*) -> Ret,
    {
        #[inline]
        #[allow(non_snake_case)]
        fn call(&self, ($($param,)*): ($($param,)*)) -> Ret {
            (self)($($param,)*)
        }
    }

    // Resolve each element of the tuple from its own type
    #[allow(clippy::unused_unit)]
    impl<$($param: Resolvable,)*> Arguments for ($($param,)*) {
        #[inline]
        fn dependencies() -> Vec<Dependency> {
            vec![$($param::dependency(),)*]
        }

        #[inline]
        fn resolve(_injector: &Injector) -> Result<Self, WiringError> {
            Ok(($($param::resolve(_injector, $param::dependency().key)?,)*))
        }
    }
});

callable_tuple! {}
callable_tuple! { A }
callable_tuple! { A B }
callable_tuple! { A B C }
callable_tuple! { A B C D }
callable_tuple! { A B C D E }
callable_tuple! { A B C D E F }
callable_tuple! { A B C D E F G }
callable_tuple! { A B C D E F G H }
callable_tuple! { A B C D E F G H I }
callable_tuple! { A B C D E F G H I J }
