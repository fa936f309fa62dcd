use std::any::type_name;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::binding::{Binding, BindingKind};
use crate::construct::{by_constructor, by_fallible_constructor, by_structure};
use crate::inject::{Arguments, Callable};
use crate::*;

/// Ordered collection of binding declarations.
///
/// Declarations are appended under a lock, so a binder can be shared while configuring.
#[derive(Default)]
pub struct Binder {
    bindings: Mutex<Vec<Binding>>,
}

impl Binder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Declare a binding for the target type.
    ///
    /// Until it is linked to an implementation, a constructor or an instance,
    /// the binding cannot be realized.
    pub fn bind<T: ?Sized + Send + Sync + 'static>(&self) -> BindingBuilder<'_, T> {
        self.declare(Binding::untargetted(Key::of::<T>(), None))
    }

    /// Declare a binding for the target type under a name.
    pub fn bind_named<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &'static str,
    ) -> BindingBuilder<'_, T> {
        self.declare(Binding::untargetted(Key::named::<T>(name), None))
    }

    /// Declare a binding for an injectable struct, built from its own injected fields.
    pub fn bind_concrete<T: Injectable>(&self) -> BindingBuilder<'_, T> {
        self.declare(Binding::untargetted(
            Key::of::<T>(),
            Some(by_structure::<T, T>()),
        ))
    }

    fn declare<T: ?Sized>(&self, binding: Binding) -> BindingBuilder<'_, T> {
        let key = binding.key;
        let mut bindings = self.lock();
        bindings.push(binding);
        let position = bindings.len() - 1;
        debug!(%key, position, "declared binding");
        BindingBuilder {
            binder: self,
            position,
            key,
            target: PhantomData,
        }
    }

    fn update(&self, position: usize, f: impl FnOnce(&mut Binding)) {
        if let Some(binding) = self.lock().get_mut(position) {
            f(binding);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Binding>> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn into_bindings(self) -> Vec<Binding> {
        self.bindings
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Configure the binding declared at one position of the binder.
///
/// Every call rewrites the same record, so calls can be chained in any order.
pub struct BindingBuilder<'a, T: ?Sized> {
    binder: &'a Binder,
    position: usize,
    key: Key,
    target: PhantomData<fn() -> Arc<T>>,
}

impl<'a, T: ?Sized + Send + Sync + 'static> BindingBuilder<'a, T> {
    /// Build the value by structural injection of an implementation type.
    pub fn to<I: Injectable + Implements<T>>(self) -> Self {
        debug!(key = %self.key, implementation = type_name::<I>(), "linked binding");
        self.set_kind(BindingKind::Linked(by_structure::<T, I>()))
    }

    /// Build the value by calling a constructor, its arguments resolved by type.
    pub fn to_constructor<F, Args, R>(self, constructor: F) -> Self
    where
        F: Callable<Args, R> + Send + Sync + 'static,
        Args: Arguments + 'static,
        R: Implements<T>,
    {
        self.set_kind(BindingKind::Constructor(by_constructor::<T, F, Args, R>(
            constructor,
        )))
    }

    /// Build the value by calling a constructor that may fail.
    pub fn to_fallible_constructor<F, Args, R, E>(self, constructor: F) -> Self
    where
        F: Callable<Args, Result<R, E>> + Send + Sync + 'static,
        Args: Arguments + 'static,
        R: Implements<T>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let strategy = by_fallible_constructor::<T, F, Args, R, E>(self.key, constructor);
        self.set_kind(BindingKind::Constructor(strategy))
    }

    /// Always provide the same value.
    pub fn to_instance(self, instance: Arc<T>) -> Self {
        self.set_kind(BindingKind::Instance(Arc::new(instance)))
    }

    pub fn in_scope(self, scope: Scope) -> Self {
        self.binder.update(self.position, |binding| binding.scope = scope);
        self
    }

    pub fn as_eager_singleton(self) -> Self {
        self.in_scope(Scope::EagerSingleton)
    }

    fn set_kind(self, kind: BindingKind) -> Self {
        self.binder.update(self.position, |binding| binding.kind = kind);
        self
    }
}
