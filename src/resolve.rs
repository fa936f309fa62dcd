//! Traits describing what can be injected, and how.
//!
//! * [Injectable] is implemented by structs built through structural injection: each injected
//!   field is declared as a static [Dependency] and resolved from the [Injector] by its type.
//!   The [injectable!](crate::injectable) macro generates this implementation.
//! * [Resolvable] marks the types that can appear as an injected field or as a constructor
//!   argument: `Arc<T>` requires a binding for `T`, `Option<Arc<T>>` accepts a missing one.
//! * [Implements] links an implementation type to the bound type, usually a trait object.
//!   It is implemented for every sized type towards itself, and by the
//!   [implements!](crate::implements) macro for trait objects.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{Injector, Key};

/// Declared dependency of an injectable type or constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub key: Key,
    pub optional: bool,
}

impl Dependency {
    pub fn of<R: Resolvable>() -> Self {
        R::dependency()
    }

    pub fn named(self, name: &'static str) -> Self {
        Self {
            key: self.key.with_name(name),
            ..self
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{} (optional)", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// A value that can be fetched from the injector.
pub trait Resolvable: Sized {
    /// Describe the dependency under its default (unnamed) key.
    fn dependency() -> Dependency;

    fn resolve(injector: &Injector, key: Key) -> Result<Self, WiringError>;
}

impl<T: ?Sized + Send + Sync + 'static> Resolvable for Arc<T> {
    fn dependency() -> Dependency {
        Dependency {
            key: Key::of::<T>(),
            optional: false,
        }
    }

    fn resolve(injector: &Injector, key: Key) -> Result<Self, WiringError> {
        injector.get_by_key_as(key)
    }
}

impl<T: ?Sized + Send + Sync + 'static> Resolvable for Option<Arc<T>> {
    fn dependency() -> Dependency {
        Dependency {
            key: Key::of::<T>(),
            optional: true,
        }
    }

    fn resolve(injector: &Injector, key: Key) -> Result<Self, WiringError> {
        match injector.get_by_key_as(key) {
            Ok(value) => Ok(Some(value)),
            Err(WiringError::NotFound { key: missing }) if missing == key => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A struct built by structural injection.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Injected fields, in declaration order.
    fn dependencies() -> Vec<Dependency>;

    /// Build a new instance, resolving every injected field from the injector.
    fn inject(injector: &Injector) -> Result<Self, WiringError>;
}

/// Conversion from a shared implementation to the bound type.
pub trait Implements<T: ?Sized>: Send + Sync + 'static {
    fn upcast(this: Arc<Self>) -> Arc<T>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    fn upcast(this: Arc<Self>) -> Arc<T> {
        this
    }
}

/// Errors triggered during the autowiring process
#[derive(Error, Debug, Clone)]
pub enum WiringError {
    #[error("Missing binding: nothing is bound to `{key}`")]
    NotFound { key: Key },
    #[error("Unconstructible binding: `{key}` needs an implementation, a constructor or an instance")]
    Unconstructible { key: Key },
    #[error("Cyclic dependencies: {chain}")]
    CyclicResolution { chain: String },
    #[error("Type mismatch: the binding for `{key}` does not hold a `{expected}`")]
    TypeMismatch { key: Key, expected: &'static str },
    #[error("Construction error: the constructor of `{key}` failed")]
    Construction {
        key: Key,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    #[error("Unsatisfied dependency: `{key}` depends on unbound `{dependency}`")]
    UnsatisfiedDependency { key: Key, dependency: Key },
}

/// Implement [Injectable] for a struct by listing its injected fields.
///
/// Each field is given with its full type, which must be [Resolvable], and optionally
/// with the name of the binding to use. Fields listed after `default:` are not injected
/// and start from `Default::default()`.
///
/// ```
/// # use std::sync::Arc;
/// # use tsunagi::*;
/// trait Clock: Send + Sync {}
///
/// struct Scheduler {
///     clock: Arc<dyn Clock>,
///     backup: Option<Arc<dyn Clock>>,
///     runs: Vec<String>,
/// }
///
/// injectable!(Scheduler { clock: Arc<dyn Clock>, backup: Option<Arc<dyn Clock>> = "backup" }, default: runs);
///
/// assert_eq!(Scheduler::dependencies().len(), 2);
/// ```
#[macro_export]
macro_rules! injectable {
    ($Type:ty { $($field:ident : $Field:ty $(= $name:literal)?),* $(,)? } $(, default: $($plain:ident),+ )?) => {
        impl $crate::Injectable for $Type {
            fn dependencies() -> ::std::vec::Vec<$crate::Dependency> {
                ::std::vec![ $( $crate::Dependency::of::<$Field>() $(.named($name))? ),* ]
            }

            #[allow(unused_variables)]
            fn inject(injector: &$crate::Injector) -> ::std::result::Result<Self, $crate::WiringError> {
                ::std::result::Result::Ok(Self {
                    $( $field: <$Field as $crate::Resolvable>::resolve(
                        injector,
                        $crate::Dependency::of::<$Field>() $(.named($name))? .key,
                    )?, )*
                    $( $( $plain: ::std::default::Default::default(), )+ )?
                })
            }
        }
    };
}

/// Declare that implementation types can be bound to a trait object.
///
/// ```
/// # use tsunagi::*;
/// trait Store: Send + Sync {}
/// struct MemoryStore;
/// impl Store for MemoryStore {}
///
/// implements!(dyn Store => MemoryStore);
/// ```
#[macro_export]
macro_rules! implements {
    ($Trait:ty => $($Concrete:ty),+ $(,)?) => {
        $(
        impl $crate::Implements<$Trait> for $Concrete {
            fn upcast(this: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$Trait> {
                this
            }
        }
        )+
    };
}
