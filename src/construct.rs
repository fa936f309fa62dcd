//! Construction strategies: structural injection and constructor injection.
//!
//! Both produce an [Initializer] resolving its dependencies through the injector
//! passed at realization time.

use std::any::type_name;
use std::sync::Arc;

use tracing::trace;

use crate::inject::{Arguments, Callable};
use crate::scope::Initializer;
use crate::{Dependency, Implements, Injectable, Injector, Instance, Key, WiringError};

/// A realization function together with the dependencies it declares.
pub(crate) struct Strategy {
    pub(crate) source: &'static str,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) realize: Initializer,
}

fn share<T, R>(value: R) -> Instance
where
    T: ?Sized + Send + Sync + 'static,
    R: Implements<T>,
{
    let shared: Arc<T> = <R as Implements<T>>::upcast(Arc::new(value));
    Arc::new(shared)
}

/// Build a fresh `I` and fill its injected fields.
pub(crate) fn by_structure<T, I>() -> Strategy
where
    T: ?Sized + Send + Sync + 'static,
    I: Injectable + Implements<T>,
{
    Strategy {
        source: type_name::<I>(),
        dependencies: I::dependencies(),
        realize: Arc::new(|injector: &Injector| -> Result<Instance, WiringError> {
            trace!(implementation = type_name::<I>(), "structural injection");
            Ok(share::<T, I>(I::inject(injector)?))
        }),
    }
}

/// Call `constructor` with arguments resolved by type, in declared order.
pub(crate) fn by_constructor<T, F, Args, R>(constructor: F) -> Strategy
where
    T: ?Sized + Send + Sync + 'static,
    F: Callable<Args, R> + Send + Sync + 'static,
    Args: Arguments + 'static,
    R: Implements<T>,
{
    Strategy {
        source: type_name::<F>(),
        dependencies: Args::dependencies(),
        realize: Arc::new(move |injector: &Injector| -> Result<Instance, WiringError> {
            trace!(constructor = type_name::<F>(), "constructor injection");
            let args = Args::resolve(injector)?;
            Ok(share::<T, R>(constructor.call(args)))
        }),
    }
}

/// Same as [by_constructor], for constructors reporting their own failures.
pub(crate) fn by_fallible_constructor<T, F, Args, R, E>(key: Key, constructor: F) -> Strategy
where
    T: ?Sized + Send + Sync + 'static,
    F: Callable<Args, Result<R, E>> + Send + Sync + 'static,
    Args: Arguments + 'static,
    R: Implements<T>,
    E: std::error::Error + Send + Sync + 'static,
{
    Strategy {
        source: type_name::<F>(),
        dependencies: Args::dependencies(),
        realize: Arc::new(move |injector: &Injector| -> Result<Instance, WiringError> {
            trace!(constructor = type_name::<F>(), "fallible constructor injection");
            let args = Args::resolve(injector)?;
            match constructor.call(args) {
                Ok(value) => Ok(share::<T, R>(value)),
                Err(e) => Err(WiringError::Construction {
                    key,
                    source: Arc::new(e),
                }),
            }
        }),
    }
}
