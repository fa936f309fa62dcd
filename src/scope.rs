//! Lifecycle policies wrapped around a binding's realization function.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{Injector, Instance, WiringError};

/// How many times a binding is realized, and when.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Scope {
    /// Realized again on every access.
    #[default]
    Transient = 0,
    /// Realized once, on first access.
    Singleton = 1,
    /// Realized once, while the injector is being built.
    EagerSingleton = 2,
}

impl Scope {
    pub const fn name(self) -> &'static str {
        match self {
            Scope::Transient => "Transient",
            Scope::Singleton => "Singleton",
            Scope::EagerSingleton => "EagerSingleton",
        }
    }

    pub fn from_repr(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Scope::Transient),
            1 => Some(Scope::Singleton),
            2 => Some(Scope::EagerSingleton),
            _ => None,
        }
    }

    /// Name of a raw scope value, `"Unknown"` when out of range.
    pub fn describe(raw: u8) -> &'static str {
        Self::from_repr(raw).map_or("Unknown", Self::name)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fallible realization function of a binding.
///
/// The injector is passed at call time rather than captured, so the finished
/// injector never refers to itself.
pub(crate) type Initializer =
    Arc<dyn Fn(&Injector) -> Result<Instance, WiringError> + Send + Sync>;

/// A binding whose realization has been wrapped by its scope.
pub(crate) trait FilledBinding: Send + Sync {
    /// Run the underlying strategy once, bypassing any memoized value.
    fn ok(&self, injector: &Injector) -> Result<(), WiringError>;

    /// Obtain the value, as dictated by the scope.
    fn get(&self, injector: &Injector) -> Result<Instance, WiringError>;

    fn scope(&self) -> Scope;
}

struct TransientBinding {
    initialize: Initializer,
}

impl FilledBinding for TransientBinding {
    fn ok(&self, injector: &Injector) -> Result<(), WiringError> {
        (self.initialize)(injector).map(drop)
    }

    fn get(&self, injector: &Injector) -> Result<Instance, WiringError> {
        (self.initialize)(injector)
    }

    fn scope(&self) -> Scope {
        Scope::Transient
    }
}

/// Singleton and eager singleton share the same cell, only the trigger differs.
struct SingletonBinding {
    scope: Scope,
    cell: OnceCell<Result<Instance, WiringError>>,
    initialize: Initializer,
}

impl FilledBinding for SingletonBinding {
    fn ok(&self, injector: &Injector) -> Result<(), WiringError> {
        (self.initialize)(injector).map(drop)
    }

    fn get(&self, injector: &Injector) -> Result<Instance, WiringError> {
        self.cell
            .get_or_init(|| (self.initialize)(injector))
            .clone()
    }

    fn scope(&self) -> Scope {
        self.scope
    }
}

pub(crate) fn resolve_scope(scope: Scope, initialize: Initializer) -> Box<dyn FilledBinding> {
    match scope {
        Scope::Transient => Box::new(TransientBinding { initialize }),
        Scope::Singleton | Scope::EagerSingleton => Box::new(SingletonBinding {
            scope,
            cell: OnceCell::new(),
            initialize,
        }),
    }
}
