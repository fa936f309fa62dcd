use std::sync::Arc;

use crate::construct::Strategy;
use crate::scope::{resolve_scope, FilledBinding, Initializer};
use crate::{Dependency, Injector, Instance, Key, Scope, WiringError};

/// How a binding produces its value.
pub(crate) enum BindingKind {
    /// Structural injection of the bound type itself, if it is injectable.
    Untargetted(Option<Strategy>),
    /// Structural injection of an implementation type.
    Linked(Strategy),
    /// Call of a constructor function.
    Constructor(Strategy),
    /// A fixed value.
    Instance(Instance),
}

impl BindingKind {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            BindingKind::Untargetted(_) => "untargetted",
            BindingKind::Linked(_) => "linked",
            BindingKind::Constructor(_) => "constructor",
            BindingKind::Instance(_) => "instance",
        }
    }

    fn strategy(&self) -> Option<&Strategy> {
        match self {
            BindingKind::Untargetted(strategy) => strategy.as_ref(),
            BindingKind::Linked(strategy) | BindingKind::Constructor(strategy) => Some(strategy),
            BindingKind::Instance(_) => None,
        }
    }
}

/// Binding record under construction in the binder.
///
/// The key is fixed at creation, the kind and scope can be replaced until the build.
pub(crate) struct Binding {
    pub(crate) key: Key,
    pub(crate) scope: Scope,
    pub(crate) kind: BindingKind,
}

impl Binding {
    pub(crate) fn untargetted(key: Key, strategy: Option<Strategy>) -> Self {
        Self {
            key,
            scope: Scope::default(),
            kind: BindingKind::Untargetted(strategy),
        }
    }

    pub(crate) fn source(&self) -> &'static str {
        self.kind
            .strategy()
            .map_or_else(|| self.key.type_name(), |s| s.source)
    }

    /// Wrap the realization function in the scope of this binding.
    ///
    /// Nothing is evaluated here: the returned binding runs its strategy when validated or accessed.
    pub(crate) fn fill(&self) -> Filled {
        let key = self.key;
        let (initialize, dependencies, constructible): (Initializer, _, _) = match &self.kind {
            BindingKind::Instance(instance) => {
                let instance = instance.clone();
                let initialize = move |_: &Injector| -> Result<Instance, WiringError> {
                    Ok(instance.clone())
                };
                (Arc::new(initialize) as Initializer, Vec::new(), true)
            }
            BindingKind::Untargetted(None) => (
                Arc::new(move |_: &Injector| -> Result<Instance, WiringError> {
                    Err(WiringError::Unconstructible { key })
                }) as Initializer,
                Vec::new(),
                false,
            ),
            BindingKind::Untargetted(Some(strategy))
            | BindingKind::Linked(strategy)
            | BindingKind::Constructor(strategy) => {
                (strategy.realize.clone(), strategy.dependencies.clone(), true)
            }
        };

        Filled {
            kind: self.kind.label(),
            dependencies,
            constructible,
            binding: resolve_scope(self.scope, initialize),
        }
    }
}

/// A binding installed in the injector.
pub(crate) struct Filled {
    pub(crate) kind: &'static str,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) constructible: bool,
    pub(crate) binding: Box<dyn FilledBinding>,
}

impl Filled {
    pub(crate) fn scope(&self) -> Scope {
        self.binding.scope()
    }
}
