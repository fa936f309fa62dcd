use tracing::{debug, info, warn};

use crate::*;

/// A set of binding declarations.
///
/// Implemented for every `Fn(&Binder)`.
pub trait Module {
    fn configure(&self, binder: &Binder);
}

impl<F: Fn(&Binder)> Module for F {
    fn configure(&self, binder: &Binder) {
        self(binder)
    }
}

/// How the bindings are checked before the injector is handed out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Run the strategy of every binding once.
    ///
    /// Transient constructors are therefore called once more than the accesses made
    /// through the injector.
    #[default]
    Dry,
    /// Only check that every binding can be constructed and that its required
    /// dependencies are bound, without running anything.
    ///
    /// In both modes the declared dependencies are walked first, and a cycle among
    /// them aborts the build.
    Static,
}

/// Build an injector from a list of modules.
pub fn create_injector(modules: &[&dyn Module]) -> Result<Injector, WiringError> {
    let binder = Binder::new();
    for module in modules {
        module.configure(&binder);
    }
    build(binder, ValidationMode::default())
}

/// Collect modules and options, then build the injector.
#[derive(Default)]
pub struct InjectorCreator {
    modules: Vec<Box<dyn Module>>,
    validation: ValidationMode,
}

impl InjectorCreator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Configure, fill, validate and eagerly load the bindings.
    ///
    /// The first failure aborts the build and no injector is returned.
    pub fn build(self) -> Result<Injector, WiringError> {
        let binder = Binder::new();
        for module in &self.modules {
            module.configure(&binder);
        }
        build(binder, self.validation)
    }
}

fn build(binder: Binder, validation: ValidationMode) -> Result<Injector, WiringError> {
    let bindings = binder.into_bindings();
    debug!(count = bindings.len(), "configured bindings");

    let mut injector = Injector::new();
    for binding in &bindings {
        debug!(key = %binding.key, source = binding.source(), "filling binding");
        injector.set(binding.key, binding.fill());
    }

    if let Err(e) = injector.check_acyclic() {
        warn!(error = %e, "declared dependencies form a cycle");
        return Err(e);
    }

    for (key, filled) in injector.bindings() {
        let checked = match validation {
            ValidationMode::Dry => injector.check(key, filled),
            ValidationMode::Static => injector.check_declared(key, filled),
        };
        if let Err(e) = checked {
            warn!(%key, error = %e, "binding validation failed");
            return Err(e);
        }
    }

    load_eager_singletons(&injector)?;

    info!(bindings = injector.len(), ?validation, "injector ready");
    Ok(injector)
}

fn load_eager_singletons(injector: &Injector) -> Result<(), WiringError> {
    for (key, filled) in injector.bindings() {
        if filled.scope() == Scope::EagerSingleton {
            injector.get_by_key(key)?;
        }
    }
    Ok(())
}
