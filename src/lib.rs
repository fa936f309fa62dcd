//! Dependency injection container with declarative bindings and scoped lifecycles.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use tsunagi::*;
//! // Define traits and implementors
//! trait MyTrait: Send + Sync {
//!     fn cheers(&self) -> String;
//! }
//!
//! struct MyImpl;
//!
//! impl MyTrait for MyImpl {
//!     fn cheers(&self) -> String {
//!         "Hello world".to_string()
//!     }
//! }
//!
//! // Declare the injected fields (none here) and the trait link
//! injectable!(MyImpl {});
//! implements!(dyn MyTrait => MyImpl);
//!
//! # fn main() -> Result<(), WiringError> {
//! // Declare the bindings and build the injector
//! let injector = InjectorCreator::new()
//!     .install(|binder: &Binder| {
//!         binder.bind::<dyn MyTrait>().to::<MyImpl>().in_scope(Scope::Singleton);
//!     })
//!     .build()?;
//!
//! let a: Arc<dyn MyTrait> = injector.get()?;
//! assert_eq!(a.cheers(), "Hello world");
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! Bindings are keyed by a [Key] derived from the bound type (the referent type: `Arc<dyn T>`
//! and `dyn T` share a key). Each binding uses one strategy to produce its value:
//!
//! * untargetted: structural injection of the bound type itself ([Binder::bind_concrete]),
//! * linked: structural injection of an implementation type ([BindingBuilder::to]),
//! * constructor: a function whose arguments are resolved by type ([BindingBuilder::to_constructor]),
//! * instance: a fixed value ([BindingBuilder::to_instance]).
//!
//! The strategy is wrapped in a [Scope]: transient values are rebuilt on every access,
//! singletons are built once on first access, eager singletons are built once during the build.
//!
//! The [InjectorCreator] runs the modules against a [Binder], installs every binding in a new
//! [Injector], validates them (see [ValidationMode]) and loads the eager singletons.
//! Any failure aborts the build, including a cycle among the declared dependencies.

mod binder;
mod binding;
mod construct;
mod creator;
mod inject;
mod key;
mod resolve;
mod scope;

pub use binder::{Binder, BindingBuilder};
pub use creator::{create_injector, InjectorCreator, Module, ValidationMode};
pub use inject::{Arguments, Callable, Injector, Instance, Lenient};
pub use key::{Key, Pointer};
pub use resolve::{Dependency, Implements, Injectable, Resolvable, WiringError};
pub use scope::Scope;
