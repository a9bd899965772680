//! Manufactory composes an application out of components
//!
//! Every module contributes a [Component]: a named set of [Recipe]s, each declaring how to produce
//! one type from the types its factory takes as parameters. Components are merged with a
//! [ComponentAccumulator], checked for missing and circular dependencies as a [CookBook], and
//! finally turned into a [RuntimeManufactory] which constructs the products on demand.
//!
//! Applications only talk to a [Manufactory], a facade that is typed by the tuple of types it
//! exports. Parts of the application can be handed a narrower facade over the same runtime.
//!
//! ```rust
//! use std::{convert::Infallible, sync::Arc};
//! use manufactory::{Component, Manufactory};
//!
//! struct Logger;
//! struct Storage {
//!     logger: Arc<Logger>,
//! }
//! struct Service {
//!     storage: Arc<Storage>,
//! }
//!
//! fn storage(logger: Arc<Logger>) -> Result<Storage, Infallible> {
//!     Ok(Storage { logger })
//! }
//!
//! fn service(storage: Arc<Storage>) -> Result<Service, Infallible> {
//!     Ok(Service { storage })
//! }
//!
//! let logging = Component::accumulator("logging")
//!     .add_required_factory(|| Ok::<_, Infallible>(Logger))
//!     .build()
//!     .unwrap();
//!
//! let manufactory = Manufactory::<(Service,)>::compose(
//!     Component::accumulator("app")
//!         .add_component(&logging)
//!         .add_retained_factory(storage)
//!         .add_retained_factory(service),
//! )
//! .unwrap();
//!
//! let service: Arc<Service> = manufactory.get().unwrap();
//! let _logger = &service.storage.logger;
//! ```

pub mod component;
pub mod cook_book;
pub mod errors;
pub mod exports;
pub mod factories;
pub mod manufactory;
pub mod recipe;
pub mod resolver;
pub mod runtime;
pub mod types;

pub use component::{Component, ComponentAccumulator};
pub use cook_book::CookBook;
pub use errors::{
    CompletenessError, CompletenessErrors, ComponentError, ComponentErrors, ComposeError,
    DependencyChain, GetError,
};
pub use exports::{At, ExportSet, Exports, Superset};
pub use factories::Factory;
pub use manufactory::Manufactory;
pub use recipe::{Activation, Lifetime, Recipe};
pub use resolver::Resolver;
pub use runtime::RuntimeManufactory;
pub use types::{DependencyInfo, DynError, Injectable, Instance, TypeInfo};
