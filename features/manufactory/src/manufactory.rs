use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    component::{Component, ComponentAccumulator},
    cook_book::CookBook,
    errors::{ComposeError, GetError},
    exports::{ExportSet, Exports, Superset},
    runtime::RuntimeManufactory,
    types::Injectable,
};

/// Typed facade over a [RuntimeManufactory]
///
/// `E` is a tuple of the types this facade hands out. Retrieval of anything else is a compile
/// error. Facades are cheap to clone and to narrow, all of them share one runtime and its
/// singleton cache.
///
/// ```rust
/// use std::{convert::Infallible, sync::Arc};
/// use manufactory::{Component, Manufactory};
///
/// struct Logger;
/// struct Storage(Arc<Logger>);
///
/// fn storage(logger: Arc<Logger>) -> Result<Storage, Infallible> {
///     Ok(Storage(logger))
/// }
///
/// let component = Component::accumulator("app")
///     .add_instance(Logger)
///     .add_retained_factory(storage)
///     .build()
///     .unwrap();
///
/// let manufactory = Manufactory::<(Logger, Storage)>::create(&component).unwrap();
/// let logging = manufactory.create_subset_manufactory::<(Logger,), _>();
///
/// let storage: Arc<Storage> = manufactory.get().unwrap();
/// let logger: Arc<Logger> = logging.get().unwrap();
/// assert!(Arc::ptr_eq(&storage.0, &logger));
/// ```
pub struct Manufactory<E: ExportSet> {
    runtime: Arc<RuntimeManufactory>,
    exports: PhantomData<fn() -> E>,
}

impl<E: ExportSet> Manufactory<E> {
    /// Creates a new runtime for the component, failing if any export can not be produced
    pub fn create(component: &Component) -> Result<Self, ComposeError> {
        tracing::debug!(
            "Creating manufactory for component '{}' exporting {} type(s)",
            component.name(),
            E::type_infos().len()
        );

        let cook_book = CookBook::new(component, E::type_infos());
        Ok(Self::with_runtime(RuntimeManufactory::new(cook_book)?))
    }

    /// Builds the accumulated component and creates a manufactory for it
    pub fn compose(accumulator: ComponentAccumulator) -> Result<Self, ComposeError> {
        Self::create(&accumulator.build()?)
    }

    /// Narrows this facade to another export set sharing the same runtime
    pub fn from_superset<Sup, Indices>(superset: &Manufactory<Sup>) -> Self
    where
        Sup: Superset<E, Indices>,
    {
        Self::with_runtime(superset.runtime.clone())
    }

    fn with_runtime(runtime: Arc<RuntimeManufactory>) -> Self {
        Manufactory {
            runtime,
            exports: PhantomData,
        }
    }

    /// Returns the instance of an exported type, constructing it if needed
    pub fn get<T, Index>(&self) -> Result<Arc<T>, GetError>
    where
        T: Injectable,
        E: Exports<T, Index>,
    {
        self.runtime.get::<T>()
    }

    /// A facade restricted to a subset of the exports of this one
    pub fn create_subset_manufactory<Subset, Indices>(&self) -> Manufactory<Subset>
    where
        Subset: ExportSet,
        E: Superset<Subset, Indices>,
    {
        Manufactory::<Subset>::from_superset::<E, Indices>(self)
    }

    pub fn runtime(&self) -> &Arc<RuntimeManufactory> {
        &self.runtime
    }
}

impl<E: ExportSet> Clone for Manufactory<E> {
    fn clone(&self) -> Self {
        Self::with_runtime(self.runtime.clone())
    }
}

impl<E: ExportSet> fmt::Debug for Manufactory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exports: Vec<&str> = E::type_infos().iter().map(|info| info.type_name).collect();

        f.debug_struct("Manufactory")
            .field("exports", &exports)
            .field("runtime", &self.runtime)
            .finish()
    }
}
