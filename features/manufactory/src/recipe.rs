use std::{fmt, sync::Arc};

use crate::{
    errors::GetError,
    factories::Factory,
    runtime::RuntimeManufactory,
    types::{DependencyInfo, Injectable, Instance, TypeInfo},
};

pub(crate) type ConstructFn =
    Arc<dyn Fn(&RuntimeManufactory) -> Result<Instance, GetError> + Send + Sync + 'static>;

/// How long a product lives once constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Constructed once, cached and shared for the life of the manufactory
    Singleton,
    /// Constructed fresh for every request, never cached
    Transient,
}

/// When a singleton is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// While the manufactory is created, before all other types
    Primary,
    /// While the manufactory is created, after the primary types
    Required,
    /// On first request
    OnDemand,
}

pub(crate) enum RecipeSource {
    Factory(ConstructFn),
    Instance(Instance),
}

/// A single "how to produce this type" declaration
///
/// Recipes are shared between components by reference, merging the same recipe twice is not a
/// conflict.
pub struct Recipe {
    info: TypeInfo,
    dependencies: Vec<DependencyInfo>,
    lifetime: Lifetime,
    activation: Activation,
    source: RecipeSource,
}

impl Recipe {
    /// Singleton built while the manufactory is created, before any other
    pub fn primary<Args, F: Factory<Args>>(factory: F) -> Self {
        Self::from_factory(factory, Lifetime::Singleton, Activation::Primary)
    }

    /// Singleton built while the manufactory is created
    pub fn required<Args, F: Factory<Args>>(factory: F) -> Self {
        Self::from_factory(factory, Lifetime::Singleton, Activation::Required)
    }

    /// Singleton built on first request and retained afterwards
    pub fn retained<Args, F: Factory<Args>>(factory: F) -> Self {
        Self::from_factory(factory, Lifetime::Singleton, Activation::OnDemand)
    }

    /// A fresh product for every request
    pub fn transient<Args, F: Factory<Args>>(factory: F) -> Self {
        Self::from_factory(factory, Lifetime::Transient, Activation::OnDemand)
    }

    /// Serves an already existing value
    pub fn instance<T: Injectable>(value: T) -> Self {
        Self::shared_instance(Arc::new(value))
    }

    /// Serves an already existing shared value
    pub fn shared_instance<T: Injectable>(value: Arc<T>) -> Self {
        Recipe {
            info: TypeInfo::of::<T>(),
            dependencies: Vec::new(),
            lifetime: Lifetime::Singleton,
            activation: Activation::OnDemand,
            source: RecipeSource::Instance(Instance::shared(value)),
        }
    }

    fn from_factory<Args, F: Factory<Args>>(
        factory: F,
        lifetime: Lifetime,
        activation: Activation,
    ) -> Self {
        let construct: ConstructFn = Arc::new(move |manufactory: &RuntimeManufactory| {
            factory.construct(manufactory).map(Instance::new)
        });

        Recipe {
            info: TypeInfo::of::<F::Provides>(),
            dependencies: F::dependencies(),
            lifetime,
            activation,
            source: RecipeSource::Factory(construct),
        }
    }

    /// The type this recipe exports
    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub fn dependencies(&self) -> &[DependencyInfo] {
        &self.dependencies
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn is_instance(&self) -> bool {
        matches!(self.source, RecipeSource::Instance(_))
    }

    pub(crate) fn source(&self) -> &RecipeSource {
        &self.source
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependencies: Vec<&str> = self
            .dependencies
            .iter()
            .map(|dependency| dependency.type_info.type_name)
            .collect();

        f.debug_struct("Recipe")
            .field("exports", &self.info.type_name)
            .field("dependencies", &dependencies)
            .field("lifetime", &self.lifetime)
            .field("activation", &self.activation)
            .field("instance", &self.is_instance())
            .finish()
    }
}
