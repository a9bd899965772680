use std::{
    any::TypeId,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    errors::{ComponentError, ComponentErrors},
    factories::Factory,
    recipe::Recipe,
    types::{Injectable, TypeInfo},
};

//////////////////////////////////////////////////////////////////////
///
/// Composition consists of three Parts.
/// 1. Components, where each module registers the recipes for the types it produces
/// 2. The CookBook, merging the components and checking them for completeness
/// 3. The Manufactory, constructing the types on demand

/// A named, ordered collection of recipes with at most one recipe per type
#[derive(Clone)]
pub struct Component {
    name: String,
    recipes: Vec<Arc<Recipe>>,
}

impl Component {
    /// Starts accumulating a new component
    pub fn accumulator(name: impl Into<String>) -> ComponentAccumulator {
        ComponentAccumulator::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Types produced by this component, in registration order
    pub fn exports(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.recipes.iter().map(|recipe| recipe.info())
    }

    /// Types this component depends on without producing them itself
    pub fn imports(&self) -> Vec<TypeInfo> {
        let exported: HashSet<TypeId> = self.exports().map(|info| info.type_id).collect();
        let mut seen = HashSet::new();

        self.recipes
            .iter()
            .flat_map(|recipe| recipe.dependencies().iter())
            .map(|dependency| dependency.type_info)
            .filter(|info| !exported.contains(&info.type_id))
            .filter(|info| seen.insert(info.type_id))
            .collect()
    }

    pub fn recipes(&self) -> &[Arc<Recipe>] {
        &self.recipes
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("recipes", &self.recipes)
            .finish()
    }
}

/// Collects recipes from factories, instances and other components
///
/// Duplicate exporters are recorded and reported by [ComponentAccumulator::build],
/// use the `override_*` functions to replace a recipe on purpose.
pub struct ComponentAccumulator {
    name: String,
    /// Recipes in registration order
    recipes: Vec<Arc<Recipe>>,
    /// Position of each exported type in `recipes`
    positions: HashMap<TypeId, usize>,
    errors: Vec<ComponentError>,
}

impl ComponentAccumulator {
    pub fn new(name: impl Into<String>) -> Self {
        ComponentAccumulator {
            name: name.into(),
            recipes: Vec::new(),
            positions: HashMap::new(),
            errors: Vec::new(),
        }
    }
}

impl ComponentAccumulator {
    pub fn add_primary_factory<Args, F: Factory<Args>>(self, factory: F) -> Self {
        self.add_recipe(Recipe::primary(factory))
    }

    pub fn add_required_factory<Args, F: Factory<Args>>(self, factory: F) -> Self {
        self.add_recipe(Recipe::required(factory))
    }

    pub fn add_retained_factory<Args, F: Factory<Args>>(self, factory: F) -> Self {
        self.add_recipe(Recipe::retained(factory))
    }

    pub fn add_transient_factory<Args, F: Factory<Args>>(self, factory: F) -> Self {
        self.add_recipe(Recipe::transient(factory))
    }

    pub fn add_instance<T: Injectable>(self, instance: T) -> Self {
        self.add_recipe(Recipe::instance(instance))
    }

    pub fn add_shared_instance<T: Injectable>(self, instance: Arc<T>) -> Self {
        self.add_recipe(Recipe::shared_instance(instance))
    }

    pub fn add_recipe(mut self, recipe: impl Into<Arc<Recipe>>) -> Self {
        self.insert(recipe.into(), false);
        self
    }

    /// Replaces the recipe for the same type, or adds it if there is none yet
    pub fn override_recipe(mut self, recipe: impl Into<Arc<Recipe>>) -> Self {
        self.insert(recipe.into(), true);
        self
    }

    /// Merges all recipes of another component
    pub fn add_component(mut self, component: &Component) -> Self {
        for recipe in &component.recipes {
            self.insert(recipe.clone(), false);
        }
        self
    }

    /// Merges all recipes of another component, its recipes win over already registered ones
    pub fn override_component(mut self, component: &Component) -> Self {
        for recipe in &component.recipes {
            self.insert(recipe.clone(), true);
        }
        self
    }

    pub fn build(self) -> Result<Component, ComponentErrors> {
        if !self.errors.is_empty() {
            tracing::warn!(
                "Component '{}' has {} configuration error(s)",
                self.name,
                self.errors.len()
            );
            return Err(ComponentErrors {
                component: self.name,
                errors: self.errors,
            });
        }

        tracing::debug!(
            "Built component '{}' with {} recipes",
            self.name,
            self.recipes.len()
        );

        Ok(Component {
            name: self.name,
            recipes: self.recipes,
        })
    }

    fn insert(&mut self, recipe: Arc<Recipe>, replace: bool) {
        let info = recipe.info();

        let Some(&position) = self.positions.get(&info.type_id) else {
            tracing::debug!("Component '{}' registers {}", self.name, info.type_name);
            self.positions.insert(info.type_id, self.recipes.len());
            self.recipes.push(recipe);
            return;
        };

        if replace {
            tracing::debug!("Component '{}' overrides {}", self.name, info.type_name);
            self.recipes[position] = recipe;
        } else if !Arc::ptr_eq(&self.recipes[position], &recipe) {
            tracing::error!(
                "Component '{}' received a second recipe for {}",
                self.name,
                info.type_name
            );
            self.errors.push(ComponentError::Duplicate { type_info: info });
        }
        // Otherwise the very same recipe arrived through another component
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    struct Logger;
    struct Storage(#[allow(dead_code)] Arc<Logger>);
    struct Metrics;

    fn logger() -> Result<Logger, Infallible> {
        Ok(Logger)
    }

    fn storage(logger: Arc<Logger>) -> Result<Storage, Infallible> {
        Ok(Storage(logger))
    }

    fn names(component: &Component) -> Vec<&'static str> {
        component.exports().map(|info| info.type_name).collect()
    }

    #[test]
    fn merging_disjoint_components_yields_the_union() {
        let logging = Component::accumulator("logging")
            .add_required_factory(logger)
            .build()
            .unwrap();
        let storage = Component::accumulator("storage")
            .add_required_factory(storage)
            .add_instance(Metrics)
            .build()
            .unwrap();

        let merged = Component::accumulator("app")
            .add_component(&storage)
            .add_component(&logging)
            .build()
            .unwrap();

        let mut exports = names(&merged);
        exports.sort_unstable();
        let mut expected = vec![
            TypeInfo::of::<Logger>().type_name,
            TypeInfo::of::<Storage>().type_name,
            TypeInfo::of::<Metrics>().type_name,
        ];
        expected.sort_unstable();
        assert_eq!(exports, expected);
        assert!(merged.imports().is_empty());
        assert_eq!(storage.imports(), vec![TypeInfo::of::<Logger>()]);
    }

    #[test]
    fn duplicate_exporters_fail() {
        let result = Component::accumulator("twice")
            .add_required_factory(logger)
            .add_instance(Logger)
            .build();

        let errors = result.unwrap_err();
        assert_eq!(errors.component, "twice");
        assert_eq!(
            errors.errors,
            vec![ComponentError::Duplicate {
                type_info: TypeInfo::of::<Logger>()
            }]
        );
    }

    #[test]
    fn overlapping_components_fail_without_override() {
        let first = Component::accumulator("first")
            .add_instance(Logger)
            .build()
            .unwrap();
        let second = Component::accumulator("second")
            .add_required_factory(logger)
            .build()
            .unwrap();

        let result = Component::accumulator("app")
            .add_component(&first)
            .add_component(&second)
            .build();
        assert!(result.is_err());

        let overridden = Component::accumulator("app")
            .add_component(&first)
            .override_component(&second)
            .build()
            .unwrap();
        assert_eq!(overridden.recipes().len(), 1);
        assert!(!overridden.recipes()[0].is_instance());
    }

    #[test]
    fn override_keeps_the_registration_position() {
        let component = Component::accumulator("app")
            .add_instance(Logger)
            .add_instance(Metrics)
            .override_recipe(Recipe::required(logger))
            .build()
            .unwrap();

        assert_eq!(
            names(&component),
            vec![
                TypeInfo::of::<Logger>().type_name,
                TypeInfo::of::<Metrics>().type_name
            ]
        );
        assert!(!component.recipes()[0].is_instance());
    }

    #[test]
    fn the_same_component_can_be_merged_twice() {
        let logging = Component::accumulator("logging")
            .add_required_factory(logger)
            .build()
            .unwrap();
        let storage = Component::accumulator("storage")
            .add_component(&logging)
            .add_required_factory(storage)
            .build()
            .unwrap();

        let app = Component::accumulator("app")
            .add_component(&logging)
            .add_component(&storage)
            .build()
            .unwrap();

        assert_eq!(app.recipes().len(), 2);
    }
}
