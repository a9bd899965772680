use std::{any::TypeId, collections::HashMap, sync::Arc};

use crate::{
    component::Component,
    errors::{CompletenessError, CompletenessErrors, DependencyChain},
    recipe::{Activation, Recipe},
    types::TypeInfo,
};

/// All recipes of one composition together with the types it must be able to produce
///
/// Used to check for missing and circular dependencies before anything is constructed.
#[derive(Clone)]
pub struct CookBook {
    recipes: HashMap<TypeId, Arc<Recipe>>,
    /// Exported types in registration order
    order: Vec<TypeId>,
    required_exports: Vec<TypeInfo>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Complete,
}

impl CookBook {
    pub fn new(component: &Component, required_exports: Vec<TypeInfo>) -> Self {
        let mut recipes = HashMap::with_capacity(component.recipes().len());
        let mut order = Vec::with_capacity(component.recipes().len());

        // Components never hold two recipes for one type
        for recipe in component.recipes() {
            let type_id = recipe.info().type_id;
            order.push(type_id);
            recipes.insert(type_id, recipe.clone());
        }

        CookBook {
            recipes,
            order,
            required_exports,
        }
    }

    pub fn recipe(&self, type_id: &TypeId) -> Option<&Arc<Recipe>> {
        self.recipes.get(type_id)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Arc<Recipe>> + '_ {
        self.order.iter().filter_map(|type_id| self.recipes.get(type_id))
    }

    pub fn required_exports(&self) -> &[TypeInfo] {
        &self.required_exports
    }

    /// Recipes with the given activation, in registration order
    pub(crate) fn activated(&self, activation: Activation) -> impl Iterator<Item = &Arc<Recipe>> + '_ {
        self.recipes()
            .filter(move |recipe| recipe.activation() == activation && !recipe.is_instance())
    }

    pub fn is_complete(&self) -> bool {
        self.check_completeness().is_ok()
    }

    /// Validate the cook book
    ///
    /// Every required export needs a recipe. Then every recipe is walked through its declared
    /// dependencies, so anything `get` can reach is free of gaps and cycles. Each type is visited
    /// once, a type met again while still in progress closes a cycle. Returns a list of all issues.
    pub fn check_completeness(&self) -> Result<(), CompletenessErrors> {
        let mut states = HashMap::with_capacity(self.recipes.len());
        let mut errors = Vec::new();

        for export in &self.required_exports {
            if !self.recipes.contains_key(&export.type_id) {
                errors.push(CompletenessError::MissingExport(*export));
            }
        }

        for root in self.recipes() {
            let mut dependency_chain = Vec::new();
            self.visit(root, &mut states, &mut errors, &mut dependency_chain);
        }

        if !errors.is_empty() {
            tracing::error!("Cook book is incomplete: {} issue(s)", errors.len());
            self.log_dependencies();
            return Err(CompletenessErrors { errors });
        }

        Ok(())
    }

    fn visit(
        &self,
        recipe: &Recipe,
        states: &mut HashMap<TypeId, VisitState>,
        errors: &mut Vec<CompletenessError>,
        dependency_chain: &mut Vec<TypeInfo>,
    ) {
        let info = recipe.info();

        match states.get(&info.type_id) {
            Some(VisitState::Complete) => return,
            Some(VisitState::InProgress) => {
                // The chain holds `info` already, cut it down to the cycle itself
                let start = dependency_chain
                    .iter()
                    .position(|entry| *entry == info)
                    .unwrap_or(0);
                let mut chain = dependency_chain[start..].to_vec();
                chain.push(info);

                errors.push(CompletenessError::CircularDependency {
                    from: *dependency_chain.last().unwrap_or(&info),
                    to: info,
                    chain: DependencyChain(chain),
                });
                return;
            }
            None => {}
        }

        states.insert(info.type_id, VisitState::InProgress);
        dependency_chain.push(info);

        for dependency in recipe.dependencies() {
            let Some(next) = self.recipes.get(&dependency.type_info.type_id) else {
                if !dependency.optional {
                    errors.push(CompletenessError::MissingDependency {
                        dependency: dependency.type_info,
                        required_by: info,
                    });
                }
                continue;
            };

            self.visit(next, states, errors, dependency_chain);
        }

        dependency_chain.pop();
        states.insert(info.type_id, VisitState::Complete);
    }

    /// Log each recipe and its dependencies
    pub fn log_dependencies(&self) {
        for recipe in self.recipes() {
            tracing::info!("recipe: {}", recipe.info());
            for dependency in recipe.dependencies() {
                tracing::info!(
                    "  dependency: {}{}",
                    dependency.type_info,
                    if dependency.optional { " (optional)" } else { "" }
                );
            }
        }
    }
}

impl std::fmt::Debug for CookBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookBook")
            .field("recipes", &self.recipes().collect::<Vec<_>>())
            .field("required_exports", &self.required_exports)
            .finish()
    }
}
