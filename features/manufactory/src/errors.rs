use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::types::{DynError, TypeInfo};

/// Errors when trying to get an instance of a certain type
#[derive(Error, Debug, Clone)]
pub enum GetError {
    /// No recipe produces the requested type
    #[error("No recipe produces '{0}'")]
    TypeMissing(&'static str),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },

    /// A factory failed to build its product
    #[error("Factory for '{product}' failed - error: {error}")]
    FactoryFailed {
        product: &'static str,
        error: Arc<DynError>,
    },
}

/// Configuration errors found while accumulating a component
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("A Type has been registered twice: '{type_info}' - use an override to replace it")]
    Duplicate { type_info: TypeInfo },
}

#[derive(Error, Debug, Clone)]
pub struct ComponentErrors {
    pub component: String,
    pub errors: Vec<ComponentError>,
}
impl fmt::Display for ComponentErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(
            f,
            &format!("Component '{}' had one or more errors:", self.component),
            &self.errors,
        )
    }
}

/// Issues found by the completeness check of a cook book
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletenessError {
    #[error("'{0}' is exported but no recipe produces it")]
    MissingExport(TypeInfo),
    #[error("'{required_by}' needs '{dependency}' but it is missing")]
    MissingDependency {
        dependency: TypeInfo,
        required_by: TypeInfo,
    },
    #[error("A Circular Dependency exists between '{from}' and '{to}' through {chain}")]
    CircularDependency {
        from: TypeInfo,
        to: TypeInfo,
        chain: DependencyChain,
    },
}

#[derive(Error, Debug, Clone)]
pub struct CompletenessErrors {
    pub errors: Vec<CompletenessError>,
}
impl CompletenessErrors {
    pub fn has_cycle(&self) -> bool {
        self.errors
            .iter()
            .any(|error| matches!(error, CompletenessError::CircularDependency { .. }))
    }

    pub fn missing(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.errors.iter().filter_map(|error| match error {
            CompletenessError::MissingExport(missing) => Some(*missing),
            CompletenessError::MissingDependency { dependency, .. } => Some(*dependency),
            CompletenessError::CircularDependency { .. } => None,
        })
    }
}
impl fmt::Display for CompletenessErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, "The cook book had one or more errors:", &self.errors)
    }
}

/// Types along a dependency path, rendered as `A -> B -> A`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChain(pub Vec<TypeInfo>);
impl fmt::Display for DependencyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|info| info.type_name).collect();
        f.write_str(&names.join(" -> "))
    }
}

/// Errors while composing a manufactory
#[derive(Error, Debug, Clone)]
pub enum ComposeError {
    /// The component could not be accumulated
    #[error(transparent)]
    Component(#[from] ComponentErrors),

    /// There are issues with the dependency graph
    #[error(transparent)]
    Incomplete(#[from] CompletenessErrors),

    /// A primary or required recipe failed during startup
    #[error("Activating '{product}' failed: {source}")]
    Activation {
        product: &'static str,
        #[source]
        source: GetError,
    },
}

fn write_list<E: fmt::Display>(f: &mut fmt::Formatter<'_>, header: &str, errors: &[E]) -> fmt::Result {
    let mut display = Vec::with_capacity(errors.len() + 1);
    display.push(header.to_string());
    for error in errors {
        display.push(format!("- {}", error));
    }
    f.write_str(&display.join("\n"))
}
