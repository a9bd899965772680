use crate::{errors::GetError, runtime::RuntimeManufactory, types::DependencyInfo};

pub mod arc;

/// A factory parameter which can be produced by a [RuntimeManufactory]
///
/// Implemented for `Arc<T>` and `Option<R>` here, other crates add their own wrappers.
pub trait Resolver: Sized {
    fn resolve(manufactory: &RuntimeManufactory) -> Result<Self, GetError>;

    /// Declares what the parameter needs so the cook book can be checked before construction
    fn dependency_info() -> DependencyInfo;

    /// Resolves the parameter if it is available, used for `Option<R>` parameters
    ///
    /// `None` means nothing produces the declared dependency. Failures of an existing producer are
    /// returned as errors.
    fn resolve_optional(manufactory: &RuntimeManufactory) -> Result<Option<Self>, GetError> {
        if !manufactory.has_recipe(Self::dependency_info().type_info) {
            return Ok(None);
        }
        Self::resolve(manufactory).map(Some)
    }
}
