use std::{any::type_name, sync::Arc};

use crate::{
    errors::GetError,
    resolver::Resolver,
    runtime::RuntimeManufactory,
    types::{DependencyInfo, DynError, Injectable},
};

/// A callable producing instances of a given type
///
/// Implemented for every `Fn(A, B, ...) -> Result<Product, E>` whose parameters are [Resolver]s,
/// the parameter types become the dependencies of the recipe.
///
/// ```rust
/// use std::{convert::Infallible, sync::Arc};
/// # struct Logger;
/// # struct Storage { logger: Arc<Logger> }
///
/// fn storage(logger: Arc<Logger>) -> Result<Storage, Infallible> {
///     Ok(Storage { logger })
/// }
///
/// let recipe = manufactory::Recipe::required(storage);
/// assert_eq!(recipe.dependencies().len(), 1);
/// ```
pub trait Factory<Args>: Send + Sync + 'static {
    type Provides: Injectable;

    /// Returns a list of dependencies the factory requires to supply it's type
    fn dependencies() -> Vec<DependencyInfo>;

    /// Resolves all parameters from the manufactory and invokes the factory
    fn construct(&self, manufactory: &RuntimeManufactory) -> Result<Self::Provides, GetError>;
}

macro_rules! impl_factory {
    ($($Arg:ident),*) => {
        impl<Fun, Product, Error, $($Arg,)*> Factory<($($Arg,)*)> for Fun
        where
            Fun: Fn($($Arg),*) -> Result<Product, Error> + Send + Sync + 'static,
            Product: Injectable,
            Error: Into<DynError>,
            $($Arg: Resolver,)*
        {
            type Provides = Product;

            fn dependencies() -> Vec<DependencyInfo> {
                vec![$($Arg::dependency_info()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn construct(&self, manufactory: &RuntimeManufactory) -> Result<Product, GetError> {
                $(let $Arg = $Arg::resolve(manufactory)?;)*

                (self)($($Arg),*).map_err(|error| GetError::FactoryFailed {
                    product: type_name::<Product>(),
                    error: Arc::new(error.into()),
                })
            }
        }
    };
}

impl_factory!();
impl_factory!(A1);
impl_factory!(A1, A2);
impl_factory!(A1, A2, A3);
impl_factory!(A1, A2, A3, A4);
impl_factory!(A1, A2, A3, A4, A5);
impl_factory!(A1, A2, A3, A4, A5, A6);
impl_factory!(A1, A2, A3, A4, A5, A6, A7);
impl_factory!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_factory!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_factory!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
