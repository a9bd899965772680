use std::{any::type_name, ops::Deref, sync::Arc};

use manufactory::{DependencyInfo, GetError, Injectable, Resolver, RuntimeManufactory};

use crate::provider::ConfigProvider;

/// Factory parameter handing out one registered config value
///
/// Resolving it fetches the [ConfigProvider] from the manufactory and looks the value up by type,
/// synchronously while the factory's other parameters are resolved. The recipe declares a
/// dependency on the provider, so a missing provider fails composition. A provider without the
/// requested value fails the request with [GetError::TypeMissing]. As `Option<Config<T>>` the
/// parameter is `None` when either is absent.
///
/// # Example
/// ```rust
/// use std::{convert::Infallible, sync::Arc};
/// use manufactory::{Component, Manufactory};
/// use manufactory_config::{config::Config, provider::ConfigProvider};
///
/// struct ServerConfig {
///     port: u16,
/// }
///
/// struct Server {
///     port: u16,
/// }
///
/// fn server(config: Config<ServerConfig>) -> Result<Server, Infallible> {
///     Ok(Server { port: config.port })
/// }
///
/// let mut provider = ConfigProvider::new();
/// provider.add_config(ServerConfig { port: 8080 }).unwrap();
///
/// let manufactory = Manufactory::<(Server,)>::compose(
///     Component::accumulator("server")
///         .add_component(&provider.into_component().unwrap())
///         .add_retained_factory(server),
/// )
/// .unwrap();
///
/// let server: Arc<Server> = manufactory.get().unwrap();
/// assert_eq!(server.port, 8080);
/// ```
pub struct Config<T> {
    value: Arc<T>,
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            value: self.value.clone(),
        }
    }
}
impl<T> Config<T> {
    /// The shared config value
    pub fn shared(&self) -> Arc<T> {
        self.value.clone()
    }

    pub fn into_shared(self) -> Arc<T> {
        self.value
    }
}

impl<T: Injectable> Config<T> {
    fn lookup(provider: &ConfigProvider) -> Result<Option<Self>, GetError> {
        let value = provider.get_config::<T>().map_err(|e| GetError::FactoryFailed {
            product: type_name::<T>(),
            error: Arc::new(e.into()),
        })?;

        Ok(value.map(|value| Config { value }))
    }
}

impl<T: Injectable> Resolver for Config<T> {
    fn resolve(manufactory: &RuntimeManufactory) -> Result<Self, GetError> {
        let provider = manufactory.get::<ConfigProvider>()?;
        Self::lookup(&provider)?.ok_or(GetError::TypeMissing(type_name::<T>()))
    }

    fn dependency_info() -> DependencyInfo {
        DependencyInfo::required::<ConfigProvider>()
    }

    fn resolve_optional(manufactory: &RuntimeManufactory) -> Result<Option<Self>, GetError> {
        if !manufactory.produces::<ConfigProvider>() {
            return Ok(None);
        }
        Self::lookup(&*manufactory.get::<ConfigProvider>()?)
    }
}
