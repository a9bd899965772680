use manufactory::TypeInfo;

/// Errors when registering or retrieving a config
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A config of this type is already registered
    #[error("A config of type '{0}' is already registered")]
    AlreadyRegistered(TypeInfo),
    /// The stored config is not of the requested type
    #[error("The config stored for '{0}' has a different type")]
    Mismatch(TypeInfo),
}
