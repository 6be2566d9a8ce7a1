use std::io;
use std::path::PathBuf;

/// Errors from configuration file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The name was not declared when the config was opened.
    #[error("no config setting named '{0}'")]
    NotFound(String),

    /// Reading or writing the config file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a valid TOML table.
    #[error("invalid config file {}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A declared key holds an array or table instead of a scalar.
    #[error("config setting '{key}' must be a scalar value")]
    NotScalar { key: String },

    /// A value could not be converted to the requested type.
    #[error("config setting '{key}' = '{value}' is invalid: {reason}")]
    Parse {
        key: String,
        value: String,
        reason: String,
    },

    /// The entries could not be rendered as TOML.
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
