//! Error types for the runtime composition

use std::io;
use std::path::PathBuf;

use bindery_core::ConfigError;
use thiserror::Error;

/// Result type alias for runtime operations
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Errors raised while loading configuration or resolving entries
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The config file could not be read
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        /// File that was parsed
        path: PathBuf,
        /// Parser error
        source: toml::de::Error,
    },

    /// The config could not be written
    #[error("failed to write config file '{}': {source}", .path.display())]
    Write {
        /// File that was written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config parsed but is semantically invalid
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Entry lookup or validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = RuntimeError::Read {
            path: PathBuf::from("/etc/bindery.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/bindery.toml"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: RuntimeError = ConfigError::NotFound {
            alias: "x".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "no configuration entry found for alias 'x'");
    }
}
