//! Error types for bindery
//!
//! This module defines the error types shared by the store, the publisher
//! and the runtime. We use `thiserror` for automatic `Display` and `Error`
//! trait implementations.
//!
//! Configuration errors are deterministic: they describe a misconfigured
//! entry and are never retried. Registry errors describe the outcome of a
//! call into the external registry; [`RegistryError::Invalidated`] is the
//! benign "already gone" race that callers of the publisher never see.

use thiserror::Error;

/// Result type alias for bindery operations
pub type BinderyResult<T> = std::result::Result<T, BinderyError>;

/// Errors raised while resolving or validating a configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No entry is mapped under the alias
    #[error("no configuration entry found for alias '{alias}'")]
    NotFound {
        /// Alias that was looked up
        alias: String,
    },

    /// The alias is known but the entry behind it is not available
    #[error("configuration entry for alias '{alias}' is not available")]
    Unavailable {
        /// Alias whose entry is missing
        alias: String,
    },

    /// Two attributes that cannot be combined are both set
    #[error(
        "configuration entry '{alias}' sets both '{attribute}' and '{conflicting}', which are mutually exclusive"
    )]
    MutuallyExclusiveAttributes {
        /// Alias of the offending entry
        alias: String,
        /// Attribute from the primary identity path
        attribute: String,
        /// Attribute from the alternate identity path
        conflicting: String,
    },

    /// A required attribute is missing or blank
    #[error("configuration entry '{alias}' is incomplete: attribute '{attribute}' is missing or blank")]
    IncompleteConfiguration {
        /// Alias of the offending entry
        alias: String,
        /// Attribute that is missing or blank
        attribute: String,
    },

    /// The password carries an encoding prefix we cannot decode
    #[error("configuration entry '{alias}' uses unsupported password encoding '{algorithm}'")]
    UnsupportedPasswordEncoding {
        /// Alias of the offending entry
        alias: String,
        /// Encoding name found between the braces
        algorithm: String,
    },

    /// The password payload is malformed for its encoding
    #[error("configuration entry '{alias}' has a malformed encoded password: {reason}")]
    InvalidPasswordEncoding {
        /// Alias of the offending entry
        alias: String,
        /// Decoder message
        reason: String,
    },
}

impl ConfigError {
    /// Alias the error refers to
    pub fn alias(&self) -> &str {
        match self {
            ConfigError::NotFound { alias }
            | ConfigError::Unavailable { alias }
            | ConfigError::MutuallyExclusiveAttributes { alias, .. }
            | ConfigError::IncompleteConfiguration { alias, .. }
            | ConfigError::UnsupportedPasswordEncoding { alias, .. }
            | ConfigError::InvalidPasswordEncoding { alias, .. } => alias,
        }
    }
}

/// Errors reported by an external registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registration (or the registering context) is no longer valid
    #[error("registration is no longer valid")]
    Invalidated,

    /// Any other registry failure
    #[error("registry failure: {0}")]
    Failed(String),
}

impl RegistryError {
    /// True for the stale-handle race that callers treat as benign
    pub fn is_invalidated(&self) -> bool {
        matches!(self, RegistryError::Invalidated)
    }
}

/// Top-level error for bindery
#[derive(Debug, Error)]
pub enum BinderyError {
    /// Configuration lookup or validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// External registry call failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
