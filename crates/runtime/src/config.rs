//! Runtime configuration via `bindery.toml`
//!
//! The file stands in for the container's configuration layer: each
//! `[[auth_data]]` table becomes a credential entry published to the store,
//! and `[startup]` declares the prerequisites tracked by the gate. Edit the
//! file and re-apply it to deliver modifications.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use bindery_core::properties::{DISPLAY_ID, ID};
use bindery_core::{Properties, PropertyValue};
use bindery_gate::PREREQUISITE;
use bindery_store::alias_for;
use bindery_store::entry::{KRB5_PRINCIPAL, KRB5_TICKET_CACHE, PASSWORD, USER};

use crate::error::{RuntimeError, RuntimeResult};

/// Config file name placed in the runtime's config directory.
pub const CONFIG_FILE_NAME: &str = "bindery.toml";

/// One `[[auth_data]]` table
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthDataConfig {
    /// Configured id; may be a generated `default-<n>` id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display id used when `id` is a generated default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_id: Option<String>,
    /// User name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Password, plain or `{xor}`-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Kerberos principal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub krb5_principal: Option<String>,
    /// Kerberos ticket cache location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub krb5_ticket_cache: Option<String>,
}

impl AuthDataConfig {
    /// Property bag the container would publish for this entry
    pub fn to_properties(&self) -> Properties {
        let fields = [
            (ID, &self.id),
            (DISPLAY_ID, &self.display_id),
            (USER, &self.user),
            (PASSWORD, &self.password),
            (KRB5_PRINCIPAL, &self.krb5_principal),
            (KRB5_TICKET_CACHE, &self.krb5_ticket_cache),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_ref()
                    .map(|v| (key.to_string(), PropertyValue::String(v.clone())))
            })
            .collect()
    }

    /// Lookup alias this entry resolves to
    pub fn alias(&self) -> Option<String> {
        alias_for(&self.to_properties())
    }
}

impl fmt::Debug for AuthDataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthDataConfig")
            .field("id", &self.id)
            .field("display_id", &self.display_id)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("krb5_principal", &self.krb5_principal)
            .field("krb5_ticket_cache", &self.krb5_ticket_cache)
            .finish()
    }
}

/// The `[startup]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartupConfig {
    /// Prerequisites dependent components wait for
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl StartupConfig {
    /// Property bag the gate is activated with
    pub fn to_properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.insert(
            PREREQUISITE.to_string(),
            PropertyValue::StringList(self.prerequisites.clone()),
        );
        properties
    }
}

/// Runtime configuration loaded from `bindery.toml`.
///
/// # Example
///
/// ```toml
/// [[auth_data]]
/// id = "dbUser"
/// user = "dbuser"
/// password = "{xor}Lz4sLCgwLTs="
///
/// [startup]
/// prerequisites = ["jdbcDriver"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Credential entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auth_data: Vec<AuthDataConfig>,
    /// Startup prerequisites
    #[serde(default)]
    pub startup: StartupConfig,
}

impl RuntimeConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Bindery configuration
#
# Credential entries. Each entry needs an id, or a display_id when the id is
# a generated "default-<n>" id, and exactly one identity:
#   user + password    (password may be "{xor}"-encoded)
#   krb5_principal     (krb5_ticket_cache is optional)
#
# [[auth_data]]
# id = "dbUser"
# user = "dbuser"
# password = "{xor}Lz4sLCgwLTs="
#
# [[auth_data]]
# id = "dataSource[ds1]/containerAuthData[default-0]"
# display_id = "dataSource[ds1]/containerAuthData"
# krb5_principal = "dbsvc@EXAMPLE.COM"

[startup]
# Prerequisites reported as outstanding until they are bound.
prerequisites = []
"#
    }

    /// Parse config from a TOML string and validate it.
    pub fn from_toml_str(content: &str, path: &Path) -> RuntimeResult<Self> {
        let config: RuntimeConfig = toml::from_str(content).map_err(|e| RuntimeError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> RuntimeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RuntimeError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> RuntimeResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| RuntimeError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> RuntimeResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| RuntimeError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check that every entry has a unique alias.
    ///
    /// Credential completeness is not checked here; it is reported when the
    /// entry is looked up.
    pub fn validate(&self) -> RuntimeResult<()> {
        let mut seen = HashSet::new();
        for (index, entry) in self.auth_data.iter().enumerate() {
            let alias = entry.alias().ok_or_else(|| {
                RuntimeError::Invalid(format!(
                    "auth_data entry #{} has neither id nor display_id",
                    index + 1
                ))
            })?;
            if !seen.insert(alias.clone()) {
                return Err(RuntimeError::Invalid(format!(
                    "duplicate auth_data alias '{}'",
                    alias
                )));
            }
        }
        Ok(())
    }
}
