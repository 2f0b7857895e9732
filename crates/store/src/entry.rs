//! Credential entries and their validation
//!
//! An entry authenticates either with a user name and password, or with a
//! Kerberos principal (optionally with a ticket cache). The two identity
//! paths are mutually exclusive. Entries are immutable: a modified
//! configuration produces a new entry that replaces the old one wholesale.

use std::fmt;

use bindery_core::properties::{get_str, Properties};
use bindery_core::ConfigError;
use zeroize::Zeroizing;

use crate::password::{decode_password, Secret};

/// Property key for the user name
pub const USER: &str = "user";
/// Property key for the (possibly encoded) password
pub const PASSWORD: &str = "password";
/// Property key for the Kerberos principal
pub const KRB5_PRINCIPAL: &str = "krb5Principal";
/// Property key for the Kerberos ticket cache location
pub const KRB5_TICKET_CACHE: &str = "krb5TicketCache";

/// A configured credential entry
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigEntry {
    alias: String,
    user: Option<String>,
    password: Option<Zeroizing<Vec<u8>>>,
    krb5_principal: Option<String>,
    krb5_ticket_cache: Option<String>,
}

impl ConfigEntry {
    /// Create an empty entry for `alias`
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Self::default()
        }
    }

    /// Build an entry from the properties the container published
    ///
    /// Unknown keys are ignored. The password may be a string or raw bytes.
    pub fn from_properties(alias: impl Into<String>, properties: &Properties) -> Self {
        Self {
            alias: alias.into(),
            user: get_str(properties, USER).map(str::to_string),
            password: properties
                .get(PASSWORD)
                .and_then(|v| v.as_bytes())
                .map(|raw| Zeroizing::new(raw.to_vec())),
            krb5_principal: get_str(properties, KRB5_PRINCIPAL).map(str::to_string),
            krb5_ticket_cache: get_str(properties, KRB5_TICKET_CACHE).map(str::to_string),
        }
    }

    /// Set the user name
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the raw (possibly `{xor}`-encoded) password
    pub fn with_password(mut self, password: impl Into<Vec<u8>>) -> Self {
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    /// Set the Kerberos principal
    pub fn with_krb5_principal(mut self, principal: impl Into<String>) -> Self {
        self.krb5_principal = Some(principal.into());
        self
    }

    /// Set the Kerberos ticket cache location
    pub fn with_krb5_ticket_cache(mut self, cache: impl Into<String>) -> Self {
        self.krb5_ticket_cache = Some(cache.into());
        self
    }

    /// Alias the entry was created under
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// User name, if configured
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Kerberos principal, if configured
    pub fn krb5_principal(&self) -> Option<&str> {
        self.krb5_principal.as_deref()
    }

    /// Kerberos ticket cache, if configured
    pub fn krb5_ticket_cache(&self) -> Option<&str> {
        self.krb5_ticket_cache.as_deref()
    }

    /// True if a password value is present (encoded or not)
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Decode the configured password
    ///
    /// Returns `Ok(None)` for entries without a password, e.g. Kerberos
    /// entries.
    pub fn decoded_password(&self) -> Result<Option<Secret>, ConfigError> {
        self.password
            .as_deref()
            .map(|raw| decode_password(&self.alias, raw))
            .transpose()
    }
}

impl fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("alias", &self.alias)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("krb5_principal", &self.krb5_principal)
            .field("krb5_ticket_cache", &self.krb5_ticket_cache)
            .finish()
    }
}

fn is_blank(value: &[u8]) -> bool {
    match std::str::from_utf8(value) {
        Ok(text) => text.trim().is_empty(),
        Err(_) => value.iter().all(u8::is_ascii_whitespace),
    }
}

fn is_blank_str(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Validate an entry resolved under `alias`
///
/// Fails with:
/// - `Unavailable` if there is no entry
/// - `MutuallyExclusiveAttributes` if both `user` and `krb5Principal` are set
/// - `IncompleteConfiguration` if the chosen identity path has a missing or
///   blank attribute (whitespace-only counts as blank)
pub fn validate(alias: &str, entry: Option<&ConfigEntry>) -> Result<(), ConfigError> {
    let entry = entry.ok_or_else(|| ConfigError::Unavailable {
        alias: alias.to_string(),
    })?;

    if entry.user.is_some() && entry.krb5_principal.is_some() {
        return Err(ConfigError::MutuallyExclusiveAttributes {
            alias: alias.to_string(),
            attribute: USER.to_string(),
            conflicting: KRB5_PRINCIPAL.to_string(),
        });
    }

    let incomplete = |attribute: &str| ConfigError::IncompleteConfiguration {
        alias: alias.to_string(),
        attribute: attribute.to_string(),
    };

    if entry.krb5_principal.is_some() {
        if is_blank_str(entry.krb5_principal()) {
            return Err(incomplete(KRB5_PRINCIPAL));
        }
        return Ok(());
    }

    if is_blank_str(entry.user()) {
        return Err(incomplete(USER));
    }
    if entry.password.as_deref().map_or(true, |p| is_blank(p)) {
        return Err(incomplete(PASSWORD));
    }
    Ok(())
}
