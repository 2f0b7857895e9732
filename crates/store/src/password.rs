//! Protected password values
//!
//! Passwords may be configured in plain text or obfuscated as
//! `{xor}<base64>`, where every byte of the plain text was XOR'ed with `_`
//! before encoding. Obfuscation is not encryption; it only keeps passwords
//! from being read over a shoulder.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bindery_core::ConfigError;
use zeroize::Zeroizing;

const XOR_ALGORITHM: &str = "xor";
const XOR_MASK: u8 = b'_';

/// A decoded password
///
/// `Debug` never prints the contents. The buffer, and every clone of it,
/// is wiped with `zeroize` on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    /// Wrap raw password bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Secret(Zeroizing::new(bytes))
    }

    /// Borrow the plain password bytes
    pub fn expose(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Number of bytes in the password
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the password is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Decode a configured password
///
/// Values without a `{alg}` prefix are returned as-is. `alias` is only used
/// to label errors.
pub fn decode_password(alias: &str, raw: &[u8]) -> Result<Secret, ConfigError> {
    let Some((algorithm, payload)) = split_algorithm(raw) else {
        return Ok(Secret::new(raw.to_vec()));
    };

    if !algorithm.eq_ignore_ascii_case(XOR_ALGORITHM) {
        return Err(ConfigError::UnsupportedPasswordEncoding {
            alias: alias.to_string(),
            algorithm,
        });
    }

    let mut bytes = Zeroizing::new(STANDARD.decode(payload).map_err(|e| {
        ConfigError::InvalidPasswordEncoding {
            alias: alias.to_string(),
            reason: e.to_string(),
        }
    })?);
    for b in bytes.iter_mut() {
        *b ^= XOR_MASK;
    }
    Ok(Secret(bytes))
}

/// Obfuscate a plain password as `{xor}<base64>`
pub fn encode_xor(plain: &[u8]) -> String {
    let masked = Zeroizing::new(plain.iter().map(|b| b ^ XOR_MASK).collect::<Vec<u8>>());
    format!("{{{}}}{}", XOR_ALGORITHM, STANDARD.encode(&*masked))
}

fn split_algorithm(raw: &[u8]) -> Option<(String, &[u8])> {
    let rest = raw.strip_prefix(b"{")?;
    let close = rest.iter().position(|&b| b == b'}')?;
    let algorithm = std::str::from_utf8(&rest[..close]).ok()?;
    if algorithm.is_empty() {
        return None;
    }
    Some((algorithm.to_string(), &rest[close + 1..]))
}
