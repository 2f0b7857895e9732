//! Alias derivation for container-published entries
//!
//! The container gives every configuration element an `id`. When the
//! operator did not supply one, it generates `default-<n>`, or for nested
//! elements a path ending in `[default-<n>]`. Such ids are not stable and
//! mean nothing to application code, so those entries are looked up by
//! their `config.displayId` instead.

use bindery_core::properties::{get_str, Properties, DISPLAY_ID, ID};

const DEFAULT_PREFIX: &str = "default-";

/// True if `id` is a container-generated default identifier
///
/// Matches `default-<n>` and any id whose last bracketed segment is
/// `[default-<n>]`, e.g. `dataSource[ds1]/containerAuthData[default-0]`.
pub fn is_default_id(id: &str) -> bool {
    if is_default_segment(id) {
        return true;
    }
    id.strip_suffix(']')
        .and_then(|rest| rest.rfind('[').map(|open| &rest[open + 1..]))
        .map_or(false, is_default_segment)
}

fn is_default_segment(segment: &str) -> bool {
    segment
        .strip_prefix(DEFAULT_PREFIX)
        .map_or(false, |n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Derive the lookup alias for an entry from its properties
///
/// Returns `None` only when neither `id` nor `config.displayId` is present.
pub fn alias_for(properties: &Properties) -> Option<String> {
    let id = get_str(properties, ID);
    let display_id = get_str(properties, DISPLAY_ID);
    match (id, display_id) {
        (Some(id), Some(display_id)) if is_default_id(id) => Some(display_id.to_string()),
        (Some(id), _) => Some(id.to_string()),
        (None, display_id) => display_id.map(str::to_string),
    }
}
