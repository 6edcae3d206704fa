//! Environment lookups with logged fallbacks.
//!
//! Settings are read once at startup. An unset variable is silent; a set
//! but unparseable one logs a warning and the caller keeps its default.

use std::fmt::Display;
use std::str::FromStr;

/// Returns the trimmed value of `key`, treating blank values as unset.
pub fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = var(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Invalid {key} value {raw:?}: {e}; using default");
            None
        }
    }
}

/// Reads a boolean switch: `1/true/yes/on` or `0/false/no/off`.
pub fn flag(key: &str) -> Option<bool> {
    let raw = var(key)?;
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            log::warn!("Invalid {key} value {raw:?}: expected a boolean; using default");
            None
        }
    }
}
