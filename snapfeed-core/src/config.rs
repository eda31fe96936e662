//! # Configuration helpers
//!
//! snapfeed is configured entirely from the process environment (a `.env`
//! file is loaded by the server binary before anything reads it). Each crate
//! owns the settings for its own concern: the blob crate reads `BLOB_*`, the
//! document store crate reads `DOCSTORE_*`, the server reads `HTTP_*` and
//! `UPLOAD_*`. These helpers keep the parsing rules identical everywhere:
//!
//! ```rust
//! use snapfeed_core::env_var_or;
//!
//! let port: u16 = env_var_or("SNAPFEED_DOC_EXAMPLE_PORT", 3000);
//! assert_eq!(port, 3000);
//! ```
//!
//! Unparseable values fall back to the default rather than failing startup.

/// Read `key` and parse it, falling back to `default` when unset or invalid.
pub fn env_var_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Debug,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}

/// Read `key`, treating an empty value as unset.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a comma-separated list; unset means empty.
pub fn env_list(key: &str) -> Vec<String> {
    env_opt(key)
        .map(|raw| {
            raw.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
