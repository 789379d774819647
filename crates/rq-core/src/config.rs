//! Environment-driven configuration helpers
//!
//! Each provider crate owns its configuration struct and builds it from an
//! [`EnvLookup`]. Production code reads the process environment (after loading
//! `.env`); tests pass a closure over a map.

use std::str::FromStr;

use crate::{Error, Result};

/// Source of configuration values keyed by environment variable name
pub trait EnvLookup {
    fn get(&self, key: &str) -> Option<String>;
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// The process environment, with `.env` loaded on construction
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self
    }
}

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Look up a key, treating blank values as absent
pub fn lookup(env: &impl EnvLookup, key: &str) -> Option<String> {
    env.get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn required(env: &impl EnvLookup, key: &str) -> Result<String> {
    lookup(env, key).ok_or_else(|| {
        Error::Configuration(format!("{} environment variable not found", key))
    })
}

pub fn optional(env: &impl EnvLookup, key: &str, default: &str) -> String {
    lookup(env, key).unwrap_or_else(|| default.to_string())
}

/// Parse a value with `FromStr`, falling back to `default` when unset
pub fn parsed<T>(env: &impl EnvLookup, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(env, key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Configuration(format!("{} has invalid value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

/// Validate that a configured endpoint is an absolute URL; trailing slashes are dropped
pub fn endpoint(raw: &str, key: &str) -> Result<String> {
    url::Url::parse(raw)
        .map_err(|e| Error::Configuration(format!("{} is not a valid URL '{}': {}", key, raw, e)))?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Mask a secret for display, keeping only the last four characters
pub fn redact(secret: &str) -> String {
    if secret.is_empty() {
        return "<unset>".to_string();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
