//! Database credentials resolved from the process environment.
//!
//! Each credential has a list of candidate variable names tried in order; the
//! first non-empty value wins. Both the endpoint and the key must resolve or
//! nothing downstream runs.

use thiserror::Error;
use tracing::debug;

/// Endpoint URL candidates, highest priority first.
pub const ENDPOINT_VARS: &[&str] = &[
    "VITE_SUPABASE_URL",
    "SUPABASE_URL",
    "NEXT_PUBLIC_SUPABASE_URL",
];

/// API key candidates, highest priority first.
pub const KEY_VARS: &[&str] = &[
    "VITE_SUPABASE_ANON_KEY",
    "SUPABASE_SERVICE_KEY",
    "SUPABASE_ANON_KEY",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("missing database endpoint: set one of {}", .0.join(", "))]
    MissingEndpoint(Vec<String>),
    #[error("missing database API key: set one of {}", .0.join(", "))]
    MissingKey(Vec<String>),
}

#[derive(Clone)]
pub struct Credentials {
    pub endpoint: String,
    pub key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve both credentials from the process environment.
    pub fn from_env() -> Result<Self, CredentialError> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolve both credentials through `lookup`, which maps a variable name to its value.
    pub fn resolve<F>(lookup: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = resolve_first(ENDPOINT_VARS, &lookup)
            .ok_or_else(|| CredentialError::MissingEndpoint(owned(ENDPOINT_VARS)))?;
        let key = resolve_first(KEY_VARS, &lookup)
            .ok_or_else(|| CredentialError::MissingKey(owned(KEY_VARS)))?;
        Ok(Self { endpoint, key })
    }
}

/// First candidate whose value is non-empty after trimming.
pub fn resolve_first<F>(names: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|&name| {
        let value = lookup(name)?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        debug!(var = name, "resolved credential");
        Some(value.to_string())
    })
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
