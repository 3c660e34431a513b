//! Startup configuration.
//!
//! The one ambient value the core needs is the super-user secret. It is
//! read once at process start and injected into [`AccessControl`]; nothing
//! in the core reads the environment per call.

use serde::Deserialize;

use crate::access::AccessControl;

/// Environment variable holding the super-user secret.
pub const SUPER_USER_KEY_VAR: &str = "SUPER_USER_KEY";

/// Process-wide configuration for the store core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// The administrative secret. `None` (or empty) disables super-user
    /// access entirely.
    #[serde(default)]
    pub super_user_key: Option<String>,
}

impl Config {
    /// Reads configuration from the environment (`SUPER_USER_KEY`). An
    /// empty value counts as unset.
    pub fn from_env() -> Self {
        Self {
            super_user_key: std::env::var(SUPER_USER_KEY_VAR)
                .ok()
                .filter(|key| !key.is_empty()),
        }
    }

    /// Builds the access-control component from this configuration.
    pub fn access_control(&self) -> AccessControl {
        AccessControl::new(self.super_user_key.clone())
    }
}
