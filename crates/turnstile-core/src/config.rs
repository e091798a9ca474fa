use std::env;

use crate::store::CREDENTIAL_KEY;

/// Guard configuration. Defaults match the shipped dashboard: credential
/// under `auth_token`, login at `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Name the login flow stores the credential under.
    pub credential_key: String,
    /// Where unauthenticated and expired sessions are sent.
    pub login_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            credential_key: CREDENTIAL_KEY.to_string(),
            login_path: "/".to_string(),
        }
    }
}

impl GuardConfig {
    /// Build from `TURNSTILE_*` environment variables, falling back to
    /// defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("TURNSTILE_CREDENTIAL_KEY") {
            if !v.is_empty() {
                cfg.credential_key = v;
            }
        }
        if let Ok(v) = env::var("TURNSTILE_LOGIN_PATH") {
            if !v.is_empty() {
                cfg.login_path = v;
            }
        }
        cfg
    }
}
