//! The per-navigation authorization guard.
//!
//! One synchronous pass per mount/path change: read the stored credential,
//! decode it, check freshness against the clock, evaluate policy. Nothing
//! carries over between passes; state is re-derived from the current path
//! and credential every time, so a stale decision can never overwrite a
//! newer navigation.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::claims::Claims;
use crate::config::GuardConfig;
use crate::error::AuthError;
use crate::policy::{self, Access};
use crate::store::CredentialStore;
use crate::token;

/// Terminal state of one guard pass. Exactly one is reached per
/// navigation; only `Authorized` renders the wrapped content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Render; the claims are handed to the page for its own use.
    Authorized(Claims),
    /// No credential in the store. Redirect to login.
    Unauthenticated,
    /// Credential past its deadline (purged). Redirect to login.
    Expired,
    /// Valid session, forbidden path. Redirect to the role fallback.
    Unauthorized { fallback: String },
}

impl Verdict {
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        matches!(self, Verdict::Authorized(_))
    }

    /// Where this verdict navigates, if anywhere. `None` means render.
    #[must_use]
    pub fn redirect_target<'a>(&'a self, config: &'a GuardConfig) -> Option<&'a str> {
        match self {
            Verdict::Authorized(_) => None,
            Verdict::Unauthenticated | Verdict::Expired => Some(config.login_path.as_str()),
            Verdict::Unauthorized { fallback } => Some(fallback.as_str()),
        }
    }
}

/// Clock seam so expiry tests never depend on wall time.
pub trait Clock {
    /// Current time as unix seconds.
    fn now_unix(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Navigation sink. The guard computes decisions as values and applies
/// them through this seam, so tests can record redirects instead of
/// performing them.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Orchestrates store, decoder, clock, and policy for protected pages.
pub struct RouteGuard<S, C = SystemClock> {
    store: S,
    clock: C,
    config: GuardConfig,
}

impl<S: CredentialStore> RouteGuard<S> {
    #[must_use]
    pub fn new(store: S, config: GuardConfig) -> Self {
        Self {
            store,
            clock: SystemClock,
            config,
        }
    }
}

impl<S: CredentialStore, C: Clock> RouteGuard<S, C> {
    #[must_use]
    pub fn with_clock(store: S, clock: C, config: GuardConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Run one full guard pass for `path`.
    ///
    /// Decode failures and expiry purge the stored credential so later
    /// navigations short-circuit at the missing-credential step instead of
    /// failing decode again. A missing credential and a policy denial
    /// leave the store untouched.
    pub fn resolve(&mut self, path: &str) -> Verdict {
        match self.authorize(path) {
            Ok(claims) => {
                tracing::debug!(reason = "AUTH_OK", user = %claims.user_id, role = %claims.role(), path, "access granted");
                Verdict::Authorized(claims)
            }
            Err(AuthError::MissingCredential) => {
                tracing::debug!(reason = "AUTH_MISSING", path, "no session credential");
                Verdict::Unauthenticated
            }
            Err(AuthError::Decode(e)) => {
                tracing::warn!(reason = "E_AUTH_DECODE", path, error = %e, "undecodable credential purged");
                self.store.remove();
                Verdict::Unauthenticated
            }
            Err(AuthError::ExpiredCredential) => {
                tracing::debug!(reason = "E_AUTH_EXPIRED", path, "expired credential purged");
                self.store.remove();
                Verdict::Expired
            }
            Err(AuthError::PolicyDenied { fallback }) => {
                tracing::debug!(reason = "E_AUTH_DENIED", path, fallback = %fallback, "path not permitted for role");
                Verdict::Unauthorized { fallback }
            }
        }
    }

    /// [`resolve`](Self::resolve), then apply the navigation side effect.
    /// Returns the verdict so the caller can suppress or render content.
    pub fn enforce(&mut self, path: &str, navigator: &mut dyn Navigator) -> Verdict {
        let verdict = self.resolve(path);
        if let Some(target) = verdict.redirect_target(&self.config) {
            navigator.navigate(target);
        }
        verdict
    }

    fn authorize(&self, path: &str) -> Result<Claims, AuthError> {
        let credential = self.store.read().ok_or(AuthError::MissingCredential)?;
        let claims = token::decode_unverified(&credential)?;
        // Freshness is checked at evaluation time, not decode time: a
        // session can expire while the app stays open.
        if !claims.is_fresh(self.clock.now_unix()) {
            return Err(AuthError::ExpiredCredential);
        }
        match policy::evaluate(claims.role(), &claims.user_id, path) {
            Access::Granted => Ok(claims),
            Access::Denied { fallback } => Err(AuthError::PolicyDenied { fallback }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;

    const NOW: u64 = 1_700_000_000;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_unix(&self) -> u64 {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, path: &str) {
            self.visits.push(path.to_string());
        }
    }

    fn mint(user_id: &str, role: &str, exp: u64) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &json!({ "user_Id": user_id, "role": role, "iat": NOW - 60, "exp": exp }),
            &EncodingKey::from_secret(b"test_secret_for_unit_testing_only"),
        )
        .unwrap()
    }

    fn guard_with(
        credential: Option<String>,
        now: u64,
    ) -> RouteGuard<MemoryStore, FixedClock> {
        let store = match credential {
            Some(c) => MemoryStore::with_credential(c),
            None => MemoryStore::new(),
        };
        RouteGuard::with_clock(store, FixedClock(now), GuardConfig::default())
    }

    #[test]
    fn missing_credential_is_unauthenticated_without_purge() {
        let mut guard = guard_with(None, NOW);
        let mut nav = RecordingNavigator::default();
        let verdict = guard.enforce("/dashboard", &mut nav);
        assert_eq!(verdict, Verdict::Unauthenticated);
        assert_eq!(nav.visits, vec!["/".to_string()]);
    }

    #[test]
    fn expired_credential_is_purged_and_sent_to_login() {
        let token = mint("E1", "Employee", NOW - 10);
        let mut guard = guard_with(Some(token), NOW);
        let mut nav = RecordingNavigator::default();
        let verdict = guard.enforce("/task-lists/E1", &mut nav);
        assert_eq!(verdict, Verdict::Expired);
        assert_eq!(nav.visits, vec!["/".to_string()]);
        // Purged: the next pass short-circuits at the store read.
        assert_eq!(guard.resolve("/task-lists/E1"), Verdict::Unauthenticated);
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let token = mint("E1", "Employee", NOW);
        let mut guard = guard_with(Some(token), NOW);
        assert_eq!(guard.resolve("/task-lists/E1"), Verdict::Expired);
    }

    #[test]
    fn authorized_renders_without_navigation() {
        let token = mint("E1", "Employee", NOW + 3_600);
        let mut guard = guard_with(Some(token), NOW);
        let mut nav = RecordingNavigator::default();
        let verdict = guard.enforce("/task-lists/E1", &mut nav);
        match verdict {
            Verdict::Authorized(claims) => assert_eq!(claims.user_id, "E1"),
            other => panic!("expected Authorized, got {other:?}"),
        }
        assert!(nav.visits.is_empty());
    }

    #[test]
    fn policy_denial_redirects_without_purging() {
        let token = mint("E1", "Employee", NOW + 3_600);
        let mut guard = guard_with(Some(token), NOW);
        let mut nav = RecordingNavigator::default();
        let verdict = guard.enforce("/task-lists/E2", &mut nav);
        assert_eq!(
            verdict,
            Verdict::Unauthorized {
                fallback: "/task-lists/E1".to_string()
            }
        );
        assert_eq!(nav.visits, vec!["/task-lists/E1".to_string()]);
        // Session stays valid: the own page still renders afterwards.
        assert!(guard.resolve("/task-lists/E1").is_authorized());
    }

    #[test]
    fn undecodable_credential_is_treated_like_missing_and_purged() {
        let mut guard = guard_with(Some("not-a-token".to_string()), NOW);
        let mut nav = RecordingNavigator::default();
        let verdict = guard.enforce("/dashboard", &mut nav);
        assert_eq!(verdict, Verdict::Unauthenticated);
        assert_eq!(nav.visits, vec!["/".to_string()]);
        assert_eq!(guard.resolve("/dashboard"), Verdict::Unauthenticated);
    }

    #[test]
    fn pic_denied_on_pic_dashboard() {
        let token = mint("P1", "PIC", NOW + 3_600);
        let mut guard = guard_with(Some(token), NOW);
        assert_eq!(
            guard.resolve("/pic-dashboard/overview"),
            Verdict::Unauthorized {
                fallback: "/dashboard".to_string()
            }
        );
        assert!(guard.resolve("/task-lists/E1").is_authorized());
    }

    #[test]
    fn unknown_role_falls_back_to_root() {
        let token = mint("X1", "Contractor", NOW + 3_600);
        let mut guard = guard_with(Some(token), NOW);
        let config = GuardConfig::default();
        let verdict = guard.resolve("/task-lists/X1");
        assert_eq!(verdict.redirect_target(&config), Some("/"));
    }

    #[test]
    fn each_pass_re_derives_from_current_path() {
        // Same guard, alternating paths: decisions track the live path,
        // never a carried-forward result.
        let token = mint("E1", "Employee", NOW + 3_600);
        let mut guard = guard_with(Some(token), NOW);
        assert!(guard.resolve("/task-lists/E1").is_authorized());
        assert!(!guard.resolve("/task-lists/E2").is_authorized());
        assert!(guard.resolve("/task-lists/E1").is_authorized());
    }
}
