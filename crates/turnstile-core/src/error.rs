use thiserror::Error;

use crate::token::DecodeError;

/// Why a guard pass refused to render.
///
/// Never escapes the guard: every variant is resolved into a
/// [`Verdict`](crate::guard::Verdict) and a navigation decision, with no
/// user-facing diagnostics. `Decode` and `ExpiredCredential` additionally
/// purge the stored credential; `PolicyDenied` must not (the session is
/// still valid, only the path is off-limits).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credential in session store")]
    MissingCredential,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("credential past its expiry deadline")]
    ExpiredCredential,
    #[error("role not permitted for path (fallback {fallback})")]
    PolicyDenied { fallback: String },
}
