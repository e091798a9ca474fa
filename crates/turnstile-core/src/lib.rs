//! Session/role authorization guard for the workload dashboard.
//!
//! Wraps every protected page of the dashboard: reads the stored credential,
//! decodes its claims, checks freshness, and evaluates whether the current
//! role may view the current path. The output is always a navigation
//! decision (render or redirect), never an error surfaced to the user.
//!
//! The decoder is intentionally *not* a cryptographic verifier. The backend
//! re-authorizes every API call; this guard only prevents flashes of
//! unauthorized content on the client.

pub mod claims;
pub mod config;
pub mod error;
pub mod guard;
pub mod policy;
pub mod store;
pub mod token;

pub use claims::{Claims, Role};
pub use config::GuardConfig;
pub use error::AuthError;
pub use guard::{Clock, Navigator, RouteGuard, SystemClock, Verdict};
pub use policy::{evaluate, Access};
pub use store::{CredentialStore, JarStore, MemoryStore, CREDENTIAL_KEY};
pub use token::{decode_unverified, DecodeError};
