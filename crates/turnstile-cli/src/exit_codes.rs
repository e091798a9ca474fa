//! Unified exit codes for the turnstile CLI.
//! Part of the public contract; scripts key off these.

pub const SUCCESS: i32 = 0; // Authorized / command completed
pub const INTERNAL_ERROR: i32 = 2; // Bad input, config, or I/O failure
pub const POLICY_DENIED: i32 = 3; // Valid session, forbidden path
pub const NO_SESSION: i32 = 4; // Missing, undecodable, or expired credential
