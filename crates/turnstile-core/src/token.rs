//! Decode-only credential parsing.
//!
//! The guard never verifies a signature: the payload is trusted as-read and
//! the backend remains the real authorization boundary on every API call.
//! Upgrading this to a verified decode would change observable behavior:
//! any well-formed unsigned payload must stay acceptable.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;

use crate::claims::Claims;

/// Why a credential string could not be decoded into [`Claims`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("credential is not a compact three-segment token")]
    Malformed,
    #[error("failed to decode token header: {0}")]
    Header(#[from] jsonwebtoken::errors::Error),
    #[error("failed to decode payload base64: {0}")]
    PayloadEncoding(#[from] base64::DecodeError),
    #[error("failed to parse claims payload: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Parse the compact token form and extract its claims without verifying
/// the signature.
///
/// Structural checks only: exactly three dot-separated segments, a
/// parseable header, and a base64url payload holding claims JSON. The
/// signature segment is ignored entirely.
pub fn decode_unverified(token: &str) -> Result<Claims, DecodeError> {
    let mut segments = token.split('.');
    let payload = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(DecodeError::Malformed),
    };

    // Header must at least parse as a token header; catches inputs that
    // merely happen to contain two dots.
    let _ = jsonwebtoken::decode_header(token)?;

    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    let claims = serde_json::from_slice(&bytes)?;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Role;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test_secret_for_unit_testing_only"),
        )
        .unwrap()
    }

    #[test]
    fn decodes_claims_without_verifying_signature() {
        let token = mint(json!({
            "user_Id": "E1",
            "role": "Employee",
            "iat": 100,
            "exp": 4_000_000_000u64
        }));
        // Corrupt the signature segment; decode must still succeed.
        let tampered = {
            let mut parts: Vec<&str> = token.split('.').collect();
            parts[2] = "bm90LWEtc2lnbmF0dXJl";
            parts.join(".")
        };
        let claims = decode_unverified(&tampered).unwrap();
        assert_eq!(claims.user_id, "E1");
        assert_eq!(claims.role(), Role::Employee);
        assert_eq!(claims.exp, 4_000_000_000);
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(matches!(
            decode_unverified("onlyonesegment"),
            Err(DecodeError::Malformed)
        ));
        assert!(matches!(
            decode_unverified("two.segments"),
            Err(DecodeError::Malformed)
        ));
        assert!(matches!(
            decode_unverified("a.b.c.d"),
            Err(DecodeError::Malformed)
        ));
        assert!(matches!(decode_unverified(""), Err(DecodeError::Malformed)));
    }

    #[test]
    fn rejects_undecodable_payload() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let token = format!("{header}.!!!not-base64!!!.sig");
        assert!(matches!(
            decode_unverified(&token),
            Err(DecodeError::PayloadEncoding(_))
        ));
    }

    #[test]
    fn rejects_non_claims_payload_json() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        // Valid base64, valid JSON, but missing required claim fields.
        let payload = URL_SAFE_NO_PAD.encode(r#"{"hello":"world"}"#);
        let token = format!("{header}.{payload}.sig");
        assert!(matches!(
            decode_unverified(&token),
            Err(DecodeError::Claims(_))
        ));
    }

    #[test]
    fn rejects_garbage_header() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"user_Id":"E1","role":"Employee","exp":1}"#);
        let token = format!("%%%.{payload}.sig");
        assert!(matches!(
            decode_unverified(&token),
            Err(DecodeError::Header(_))
        ));
    }
}
