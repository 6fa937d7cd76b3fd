//! Session token inspection.
//!
//! The backend issues JWTs. The client never verifies the signature (the
//! server does that on every request); it only reads the payload's `exp`
//! claim to decide whether a stored session is still worth using.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Reasons a token payload could not be read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not in header.payload.signature form")]
    Malformed,
    #[error("token payload is not valid base64")]
    Encoding,
    #[error("token payload is not a JSON object with a numeric exp claim")]
    Claims,
}

/// The payload claims the client cares about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, in seconds since the Unix epoch.
    pub exp: f64,
    /// Subject (the user's email).
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    /// Whether the token is still valid at `now`. Expiry is exclusive.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        #[allow(clippy::cast_precision_loss)] // millisecond timestamps fit in f64
        let now_secs = now.timestamp_millis() as f64 / 1000.0;
        self.exp > now_secs
    }
}

/// Decode the payload segment of a token.
///
/// # Errors
///
/// Returns `TokenError` if the token has no payload segment, the segment is
/// not base64, or it does not hold a JSON object with a numeric `exp`.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_header), Some(payload)) if !payload.is_empty() => payload,
        _ => return Err(TokenError::Malformed),
    };

    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| TokenError::Encoding)?;

    serde_json::from_slice(&bytes).map_err(|_| TokenError::Claims)
}

/// Whether `token` carries an `exp` claim later than `now`.
///
/// Any decoding failure counts as expired.
#[must_use]
pub fn is_token_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    decode_claims(token).is_ok_and(|claims| claims.is_valid_at(now))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    fn token_expiring_at(exp: i64) -> String {
        token_with_payload(&format!(
            r#"{{"sub":"ada@taskdesk.dev","role":"ADMIN","exp":{exp}}}"#
        ))
    }

    #[test]
    fn test_decode_claims() {
        let claims = decode_claims(&token_expiring_at(1_900_000_000)).unwrap();
        assert!((claims.exp - 1_900_000_000.0).abs() < f64::EPSILON);
        assert_eq!(claims.sub.as_deref(), Some("ada@taskdesk.dev"));
        assert_eq!(claims.role.as_deref(), Some("ADMIN"));
    }

    #[test]
    fn test_future_expiry_is_valid() {
        let now = Utc::now();
        let token = token_expiring_at((now + Duration::hours(1)).timestamp());
        assert!(is_token_valid_at(&token, now));
    }

    #[test]
    fn test_past_expiry_is_invalid() {
        let now = Utc::now();
        for offset in [Duration::seconds(1), Duration::hours(1), Duration::days(365)] {
            let token = token_expiring_at((now - offset).timestamp());
            assert!(!is_token_valid_at(&token, now));
        }
    }

    #[test]
    fn test_expiry_equal_to_now_is_invalid() {
        let now = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        assert!(!is_token_valid_at(&token_expiring_at(1_800_000_000), now));
    }

    #[test]
    fn test_unparseable_tokens_are_invalid_without_panicking() {
        let now = Utc::now();
        let cases = [
            String::new(),
            "no-dots".to_owned(),
            "header.".to_owned(),
            "header.%%%%.sig".to_owned(),
            token_with_payload("not json"),
            token_with_payload(r#"{"sub":"x"}"#),
            token_with_payload(r#"{"exp":"tomorrow"}"#),
            token_with_payload("[]"),
        ];
        for token in &cases {
            assert!(!is_token_valid_at(token, now), "{token:?}");
        }
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode_claims("abc"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a.!!!.c"), Err(TokenError::Encoding));
        assert_eq!(
            decode_claims(&token_with_payload("{}")),
            Err(TokenError::Claims)
        );
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let payload = base64::engine::general_purpose::STANDARD.encode(r#"{"exp":4102444800}"#);
        let token = format!("h.{payload}.s");
        assert!(decode_claims(&token).is_ok());
    }
}
