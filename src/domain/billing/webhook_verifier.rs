//! Webhook signature verification.
//!
//! The provider signs `"{t}.{body}"` with HMAC-SHA256 and sends
//! `Stripe-Signature: t=<unix>,v1=<hex>[,v0=<hex>]`. Deliveries older than
//! five minutes are rejected as replays.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::Timestamp;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

const MAX_EVENT_AGE_SECS: i64 = 300;
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// Every `v1` entry. The provider sends several during secret rotation.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                // v0 and unknown schemes are not trusted
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::ParseError("missing v1 signature".to_string()));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

pub struct StripeWebhookVerifier {
    secret: SecretString,
}

impl StripeWebhookVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies the signature against `now` and parses the event.
    ///
    /// # Errors
    ///
    /// - `ParseError` - malformed header or body
    /// - `TimestampOutOfRange` - signed more than five minutes ago
    /// - `InvalidTimestamp` - signed more than a minute in the future
    /// - `InvalidSignature` - no `v1` entry matches
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: Timestamp,
    ) -> Result<StripeEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;
        Self::validate_timestamp(header.timestamp, now)?;

        let expected = self.compute_signature(header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    fn validate_timestamp(timestamp: i64, now: Timestamp) -> Result<(), WebhookError> {
        let age = now.as_unix_secs() - timestamp;
        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }
        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        sign(self.secret.expose_secret(), timestamp, payload)
    }
}

fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::ParseError(format!("invalid signing key: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a valid `Stripe-Signature` header for test fixtures.
#[cfg(test)]
pub fn test_signature_header(secret: &str, timestamp: i64, payload: &str) -> String {
    let signature = sign(secret, timestamp, payload.as_bytes()).unwrap();
    format!("t={},v1={}", timestamp, hex::encode(signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret_12345";
    const NOW: i64 = 1_705_276_800;
    const BODY: &str = r#"{"id":"evt_1","type":"checkout.session.completed","created":1705276800,"data":{"object":{}}}"#;

    fn verifier() -> StripeWebhookVerifier {
        StripeWebhookVerifier::new(SecretString::new(SECRET.to_string()))
    }

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(NOW).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Header parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parses_header_with_multiple_v1_entries() {
        let header = SignatureHeader::parse("t=123,v1=abcd,v1=ef01,v0=9999").unwrap();

        assert_eq!(header.timestamp, 123);
        assert_eq!(header.v1_signatures, vec![vec![0xab, 0xcd], vec![0xef, 0x01]]);
    }

    #[test]
    fn header_without_timestamp_is_rejected() {
        assert!(matches!(
            SignatureHeader::parse("v1=abcd"),
            Err(WebhookError::ParseError(_))
        ));
    }

    #[test]
    fn header_without_v1_is_rejected() {
        assert!(matches!(
            SignatureHeader::parse("t=123,v0=abcd"),
            Err(WebhookError::ParseError(_))
        ));
    }

    #[test]
    fn header_with_bad_hex_is_rejected() {
        assert!(SignatureHeader::parse("t=123,v1=zz").is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_signature_parses_event() {
        let header = test_signature_header(SECRET, NOW, BODY);

        let event = verifier().verify_and_parse(BODY.as_bytes(), &header, now()).unwrap();

        assert_eq!(event.id, "evt_1");
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let header = test_signature_header("whsec_other", NOW, BODY);

        let result = verifier().verify_and_parse(BODY.as_bytes(), &header, now());

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn tampered_body_is_invalid_signature() {
        let header = test_signature_header(SECRET, NOW, BODY);
        let tampered = BODY.replace("evt_1", "evt_2");

        let result = verifier().verify_and_parse(tampered.as_bytes(), &header, now());

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn stale_delivery_is_rejected() {
        let signed_at = NOW - MAX_EVENT_AGE_SECS - 1;
        let header = test_signature_header(SECRET, signed_at, BODY);

        let result = verifier().verify_and_parse(BODY.as_bytes(), &header, now());

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn delivery_at_edge_of_window_is_accepted() {
        let header = test_signature_header(SECRET, NOW - MAX_EVENT_AGE_SECS, BODY);

        assert!(verifier().verify_and_parse(BODY.as_bytes(), &header, now()).is_ok());
    }

    #[test]
    fn future_delivery_beyond_skew_is_rejected() {
        let header = test_signature_header(SECRET, NOW + MAX_CLOCK_SKEW_SECS + 1, BODY);

        let result = verifier().verify_and_parse(BODY.as_bytes(), &header, now());

        assert!(matches!(result, Err(WebhookError::InvalidTimestamp)));
    }

    #[test]
    fn valid_signature_with_bad_json_is_parse_error() {
        let body = "not json";
        let header = test_signature_header(SECRET, NOW, body);

        let result = verifier().verify_and_parse(body.as_bytes(), &header, now());

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }
}
