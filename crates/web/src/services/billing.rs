//! Billing webhook verification and event handling.
//!
//! An out-of-band payment processor confirms premium upgrades by POSTing a
//! signed event to `/api/billing/webhook`. The interactive app never calls
//! this; it only re-reads the premium flag on the next profile load.
//!
//! Signature scheme: `X-Proofy-Signature: v0=<hex hmac-sha256>` over the
//! base string `v0:{timestamp}:{body}` with a shared secret, plus a
//! 5-minute timestamp window for replay protection.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use proofy_core::UserId;

/// Maximum allowed clock skew for webhook timestamps, in seconds.
const MAX_TIMESTAMP_SKEW_SECS: i64 = 300;

/// Errors from webhook signature verification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature or timestamp did not verify.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// A billing event delivered by the payment processor.
#[derive(Debug, Deserialize)]
pub struct BillingEvent {
    /// Event type; only `upgrade.completed` changes state.
    pub event: String,
    /// The user whose upgrade completed.
    pub user_id: UserId,
}

impl BillingEvent {
    /// The only event type that flips the premium flag.
    pub const UPGRADE_COMPLETED: &'static str = "upgrade.completed";
}

/// Verifier for billing webhook signatures.
pub struct WebhookVerifier {
    signing_secret: SecretString,
}

impl WebhookVerifier {
    /// Create a verifier from the shared secret.
    #[must_use]
    pub const fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret }
    }

    /// Verify a webhook request signature.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSignature` if the timestamp is
    /// malformed or stale, or the signature does not match.
    pub fn verify_signature(
        &self,
        timestamp: &str,
        body: &str,
        signature: &str,
    ) -> Result<(), WebhookError> {
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| WebhookError::InvalidSignature("Invalid timestamp".to_string()))?;

        let now_secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| WebhookError::InvalidSignature(e.to_string()))?
            .as_secs();

        let now = i64::try_from(now_secs)
            .map_err(|_| WebhookError::InvalidSignature("System time overflow".to_string()))?;

        // Reject replayed requests
        if (now - ts).abs() > MAX_TIMESTAMP_SKEW_SECS {
            return Err(WebhookError::InvalidSignature(
                "Request timestamp too old".to_string(),
            ));
        }

        let expected = self.compute_signature(timestamp, body)?;

        // Constant-time comparison
        if !constant_time_compare(&expected, signature) {
            return Err(WebhookError::InvalidSignature(
                "Signature mismatch".to_string(),
            ));
        }

        debug!("billing webhook signature verified");

        Ok(())
    }

    /// Compute the `v0=` signature for a timestamp and body.
    fn compute_signature(&self, timestamp: &str, body: &str) -> Result<String, WebhookError> {
        let sig_basestring = format!("v0:{timestamp}:{body}");

        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.signing_secret.expose_secret().as_bytes())
                .map_err(|e| WebhookError::InvalidSignature(e.to_string()))?;

        mac.update(sig_basestring.as_bytes());

        Ok(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::from("k9#mQ2$vX7!pL4@wZ8&nB3*eR6^tY1%u"))
    }

    fn now_ts() -> String {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string()
    }

    #[test]
    fn test_valid_signature_accepted() {
        let v = verifier();
        let ts = now_ts();
        let body = r#"{"event":"upgrade.completed","user_id":42}"#;
        let sig = v.compute_signature(&ts, body).unwrap();
        assert!(v.verify_signature(&ts, body, &sig).is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let v = verifier();
        let ts = now_ts();
        let sig = v
            .compute_signature(&ts, r#"{"event":"upgrade.completed","user_id":42}"#)
            .unwrap();
        let result = v.verify_signature(&ts, r#"{"event":"upgrade.completed","user_id":43}"#, &sig);
        assert!(matches!(result, Err(WebhookError::InvalidSignature(_))));
    }

    #[test]
    fn test_forged_signature_rejected() {
        let v = verifier();
        let ts = now_ts();
        let body = r#"{"event":"upgrade.completed","user_id":42}"#;
        let result = v.verify_signature(&ts, body, "v0=deadbeef");
        assert!(matches!(result, Err(WebhookError::InvalidSignature(_))));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let v = verifier();
        let ts = "1000000000".to_string(); // 2001
        let body = r#"{"event":"upgrade.completed","user_id":42}"#;
        let sig = v.compute_signature(&ts, body).unwrap();
        let result = v.verify_signature(&ts, body, &sig);
        assert!(matches!(result, Err(WebhookError::InvalidSignature(_))));
    }

    #[test]
    fn test_malformed_timestamp_rejected() {
        let v = verifier();
        let result = v.verify_signature("not-a-number", "{}", "v0=00");
        assert!(matches!(result, Err(WebhookError::InvalidSignature(_))));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("short", "longer string"));
    }

    #[test]
    fn test_event_deserializes() {
        let event: BillingEvent =
            serde_json::from_str(r#"{"event":"upgrade.completed","user_id":7}"#).unwrap();
        assert_eq!(event.event, BillingEvent::UPGRADE_COMPLETED);
        assert_eq!(event.user_id, UserId::new(7));
    }
}
