//! Signed NSFW consent token carried in the `nsfw_consent` cookie.
//!
//! Format: `1|<unix_timestamp>|<hex HMAC-SHA256 of "1|<unix_timestamp>">`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

pub const CONSENT_COOKIE_NAME: &str = "nsfw_consent";
pub const CONSENT_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

const CONSENT_FLAG: &str = "1";

#[derive(Clone)]
pub struct ConsentSigner {
    mac: HmacSha256,
}

impl ConsentSigner {
    /// Returns `None` for a missing or blank secret, which disables the
    /// persistent cookie.
    pub fn new(secret: Option<&str>) -> Option<Self> {
        let secret = secret.map(str::trim).filter(|s| !s.is_empty())?;
        let mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        Some(Self { mac })
    }

    /// Produce a cookie value issued at `now`.
    pub fn sign(&self, now: i64) -> String {
        let payload = format!("{}|{}", CONSENT_FLAG, now);
        let signature = self.signature(&payload);
        format!("{}|{}", payload, signature)
    }

    /// Check flag, signature and age of a cookie value.
    pub fn verify(&self, value: &str, now: i64) -> bool {
        let mut parts = value.split('|');
        let (Some(flag), Some(timestamp), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            debug!("Consent cookie rejected: malformed");
            return false;
        };

        if flag != CONSENT_FLAG || timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            debug!("Consent cookie rejected: bad flag or timestamp");
            return false;
        }

        let Ok(issued_at) = timestamp.parse::<i64>() else {
            return false;
        };

        let Ok(provided) = hex::decode(signature) else {
            debug!("Consent cookie rejected: signature is not hex");
            return false;
        };

        // verify_slice compares in constant time
        let mut mac = self.mac.clone();
        mac.update(format!("{}|{}", flag, timestamp).as_bytes());
        if mac.verify_slice(&provided).is_err() {
            debug!("Consent cookie rejected: signature mismatch");
            return false;
        }

        match now.checked_sub(issued_at) {
            Some(age) if (0..=CONSENT_TTL_SECONDS).contains(&age) => true,
            _ => {
                debug!("Consent cookie rejected: issued_at={} now={}", issued_at, now);
                false
            }
        }
    }

    fn signature(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for ConsentSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000;

    fn signer() -> ConsentSigner {
        ConsentSigner::new(Some("test-secret")).unwrap()
    }

    #[test]
    fn test_blank_secret_disables_signing() {
        assert!(ConsentSigner::new(None).is_none());
        assert!(ConsentSigner::new(Some("")).is_none());
        assert!(ConsentSigner::new(Some("   ")).is_none());
    }

    #[test]
    fn test_fresh_cookie_verifies() {
        let signer = signer();
        let value = signer.sign(NOW);
        assert!(value.starts_with("1|1760000000|"));
        assert!(signer.verify(&value, NOW));
    }

    #[test]
    fn test_signature_is_lowercase_hex_sha256() {
        let value = signer().sign(NOW);
        let signature = value.rsplit('|').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let signer = signer();
        let value = signer.sign(NOW);
        let (payload, signature) = value.rsplit_once('|').unwrap();
        let flipped = if signature.starts_with('0') { "1" } else { "0" };
        let tampered = format!("{}|{}{}", payload, flipped, &signature[1..]);
        assert!(!signer.verify(&tampered, NOW));
    }

    #[test]
    fn test_tampered_timestamp_rejected() {
        let signer = signer();
        let value = signer.sign(NOW);
        let signature = value.rsplit('|').next().unwrap();
        let forged = format!("1|{}|{}", NOW + 10, signature);
        assert!(!signer.verify(&forged, NOW + 10));
    }

    #[test]
    fn test_other_secret_rejected() {
        let value = ConsentSigner::new(Some("other")).unwrap().sign(NOW);
        assert!(!signer().verify(&value, NOW));
    }

    #[test]
    fn test_expiry_window_is_inclusive() {
        let signer = signer();
        let value = signer.sign(NOW);
        assert!(signer.verify(&value, NOW + CONSENT_TTL_SECONDS));
        assert!(!signer.verify(&value, NOW + CONSENT_TTL_SECONDS + 1));
    }

    #[test]
    fn test_cookie_from_the_future_rejected() {
        let signer = signer();
        let value = signer.sign(NOW + 60);
        assert!(!signer.verify(&value, NOW));
    }

    #[test]
    fn test_malformed_values_rejected() {
        let signer = signer();
        let signature = signer.sign(NOW).rsplit('|').next().unwrap().to_string();

        let cases = [
            String::new(),
            "1".to_string(),
            format!("1|{}", NOW),
            format!("1|{}|{}|extra", NOW, signature),
            format!("0|{}|{}", NOW, signature),
            format!("1|-{}|{}", NOW, signature),
            format!("1|+{}|{}", NOW, signature),
            format!("1|abc|{}", signature),
            format!("1||{}", signature),
            format!("1|{}|not-hex", NOW),
            format!("1|99999999999999999999999|{}", signature),
        ];

        for case in cases {
            assert!(!signer.verify(&case, NOW), "accepted {:?}", case);
        }
    }
}
