//! Svix webhook signature verification.
//!
//! Clerk delivers webhooks through Svix. Each delivery carries three headers:
//! `svix-id`, `svix-timestamp` (unix seconds), and `svix-signature`, a
//! space-separated list of `v1,<base64 HMAC-SHA256>` entries. The MAC covers
//! `"{id}.{timestamp}.{body}"`, keyed with the base64 portion of the
//! `whsec_`-prefixed signing secret. Any one matching entry is enough.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const ID_HEADER: &str = "svix-id";
pub const TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SIGNATURE_HEADER: &str = "svix-signature";

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Accepted clock skew between sender and receiver, in seconds.
pub const TOLERANCE_SECS: i64 = 5 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("secret is not valid base64")]
    InvalidSecret,

    #[error("timestamp header is not an integer")]
    InvalidTimestamp,

    #[error("message timestamp too old")]
    TimestampTooOld,

    #[error("message timestamp too new")]
    TimestampTooNew,

    #[error("no matching signature")]
    NoMatchingSignature,
}

/// The three svix headers of one delivery.
#[derive(Debug, Clone, Copy)]
pub struct SvixHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

/// A verifier bound to one signing secret.
#[derive(Clone)]
pub struct Webhook {
    keyed: HmacSha256,
}

impl std::fmt::Debug for Webhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webhook").finish_non_exhaustive()
    }
}

impl Webhook {
    /// Build a verifier from a `whsec_...` secret. The prefix is optional.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::InvalidSecret` if the secret is not base64 or
    /// cannot key the MAC.
    pub fn new(secret: &str) -> Result<Self, VerifyError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded)
            .map_err(|_| VerifyError::InvalidSecret)?;
        let keyed = HmacSha256::new_from_slice(&key).map_err(|_| VerifyError::InvalidSecret)?;
        Ok(Self { keyed })
    }

    /// Verify a delivery against the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::verify_at`].
    pub fn verify(&self, headers: &SvixHeaders<'_>, payload: &[u8]) -> Result<(), VerifyError> {
        self.verify_at(headers, payload, chrono::Utc::now().timestamp())
    }

    /// Verify a delivery as of `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns a `VerifyError` if the timestamp is malformed or outside
    /// [`TOLERANCE_SECS`] of `now`, or if no `v1` signature matches.
    pub fn verify_at(
        &self,
        headers: &SvixHeaders<'_>,
        payload: &[u8],
        now: i64,
    ) -> Result<(), VerifyError> {
        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| VerifyError::InvalidTimestamp)?;
        if timestamp < now - TOLERANCE_SECS {
            return Err(VerifyError::TimestampTooOld);
        }
        if timestamp > now + TOLERANCE_SECS {
            return Err(VerifyError::TimestampTooNew);
        }

        let mac = self.mac(headers.id, timestamp, payload);
        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, encoded)| STANDARD.decode(encoded).ok())
            .any(|candidate| mac.clone().verify_slice(&candidate).is_ok());

        if matched {
            Ok(())
        } else {
            Err(VerifyError::NoMatchingSignature)
        }
    }

    /// Produce the `v1,<base64>` signature entry for a payload.
    #[must_use]
    pub fn sign(&self, id: &str, timestamp: i64, payload: &[u8]) -> String {
        let digest = self.mac(id, timestamp, payload).finalize().into_bytes();
        format!("{SIGNATURE_VERSION},{}", STANDARD.encode(digest))
    }

    fn mac(&self, id: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(format!("{id}.{timestamp}.").as_bytes());
        mac.update(payload);
        mac
    }
}
