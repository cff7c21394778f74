//! Slack request signature verification.
//!
//! Slack signs every webhook request with
//! `v0=hex(HMAC-SHA256(signing_secret, "v0:{timestamp}:{raw_body}"))`
//! and sends it in `X-Slack-Signature` alongside `X-Slack-Request-Timestamp`.
//! Requests older than [`MAX_REQUEST_AGE_SECS`] are rejected to limit replay.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::ServerError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the request timestamp (Unix seconds).
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Maximum accepted clock skew between Slack and this server.
pub const MAX_REQUEST_AGE_SECS: u64 = 60 * 5;

const VERSION: &str = "v0";

/// Computes the `v0=...` signature for a timestamp and body.
///
/// # Examples
///
/// ```
/// use kestra_slackbot::signature::sign;
///
/// let sig = sign("secret", "1700000000", b"{}");
/// assert!(sig.starts_with("v0="));
/// assert_eq!(sig.len(), 3 + 64);
/// ```
pub fn sign(signing_secret: &str, timestamp: &str, body: &[u8]) -> String {
    let digest = mac_for(signing_secret, timestamp, body)
        .finalize()
        .into_bytes();
    format!("{VERSION}={}", hex::encode(digest))
}

/// Verifies the signature headers of an inbound request against its raw body.
///
/// `now` is the current Unix time in seconds.
///
/// # Errors
///
/// Returns `ServerError::Signature` if a header is missing or malformed, the
/// timestamp is outside the accepted window, or the signature does not match.
pub fn verify(
    signing_secret: &str,
    headers: &HeaderMap,
    body: &[u8],
    now: i64,
) -> Result<(), ServerError> {
    let timestamp = header_str(headers, TIMESTAMP_HEADER)?;
    let signature = header_str(headers, SIGNATURE_HEADER)?;

    let sent_at: i64 = timestamp
        .parse()
        .map_err(|_| ServerError::Signature(format!("invalid timestamp '{timestamp}'")))?;
    if sent_at.abs_diff(now) > MAX_REQUEST_AGE_SECS {
        return Err(ServerError::Signature("request timestamp too old".into()));
    }

    let digest = signature
        .strip_prefix(&format!("{VERSION}="))
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
        .ok_or_else(|| ServerError::Signature("malformed signature".into()))?;

    mac_for(signing_secret, timestamp, body)
        .verify_slice(&digest)
        .map_err(|_| ServerError::Signature("signature mismatch".into()))
}

fn mac_for(signing_secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ServerError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServerError::Signature(format!("missing {name} header")))
}
