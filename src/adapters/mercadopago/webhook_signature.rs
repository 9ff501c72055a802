//! MercadoPago webhook signature verification.
//!
//! MercadoPago signs notifications with an `x-signature` header of the form
//! `ts=<unix seconds>,v1=<hex hmac>`. The HMAC-SHA256 is computed with the
//! webhook secret over the manifest
//! `id:<data.id>;request-id:<x-request-id>;ts:<ts>;`, where parts whose
//! value is absent are left out.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Missing x-signature header")]
    MissingHeader,
    #[error("Missing timestamp (ts=) in signature")]
    MissingTimestamp,
    #[error("Missing v1 signature in header")]
    MissingV1Signature,
    #[error("Invalid signature format (not valid hex)")]
    InvalidSignatureFormat,
    #[error("Signature does not match")]
    Mismatch,
    #[error("Signing key rejected: {0}")]
    Key(String),
}

/// Parsed `x-signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub ts: String,
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        if header.trim().is_empty() {
            return Err(SignatureError::MissingHeader);
        }

        let mut ts = None;
        let mut v1 = None;
        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match key.trim() {
                "ts" => ts = Some(value.trim().to_string()),
                "v1" => {
                    v1 = Some(
                        hex::decode(value.trim())
                            .map_err(|_| SignatureError::InvalidSignatureFormat)?,
                    )
                }
                _ => {}
            }
        }

        Ok(Self {
            ts: ts
                .filter(|t| !t.is_empty())
                .ok_or(SignatureError::MissingTimestamp)?,
            v1_signature: v1.ok_or(SignatureError::MissingV1Signature)?,
        })
    }
}

/// Verifies notification signatures with the shared webhook secret.
#[derive(Clone)]
pub struct WebhookSignatureVerifier {
    secret: SecretString,
}

impl WebhookSignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Checks `x-signature` against the notification's data id and
    /// `x-request-id`.
    pub fn verify(
        &self,
        signature_header: Option<&str>,
        request_id: Option<&str>,
        data_id: Option<&str>,
    ) -> Result<(), SignatureError> {
        let header = SignatureHeader::parse(signature_header.unwrap_or_default())?;
        let expected = self.sign(&manifest(data_id, request_id, &header.ts))?;

        if expected.as_slice().ct_eq(&header.v1_signature).unwrap_u8() != 1 {
            tracing::warn!(ts = %header.ts, "Invalid webhook signature");
            return Err(SignatureError::Mismatch);
        }
        Ok(())
    }

    /// Builds the `x-signature` value the provider would send for this
    /// notification. Used to replay notifications against a sandbox.
    pub fn signature_header(
        &self,
        data_id: &str,
        request_id: &str,
        ts: &str,
    ) -> Result<String, SignatureError> {
        let signature = self.sign(&manifest(Some(data_id), Some(request_id), ts))?;
        Ok(format!("ts={},v1={}", ts, hex::encode(&signature)))
    }

    fn sign(&self, manifest: &str) -> Result<Vec<u8>, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| SignatureError::Key(e.to_string()))?;
        mac.update(manifest.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Alphanumeric data ids are signed in lowercase.
fn manifest(data_id: Option<&str>, request_id: Option<&str>, ts: &str) -> String {
    let mut manifest = String::new();
    if let Some(id) = data_id.filter(|id| !id.is_empty()) {
        manifest.push_str(&format!("id:{};", id.to_lowercase()));
    }
    if let Some(request_id) = request_id.filter(|r| !r.is_empty()) {
        manifest.push_str(&format!("request-id:{};", request_id));
    }
    manifest.push_str(&format!("ts:{};", ts));
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    fn signed_header(data_id: &str, request_id: &str, ts: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(format!("id:{};request-id:{};ts:{};", data_id, request_id, ts).as_bytes());
        format!("ts={},v1={}", ts, hex::encode(&mac.finalize().into_bytes()))
    }

    #[test]
    fn accepts_valid_signature() {
        let header = signed_header("9001", "req-1", "1704908010");
        let verifier = WebhookSignatureVerifier::new(SECRET);

        assert!(verifier
            .verify(Some(&header), Some("req-1"), Some("9001"))
            .is_ok());
    }

    #[test]
    fn lowercases_alphanumeric_data_id() {
        let header = signed_header("pre_abc", "req-1", "1704908010");
        let verifier = WebhookSignatureVerifier::new(SECRET);

        assert!(verifier
            .verify(Some(&header), Some("req-1"), Some("PRE_ABC"))
            .is_ok());
    }

    #[test]
    fn rejects_tampered_data_id() {
        let header = signed_header("9001", "req-1", "1704908010");
        let verifier = WebhookSignatureVerifier::new(SECRET);

        let result = verifier.verify(Some(&header), Some("req-1"), Some("9002"));

        assert_eq!(result, Err(SignatureError::Mismatch));
    }

    #[test]
    fn rejects_other_secret() {
        let header = signed_header("9001", "req-1", "1704908010");
        let verifier = WebhookSignatureVerifier::new("another");

        assert_eq!(
            verifier.verify(Some(&header), Some("req-1"), Some("9001")),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn signature_header_is_accepted_by_verify() {
        let verifier = WebhookSignatureVerifier::new(SECRET);
        let header = verifier
            .signature_header("9001", "req-2", "1704908011")
            .unwrap();

        assert_eq!(header, signed_header("9001", "req-2", "1704908011"));
        assert!(verifier
            .verify(Some(&header), Some("req-2"), Some("9001"))
            .is_ok());
    }

    #[test]
    fn rejects_missing_header() {
        let verifier = WebhookSignatureVerifier::new(SECRET);
        assert_eq!(
            verifier.verify(None, Some("req-1"), Some("9001")),
            Err(SignatureError::MissingHeader)
        );
    }

    #[test]
    fn parse_requires_ts_and_v1() {
        assert_eq!(
            SignatureHeader::parse("v1=abcd"),
            Err(SignatureError::MissingTimestamp)
        );
        assert_eq!(
            SignatureHeader::parse("ts=1"),
            Err(SignatureError::MissingV1Signature)
        );
        assert_eq!(
            SignatureHeader::parse("ts=1,v1=xyz"),
            Err(SignatureError::InvalidSignatureFormat)
        );
    }

    #[test]
    fn parse_rejects_odd_length_hex() {
        assert_eq!(
            SignatureHeader::parse("ts=1,v1=abc"),
            Err(SignatureError::InvalidSignatureFormat)
        );
        let header = SignatureHeader::parse("ts=1,v1=00FF").unwrap();
        assert_eq!(header.v1_signature, vec![0x00, 0xff]);
    }

    #[test]
    fn manifest_omits_absent_parts() {
        assert_eq!(manifest(None, None, "5"), "ts:5;");
        assert_eq!(
            manifest(Some("42"), Some("r"), "5"),
            "id:42;request-id:r;ts:5;"
        );
    }
}
