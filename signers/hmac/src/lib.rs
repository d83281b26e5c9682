//! HMAC-SHA256 signing and verification capability for `httpsig-core`.

#![warn(missing_docs)]

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use httpsig_core::{SignMessage, VerifyMessage};
use sha2::Sha256;
use std::fmt::{self, Debug};

/// Keyed HMAC-SHA256 capability.
///
/// Implements both sides: signing produces the MAC over the signature base,
/// verification recomputes it and compares in constant time.
#[derive(Clone)]
pub struct HmacSha256 {
    key: Vec<u8>,
    key_id: Option<String>,
}

impl Debug for HmacSha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The key is secret material and must never end up in logs.
        f.debug_struct("HmacSha256")
            .field("key", &"***")
            .field("key_id", &self.key_id)
            .finish()
    }
}

impl HmacSha256 {
    /// Create a capability around the given shared key.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            key_id: None,
        }
    }

    /// Set the key identifier advertised in the `keyid` parameter.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    fn mac(&self) -> anyhow::Result<Hmac<Sha256>> {
        Ok(Hmac::<Sha256>::new_from_slice(&self.key)?)
    }
}

#[async_trait]
impl SignMessage for HmacSha256 {
    async fn sign_message(&self, base: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut mac = self.mac()?;
        mac.update(base);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn algorithm(&self) -> Option<&str> {
        Some("hmac-sha256")
    }
}

#[async_trait]
impl VerifyMessage for HmacSha256 {
    async fn verify_message(&self, base: &[u8], signature: &[u8]) -> anyhow::Result<()> {
        let mut mac = self.mac()?;
        mac.update(base);
        mac.verify_slice(signature)?;
        Ok(())
    }
}
