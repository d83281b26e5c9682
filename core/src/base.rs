use crate::{Component, Message, Result};
use chrono::Utc;
use std::fmt::Write;

/// Parameters attached to the signature.
///
/// Whatever subset is present is serialized in a fixed relative order:
/// created, expires, nonce, keyid, alg. Integer values are unquoted, string
/// values double-quoted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureParams {
    /// Unix timestamp the signature was created at.
    ///
    /// Defaults to the current time at composition when unset.
    pub created: Option<i64>,

    /// Unix timestamp the signature expires at.
    pub expires: Option<i64>,

    /// Single-use value chosen by the signer.
    pub nonce: Option<String>,

    /// Identifier of the signing key.
    pub keyid: Option<String>,

    /// Label of the signature algorithm.
    pub alg: Option<String>,
}

impl SignatureParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the created timestamp.
    pub fn with_created(mut self, created: i64) -> Self {
        self.created = Some(created);
        self
    }

    /// Set the expires timestamp.
    pub fn with_expires(mut self, expires: i64) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Set the nonce.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Set the algorithm label.
    pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }

    /// Set the key identifier.
    pub fn with_keyid(mut self, keyid: impl Into<String>) -> Self {
        self.keyid = Some(keyid.into());
        self
    }

    fn serialize_into(&self, out: &mut String) -> Result<()> {
        if let Some(created) = self.created {
            write!(out, ";created={created}")?;
        }
        if let Some(expires) = self.expires {
            write!(out, ";expires={expires}")?;
        }
        if let Some(nonce) = &self.nonce {
            write!(out, ";nonce=\"{nonce}\"")?;
        }
        if let Some(keyid) = &self.keyid {
            write!(out, ";keyid=\"{keyid}\"")?;
        }
        if let Some(alg) = &self.alg {
            write!(out, ";alg=\"{alg}\"")?;
        }
        Ok(())
    }
}

/// The exact bytes to be signed, together with the `Signature-Input` member
/// value that commits to them.
///
/// Ephemeral: rebuilt on every call, never cached.
#[derive(Debug)]
pub struct SignatureBase {
    base: String,
    signature_input: String,
}

impl SignatureBase {
    /// Compose the signature base for the given components and parameters.
    ///
    /// Components are resolved and serialized strictly in list order, with no
    /// sorting and no deduplication. A missing `created` parameter is filled
    /// with the current time before serialization.
    pub fn build(
        message: Message<'_>,
        components: &[Component],
        params: &SignatureParams,
    ) -> Result<Self> {
        let mut params = params.clone();
        if params.created.is_none() {
            params.created = Some(Utc::now().timestamp());
        }

        let mut signature_input = serialize_component_list(components);
        params.serialize_into(&mut signature_input)?;

        Self::rebuild(message, components, &signature_input)
    }

    /// Compose around an already-serialized `Signature-Input` member value.
    ///
    /// Verification must sign-check the exact bytes the signer committed to,
    /// so the `@signature-params` line reproduces the presented member value
    /// verbatim instead of re-serializing parsed parameters.
    pub(crate) fn rebuild(
        message: Message<'_>,
        components: &[Component],
        signature_input: &str,
    ) -> Result<Self> {
        let mut base = String::with_capacity(256);
        for component in components {
            let value = component.resolve(message)?;
            writeln!(base, "\"{}\": {value}", component.as_str())?;
        }

        write!(base, "\"@signature-params\": {signature_input}")?;

        Ok(Self {
            base,
            signature_input: signature_input.to_string(),
        })
    }

    /// The signature base as a string.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// The signature base as the bytes handed to the signing capability.
    pub fn as_bytes(&self) -> &[u8] {
        self.base.as_bytes()
    }

    /// The `Signature-Input` member value: component list plus parameters,
    /// byte-identical to the content of the `@signature-params` line.
    pub fn signature_input(&self) -> &str {
        &self.signature_input
    }
}

/// Serialize a component list as a parenthesized, space-separated sequence of
/// double-quoted identifiers, preserving input order.
fn serialize_component_list(components: &[Component]) -> String {
    let mut out = String::with_capacity(64);
    out.push('(');
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push('"');
        out.push_str(component.as_str());
        out.push('"');
    }
    out.push(')');
    out
}
