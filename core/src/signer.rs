use crate::codec::base64_encode;
use crate::{Component, Error, Message, Result, SignatureBase, SignatureParams};
use async_trait::async_trait;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue};
use log::debug;
use std::fmt::Debug;
use std::sync::Arc;

/// Name of the `Signature-Input` header.
pub static SIGNATURE_INPUT: HeaderName = HeaderName::from_static("signature-input");

/// Name of the `Signature` header.
pub static SIGNATURE: HeaderName = HeaderName::from_static("signature");

/// SignMessage is the capability used by the signer to transform the
/// signature base into raw signature bytes.
///
/// The capability owns its key material and may be synchronous or
/// asynchronous; the signer awaits it exactly once per call and never
/// retries it.
#[async_trait]
pub trait SignMessage: Debug + Send + Sync + 'static {
    /// Sign the signature base and return the raw signature bytes.
    async fn sign_message(&self, base: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Identifier of the signing key, used to default the `keyid` parameter.
    fn key_id(&self) -> Option<&str> {
        None
    }

    /// Label of the signature algorithm, used to default the `alg` parameter.
    fn algorithm(&self) -> Option<&str> {
        None
    }
}

/// The two header values carrying one signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureHeaders {
    /// Value of the `Signature-Input` header: `<label>=(<list>)<params>`.
    pub signature_input: String,

    /// Value of the `Signature` header: `<label>=:<base64>:`.
    pub signature: String,
}

/// Signer composes the signature base for a message and packages the signing
/// capability's output into the two signature headers.
#[derive(Clone, Debug)]
pub struct Signer {
    capability: Arc<dyn SignMessage>,
    components: Option<Vec<Component>>,
    params: SignatureParams,
    label: String,
}

impl Signer {
    /// Create a new signer around a signing capability.
    pub fn new(capability: impl SignMessage) -> Self {
        Self {
            capability: Arc::new(capability),
            components: None,
            params: SignatureParams::new(),
            label: "sig1".to_string(),
        }
    }

    /// Cover an explicit component list instead of the default one.
    ///
    /// Explicit lists are strict: a component absent from the message fails
    /// the whole call rather than being dropped.
    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = Some(components);
        self
    }

    /// Set the signature parameters.
    ///
    /// An unset `keyid`/`alg` falls back to the capability's metadata, an
    /// unset `created` to the current time at composition.
    pub fn with_params(mut self, params: SignatureParams) -> Self {
        self.params = params;
        self
    }

    /// Set the label distinguishing this signature, `sig1` by default.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Produce the `Signature-Input` and `Signature` values for the message.
    pub async fn signature_headers(&self, message: Message<'_>) -> Result<SignatureHeaders> {
        let components = match &self.components {
            Some(components) => components.clone(),
            None => Component::defaults(message),
        };

        let mut params = self.params.clone();
        if params.keyid.is_none() {
            params.keyid = self.capability.key_id().map(Into::into);
        }
        if params.alg.is_none() {
            params.alg = self.capability.algorithm().map(Into::into);
        }

        let base = SignatureBase::build(message, &components, &params)?;
        debug!("calculated signature base: {}", base.as_str());

        let signature = self
            .capability
            .sign_message(base.as_bytes())
            .await
            .map_err(|e| {
                Error::signing_failed("signing capability rejected the signature base")
                    .with_source(e)
            })?;

        Ok(SignatureHeaders {
            signature_input: format!("{}={}", self.label, base.signature_input()),
            signature: format!("{}=:{}:", self.label, base64_encode(&signature)),
        })
    }

    /// Sign a request and insert the two signature headers into its parts.
    pub async fn sign_request(&self, parts: &mut http::request::Parts) -> Result<()> {
        let headers = self.signature_headers(Message::Request(parts)).await?;
        apply(&mut parts.headers, headers)
    }

    /// Sign a response and insert the two signature headers into its parts.
    pub async fn sign_response(&self, parts: &mut http::response::Parts) -> Result<()> {
        let headers = self.signature_headers(Message::Response(parts)).await?;
        apply(&mut parts.headers, headers)
    }
}

fn apply(headers: &mut HeaderMap, produced: SignatureHeaders) -> Result<()> {
    headers.insert(
        SIGNATURE_INPUT.clone(),
        HeaderValue::from_str(&produced.signature_input)?,
    );
    headers.insert(
        SIGNATURE.clone(),
        HeaderValue::from_str(&produced.signature)?,
    );
    Ok(())
}
