use crate::codec::base64_decode;
use crate::signer::{SIGNATURE, SIGNATURE_INPUT};
use crate::{Component, Error, Message, Result, SignatureBase, SignatureParams};
use async_trait::async_trait;
use log::debug;
use std::fmt::Debug;
use std::sync::Arc;

/// VerifyMessage is the capability used by the verifier to check raw
/// signature bytes against a rebuilt signature base.
#[async_trait]
pub trait VerifyMessage: Debug + Send + Sync + 'static {
    /// Check the signature over the signature base, rejecting with an error.
    async fn verify_message(&self, base: &[u8], signature: &[u8]) -> anyhow::Result<()>;
}

/// Verifier locates one labeled signature on a message, rebuilds the exact
/// signature base it committed to and delegates the check to the capability.
#[derive(Clone, Debug)]
pub struct Verifier {
    capability: Arc<dyn VerifyMessage>,
    label: String,
}

impl Verifier {
    /// Create a new verifier around a verification capability.
    pub fn new(capability: impl VerifyMessage) -> Self {
        Self {
            capability: Arc::new(capability),
            label: "sig1".to_string(),
        }
    }

    /// Set the label of the signature to verify, `sig1` by default.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Verify the labeled signature carried by the message.
    pub async fn verify(&self, message: Message<'_>) -> Result<()> {
        let headers = message.headers();

        let input = headers
            .get(&SIGNATURE_INPUT)
            .ok_or_else(|| Error::signature_invalid("Signature-Input header is absent"))?
            .to_str()
            .map_err(|e| {
                Error::encoding_failed("Signature-Input is not visible ASCII").with_source(e)
            })?;
        let signature = headers
            .get(&SIGNATURE)
            .ok_or_else(|| Error::signature_invalid("Signature header is absent"))?
            .to_str()
            .map_err(|e| Error::encoding_failed("Signature is not visible ASCII").with_source(e))?;

        let input_member = dict_member(input, &self.label).ok_or_else(|| {
            Error::signature_invalid(format!("no Signature-Input entry labeled {}", self.label))
        })?;
        let signature_member = dict_member(signature, &self.label).ok_or_else(|| {
            Error::signature_invalid(format!("no Signature entry labeled {}", self.label))
        })?;

        // Full grammar check of the member, even though the base reuses the
        // presented bytes verbatim.
        let (components, _params) = parse_signature_input(input_member)?;
        let signature = parse_signature(signature_member)?;

        let base = SignatureBase::rebuild(message, &components, input_member)?;
        debug!("rebuilt signature base: {}", base.as_str());

        self.capability
            .verify_message(base.as_bytes(), &signature)
            .await
            .map_err(|e| {
                Error::signature_invalid("verification capability rejected the signature")
                    .with_source(e)
            })
    }
}

/// Find the value of the labeled member in a structured-field dictionary.
fn dict_member<'a>(value: &'a str, label: &str) -> Option<&'a str> {
    split_outside_quotes(value, ',')
        .into_iter()
        .map(str::trim)
        .find_map(|member| {
            member
                .strip_prefix(label)
                .and_then(|rest| rest.strip_prefix('='))
        })
}

/// Parse a `Signature-Input` member value into its component list and
/// parameter set.
fn parse_signature_input(member: &str) -> Result<(Vec<Component>, SignatureParams)> {
    if !member.starts_with('(') {
        return Err(Error::encoding_failed(
            "Signature-Input member does not start with a component list",
        ));
    }

    let mut in_quotes = false;
    let mut close = None;
    for (i, c) in member.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ')' if !in_quotes => {
                close = Some(i);
                break;
            }
            _ => {}
        }
    }
    let close = close
        .ok_or_else(|| Error::encoding_failed("unterminated component list in Signature-Input"))?;

    let components = member[1..close]
        .split_whitespace()
        .map(|id| {
            id.strip_prefix('"')
                .and_then(|id| id.strip_suffix('"'))
                .ok_or_else(|| {
                    Error::encoding_failed(format!("component identifier {id} is not quoted"))
                })
                .and_then(Component::parse)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut params = SignatureParams::new();
    for pair in split_outside_quotes(&member[close + 1..], ';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::encoding_failed(format!("malformed signature parameter: {pair}")))?;
        match key {
            "created" => params.created = Some(parse_integer(value)?),
            "expires" => params.expires = Some(parse_integer(value)?),
            "nonce" => params.nonce = Some(unquote(value)?.to_string()),
            "alg" => params.alg = Some(unquote(value)?.to_string()),
            "keyid" => params.keyid = Some(unquote(value)?.to_string()),
            _ => {
                return Err(Error::encoding_failed(format!(
                    "unrecognized signature parameter: {key}"
                )))
            }
        }
    }

    Ok((components, params))
}

/// Parse a `Signature` member value into raw signature bytes.
fn parse_signature(member: &str) -> Result<Vec<u8>> {
    let encoded = member
        .strip_prefix(':')
        .and_then(|m| m.strip_suffix(':'))
        .ok_or_else(|| Error::encoding_failed("Signature member is not a byte sequence"))?;

    base64_decode(encoded)
}

fn parse_integer(value: &str) -> Result<i64> {
    value.parse().map_err(|e| {
        Error::encoding_failed(format!("signature parameter {value} is not an integer"))
            .with_source(e)
    })
}

fn unquote(value: &str) -> Result<&str> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| {
            Error::encoding_failed(format!("signature parameter value {value} is not quoted"))
        })
}

/// Split on a delimiter, ignoring occurrences inside double quotes or inside
/// a parenthesized inner list.
fn split_outside_quotes(value: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut depth = 0usize;

    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.saturating_sub(1),
            c if c == delimiter && !in_quotes && depth == 0 => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}
