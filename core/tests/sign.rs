use async_trait::async_trait;
use httpsig_core::{
    Component, ErrorKind, Message, SignMessage, SignatureHeaders, SignatureParams, Signer,
};
use pretty_assertions::assert_eq;

// SHA-256 of the empty string, standing in for real signature bytes.
const RAW_SIGNATURE: [u8; 32] = [
    227, 176, 196, 66, 152, 252, 28, 20, 154, 251, 244, 200, 153, 111, 185, 36, 39, 174, 65, 228,
    100, 155, 147, 76, 164, 149, 153, 27, 120, 82, 184, 85,
];
const ENCODED_SIGNATURE: &str = "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

/// Capability that asserts the exact base bytes it is asked to sign.
#[derive(Debug)]
struct StaticKey {
    expected_base: String,
}

impl StaticKey {
    fn new(expected_lines: &[&str]) -> Self {
        Self {
            expected_base: expected_lines.join("\n"),
        }
    }
}

#[async_trait]
impl SignMessage for StaticKey {
    async fn sign_message(&self, base: &[u8]) -> anyhow::Result<Vec<u8>> {
        assert_eq!(self.expected_base, std::str::from_utf8(base)?);
        Ok(RAW_SIGNATURE.to_vec())
    }

    fn key_id(&self) -> Option<&str> {
        Some("test-key")
    }

    fn algorithm(&self) -> Option<&str> {
        Some("hmac-sha256")
    }
}

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_request() -> http::request::Parts {
    let (parts, ()) = http::Request::builder()
        .method("POST")
        .uri("https://example.com/path?query=string")
        .header("Content-Type", "application/json")
        .header("Digest", "SHA-256=abcdef")
        .body(())
        .unwrap()
        .into_parts();
    parts
}

fn sample_response() -> http::response::Parts {
    let (parts, ()) = http::Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Digest", "SHA-256=abcdef")
        .header("X-Total", "200")
        .body(())
        .unwrap()
        .into_parts();
    parts
}

fn components(ids: &[&str]) -> Vec<Component> {
    ids.iter().map(|id| Component::parse(id).unwrap()).collect()
}

fn created() -> SignatureParams {
    SignatureParams::new().with_created(1681004344)
}

#[tokio::test]
async fn test_request_default_components() {
    init();

    let key = StaticKey::new(&[
        "\"@method\": POST",
        "\"@path\": /path",
        "\"@query\": ?query=string",
        "\"@authority\": example.com",
        "\"content-type\": application/json",
        "\"digest\": SHA-256=abcdef",
        "\"@signature-params\": (\"@method\" \"@path\" \"@query\" \"@authority\" \"content-type\" \"digest\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"",
    ]);

    let parts = sample_request();
    let headers = Signer::new(key)
        .with_params(created())
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap();

    assert_eq!(
        headers,
        SignatureHeaders {
            signature_input: "sig1=(\"@method\" \"@path\" \"@query\" \"@authority\" \"content-type\" \"digest\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"".to_string(),
            signature: format!("sig1=:{ENCODED_SIGNATURE}:"),
        }
    );
}

#[tokio::test]
async fn test_request_custom_components() {
    init();

    let key = StaticKey::new(&[
        "\"@authority\": example.com",
        "\"@method\": POST",
        "\"@path\": /path",
        "\"digest\": SHA-256=abcdef",
        "\"@signature-params\": (\"@authority\" \"@method\" \"@path\" \"digest\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"",
    ]);

    let parts = sample_request();
    let headers = Signer::new(key)
        .with_components(components(&["@authority", "@method", "@path", "digest"]))
        .with_params(created())
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap();

    assert_eq!(
        headers.signature_input,
        "sig1=(\"@authority\" \"@method\" \"@path\" \"digest\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\""
    );
    assert_eq!(headers.signature, format!("sig1=:{ENCODED_SIGNATURE}:"));
}

#[tokio::test]
async fn test_request_custom_label() {
    init();

    let key = StaticKey::new(&[
        "\"@authority\": example.com",
        "\"@signature-params\": (\"@authority\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"",
    ]);

    let parts = sample_request();
    let headers = Signer::new(key)
        .with_components(components(&["@authority"]))
        .with_params(created())
        .with_label("foo")
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap();

    // The label only changes the header prefix, never the signed content.
    assert_eq!(
        headers.signature_input,
        "foo=(\"@authority\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\""
    );
    assert_eq!(headers.signature, format!("foo=:{ENCODED_SIGNATURE}:"));
}

#[tokio::test]
async fn test_response_default_components() {
    init();

    let key = StaticKey::new(&[
        "\"@status\": 200",
        "\"content-type\": text/plain",
        "\"digest\": SHA-256=abcdef",
        "\"@signature-params\": (\"@status\" \"content-type\" \"digest\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"",
    ]);

    let parts = sample_response();
    let headers = Signer::new(key)
        .with_params(created())
        .signature_headers(Message::Response(&parts))
        .await
        .unwrap();

    assert_eq!(
        headers.signature_input,
        "sig1=(\"@status\" \"content-type\" \"digest\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\""
    );
    assert_eq!(headers.signature, format!("sig1=:{ENCODED_SIGNATURE}:"));
}

#[tokio::test]
async fn test_response_custom_components() {
    init();

    let key = StaticKey::new(&[
        "\"@status\": 200",
        "\"digest\": SHA-256=abcdef",
        "\"x-total\": 200",
        "\"@signature-params\": (\"@status\" \"digest\" \"x-total\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"",
    ]);

    let parts = sample_response();
    let headers = Signer::new(key)
        .with_components(components(&["@status", "digest", "x-total"]))
        .with_params(created())
        .signature_headers(Message::Response(&parts))
        .await
        .unwrap();

    assert_eq!(headers.signature, format!("sig1=:{ENCODED_SIGNATURE}:"));
}

#[tokio::test]
async fn test_explicit_params_win_over_capability_metadata() {
    init();

    let key = StaticKey::new(&[
        "\"@authority\": example.com",
        "\"@signature-params\": (\"@authority\");created=1681004344;keyid=\"other-key\";alg=\"ed25519\"",
    ]);

    let parts = sample_request();
    let headers = Signer::new(key)
        .with_components(components(&["@authority"]))
        .with_params(created().with_keyid("other-key").with_alg("ed25519"))
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap();

    assert_eq!(
        headers.signature_input,
        "sig1=(\"@authority\");created=1681004344;keyid=\"other-key\";alg=\"ed25519\""
    );
}

#[tokio::test]
async fn test_sign_request_inserts_headers() {
    init();

    let key = StaticKey::new(&[
        "\"@authority\": example.com",
        "\"@signature-params\": (\"@authority\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"",
    ]);

    let mut parts = sample_request();
    Signer::new(key)
        .with_components(components(&["@authority"]))
        .with_params(created())
        .sign_request(&mut parts)
        .await
        .unwrap();

    assert_eq!(
        parts.headers.get("signature-input").unwrap(),
        "sig1=(\"@authority\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\""
    );
    assert_eq!(
        parts.headers.get("signature").unwrap(),
        format!("sig1=:{ENCODED_SIGNATURE}:").as_str()
    );
}

#[tokio::test]
async fn test_explicit_missing_component_fails() {
    init();

    let key = StaticKey::new(&[]);
    let parts = sample_request();

    let err = Signer::new(key)
        .with_components(components(&["@method", "x-missing"]))
        .with_params(created())
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComponentMissing);
}

#[tokio::test]
async fn test_status_on_request_fails() {
    init();

    let key = StaticKey::new(&[]);
    let parts = sample_request();

    let err = Signer::new(key)
        .with_components(components(&["@status"]))
        .with_params(created())
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComponentInvalid);
}

#[tokio::test]
async fn test_method_on_response_fails() {
    init();

    let key = StaticKey::new(&[]);
    let parts = sample_response();

    let err = Signer::new(key)
        .with_components(components(&["@method"]))
        .with_params(created())
        .signature_headers(Message::Response(&parts))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComponentInvalid);
}

#[tokio::test]
async fn test_defaults_drop_absent_components() {
    init();

    // No query, no digest: both disappear from the default coverage.
    let key = StaticKey::new(&[
        "\"@method\": GET",
        "\"@path\": /path",
        "\"@authority\": example.com",
        "\"content-type\": application/json",
        "\"@signature-params\": (\"@method\" \"@path\" \"@authority\" \"content-type\");created=1681004344;keyid=\"test-key\";alg=\"hmac-sha256\"",
    ]);

    let (parts, ()) = http::Request::builder()
        .method("GET")
        .uri("https://example.com/path")
        .header("Content-Type", "application/json")
        .body(())
        .unwrap()
        .into_parts();

    let headers = Signer::new(key)
        .with_params(created())
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap();
    assert_eq!(headers.signature, format!("sig1=:{ENCODED_SIGNATURE}:"));
}

#[tokio::test]
async fn test_failing_capability_surfaces() {
    init();

    #[derive(Debug)]
    struct BrokenKey;

    #[async_trait]
    impl SignMessage for BrokenKey {
        async fn sign_message(&self, _: &[u8]) -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("key unavailable")
        }
    }

    let parts = sample_request();
    let err = Signer::new(BrokenKey)
        .with_components(components(&["@method"]))
        .with_params(created())
        .signature_headers(Message::Request(&parts))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SigningFailed);
}
