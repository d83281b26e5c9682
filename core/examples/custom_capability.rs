use async_trait::async_trait;
use httpsig_core::{Message, Result, SignMessage, SignatureParams, Signer};

// A capability standing in for whatever actually holds the key: an HSM, a
// remote signing service, or a local keypair. Here it just reverses the
// base so the example runs without key material.
#[derive(Debug)]
struct DemoCapability;

#[async_trait]
impl SignMessage for DemoCapability {
    async fn sign_message(&self, base: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(base.iter().rev().copied().collect())
    }

    fn key_id(&self) -> Option<&str> {
        Some("demo-key")
    }

    fn algorithm(&self) -> Option<&str> {
        Some("demo")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (parts, ()) = http::Request::builder()
        .method("POST")
        .uri("https://example.com/path?query=string")
        .header("content-type", "application/json")
        .body(())
        .unwrap()
        .into_parts();

    let signer = Signer::new(DemoCapability)
        .with_params(SignatureParams::new().with_created(1681004344));
    let headers = signer.signature_headers(Message::Request(&parts)).await?;

    println!("Signature-Input: {}", headers.signature_input);
    println!("Signature: {}", headers.signature);

    Ok(())
}
