//! Canonical construction and verification of HTTP Message Signatures.
//!
//! This crate implements the canonicalization core of the HTTP Message
//! Signatures model: it resolves named message components (derived values
//! like `@method` and `@path`, or header values) against a request or
//! response, serializes them into the exact signature base string that gets
//! signed, and packages the result into the `Signature-Input` and
//! `Signature` header values.
//!
//! The cryptographic primitive itself is a pluggable capability: anything
//! implementing [`SignMessage`] (or [`VerifyMessage`] on the checking side)
//! can be plugged in, synchronous or not. The `httpsig-hmac` crate ships an
//! HMAC-SHA256 implementation.
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use httpsig_core::{SignMessage, SignatureParams, Signer};
//!
//! #[derive(Debug)]
//! struct MyKey;
//!
//! #[async_trait]
//! impl SignMessage for MyKey {
//!     async fn sign_message(&self, base: &[u8]) -> anyhow::Result<Vec<u8>> {
//!         // Hand the base to an HSM, a remote service, or a local key.
//!         todo!()
//!     }
//!
//!     fn key_id(&self) -> Option<&str> {
//!         Some("my-key")
//!     }
//! }
//!
//! # async fn example() -> httpsig_core::Result<()> {
//! let (mut parts, ()) = http::Request::builder()
//!     .method("POST")
//!     .uri("https://example.com/path?query=string")
//!     .header("content-type", "application/json")
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//!
//! let signer = Signer::new(MyKey).with_params(SignatureParams::new().with_created(1681004344));
//! signer.sign_request(&mut parts).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod codec;

mod base;
pub use base::{SignatureBase, SignatureParams};
mod component;
pub use component::Component;
mod error;
pub use error::{Error, ErrorKind, Result};
mod message;
pub use message::Message;
mod signer;
pub use signer::{SignMessage, SignatureHeaders, Signer, SIGNATURE, SIGNATURE_INPUT};
mod verify;
pub use verify::{Verifier, VerifyMessage};
