//! # PKCE
//!
//! Proof Key for Code Exchange ([RFC 7636]) session material for one
//! authorization attempt: code verifier, S256 challenge, and the `state`
//! and `nonce` identifiers carried in the authorization request.
//!
//! [RFC 7636]: https://www.rfc-editor.org/rfc/rfc7636

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

// bytes of entropy behind the verifier (86 base64url characters)
const VERIFIER_BYTES: usize = 64;

/// Single-use PKCE material. Owned by exactly one issuance attempt and
/// never reused across attempts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkceSession {
    /// High-entropy code verifier, 43-128 unreserved characters.
    pub code_verifier: String,

    /// `base64url(SHA-256(code_verifier))`, sent with the authorization
    /// request as `code_challenge`.
    pub code_challenge: String,

    /// Opaque value binding the authorization response to this attempt.
    pub state: String,

    /// Nonce forwarded to the authorization endpoint.
    pub nonce: String,
}

impl PkceSession {
    /// Generate a fresh session. Every call yields statistically
    /// independent verifier, challenge, state, and nonce values.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; VERIFIER_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let code_verifier = Base64UrlUnpadded::encode_string(&bytes);
        let code_challenge = code_challenge(&code_verifier);

        Self {
            code_verifier,
            code_challenge,
            state: identifier(),
            nonce: identifier(),
        }
    }
}

impl Default for PkceSession {
    fn default() -> Self {
        Self::new()
    }
}

/// S256 code challenge for the given verifier: SHA-256 over the verifier's
/// UTF-8 bytes, base64url-encoded without padding.
#[must_use]
pub fn code_challenge(code_verifier: &str) -> String {
    Base64UrlUnpadded::encode_string(&Sha256::digest(code_verifier.as_bytes()))
}

// Hyphen-less UUIDv4, used for both `state` and `nonce`.
fn identifier() -> String {
    Uuid::new_v4().simple().to_string()
}
