//! # Provider Traits
//!
//! Collaborators injected by the wallet application: HTTP transport, the
//! external authorization UI, the token exchange, holder-key proof
//! signing, and an optional issuer trust policy. The engine drives the
//! issuance flow; these traits supply everything that happens out of
//! process.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

pub use crate::http::HttpResponse;
use crate::types::{CredentialOffer, PreparedRequest, TokenRequest, TokenResponse};

/// Everything a wallet must supply to run an issuance flow.
pub trait Provider:
    HttpClient + Authorizer + TokenClient + ProofSigner + TrustPolicy + Clone
{
}

/// Blanket implementation so any type implementing the required super
/// traits is a `Provider`.
impl<T> Provider for T where
    T: HttpClient + Authorizer + TokenClient + ProofSigner + TrustPolicy + Clone
{
}

/// Thin HTTP transport used by all fetchers. Implementations must bound
/// each request by the supplied timeout.
pub trait HttpClient: Send + Sync {
    /// GET the URL with the given headers.
    fn get(
        &self, url: &str, headers: &[(&str, &str)], timeout: Duration,
    ) -> impl Future<Output = Result<HttpResponse>> + Send;

    /// Send a previously constructed request.
    fn send(
        &self, request: &PreparedRequest, timeout: Duration,
    ) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// Hands the authorization URL to an external UI and resumes with the
/// authorization code once the user completes authorization. Awaited at
/// most once per issuance attempt; dropping the flow drops the pending
/// future.
pub trait Authorizer: Send + Sync {
    /// Authorize the user via the given URL, returning the authorization
    /// code captured from the redirect.
    fn authorize(&self, auth_url: &str) -> impl Future<Output = Result<String>> + Send;

    /// Collect the Transaction Code from the End-User for a
    /// pre-authorized offer that demands one.
    fn tx_code(&self) -> impl Future<Output = Result<String>> + Send {
        async { Err(anyhow::anyhow!("transaction code required but no provider configured")) }
    }
}

/// Performs the token exchange: an `application/x-www-form-urlencoded`
/// POST of the request to the token endpoint.
pub trait TokenClient: Send + Sync {
    /// Exchange the grant in `request` for an access token.
    fn token(
        &self, token_endpoint: &str, request: &TokenRequest,
    ) -> impl Future<Output = Result<TokenResponse>> + Send;
}

/// Produces the holder-key proof JWT bound to a server-supplied nonce.
pub trait ProofSigner: Send + Sync {
    /// Sign a proof JWT for `credential_issuer`, binding `c_nonce` when
    /// the issuer supplied one. `algorithms` lists the signing algorithms
    /// the issuer accepts (may be empty).
    fn proof_jwt(
        &self, credential_issuer: &str, c_nonce: Option<&str>, algorithms: &[String],
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Optional check of a resolved offer before the flow proceeds. The
/// default accepts every issuer.
pub trait TrustPolicy: Send + Sync {
    /// Return an error to abort issuance for an untrusted issuer.
    fn check_trust(&self, offer: &CredentialOffer) -> impl Future<Output = Result<()>> + Send {
        let _ = offer;
        async { Ok(()) }
    }
}
