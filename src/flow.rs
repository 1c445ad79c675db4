//! # Issuance Flow
//!
//! Drives a complete issuance attempt: offer resolution, trust check,
//! metadata resolution, the grant-specific authorization and token
//! exchange, and the final credential download. Each attempt owns its
//! own PKCE session and awaits the external authorizer at most once.

use std::time::Duration;

use crate::authorization::{build_authorization_url, resolve_server};
use crate::error::{Error, Result};
use crate::metadata::MetadataService;
use crate::provider::Provider;
use crate::request::create_credential_request;
use crate::token::access_token;
use crate::types::{
    ClientMetadata, CredentialOffer, CredentialResponse, IssuerMetadata, Proof, TokenGrantType,
    TokenResponse,
};
use crate::{offer, pkce};

/// Default bound on each network request within a flow.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-flow timing configuration.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// Bound on the wait for the external authorizer to return a code.
    /// `None` waits indefinitely.
    pub authorization_timeout: Option<Duration>,

    /// Bound on each network request (metadata, offer, token, download).
    pub download_timeout: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self { authorization_timeout: None, download_timeout: DEFAULT_DOWNLOAD_TIMEOUT }
    }
}

/// Run a full issuance flow starting from a scanned offer string.
///
/// Resolves and validates the offer, applies the provider's trust policy,
/// resolves issuer metadata for the offer's first credential
/// configuration, then follows the offered grant: pre-authorized when
/// present, interactive authorization code otherwise.
///
/// # Errors
///
/// Propagates typed errors from each stage unchanged.
pub async fn credential_by_offer(
    provider: &impl Provider, client: &ClientMetadata, metadata: &MetadataService,
    offer_string: &str, config: &FlowConfig,
) -> Result<CredentialResponse> {
    let offer = offer::resolve_offer(provider, offer_string, config.download_timeout).await?;
    provider.check_trust(&offer).await.map_err(Error::from)?;

    // validate() guarantees at least one configuration id
    let configuration_id = &offer.credential_configuration_ids[0];
    let issuer_metadata = metadata
        .resolve(provider, &offer.credential_issuer, configuration_id, config.download_timeout)
        .await?;

    if offer.pre_authorized_code().is_some() {
        pre_authorized(provider, client, &issuer_metadata, &offer, config).await
    } else {
        issue_with_authorization(provider, client, &issuer_metadata, Some(&offer), config).await
    }
}

/// Run the interactive authorization-code flow against resolved issuer
/// metadata, with or without an originating offer.
///
/// A fresh PKCE session is created per attempt. The external authorizer
/// is awaited at most once; when `config.authorization_timeout` is set
/// and elapses, the attempt fails with [`Error::Timeout`] and the pending
/// authorization is dropped.
///
/// # Errors
///
/// Returns [`Error::MetadataFetch`] when the authorization server
/// publishes no authorization endpoint or no token endpoint can be
/// located, [`Error::Timeout`] when the authorization wait expires, and
/// otherwise propagates stage errors unchanged.
pub async fn issue_with_authorization(
    provider: &impl Provider, client: &ClientMetadata, issuer_metadata: &IssuerMetadata,
    offer: Option<&CredentialOffer>, config: &FlowConfig,
) -> Result<CredentialResponse> {
    let session = pkce::PkceSession::new();
    let server =
        resolve_server(provider, issuer_metadata, offer, config.download_timeout).await?;

    let Some(authorization_endpoint) = server.authorization_endpoint.as_deref() else {
        return Err(Error::MetadataFetch(
            "authorization server metadata has no authorization_endpoint".to_string(),
        ));
    };
    let token_endpoint = issuer_metadata
        .token_endpoint
        .clone()
        .or(server.token_endpoint)
        .ok_or_else(|| Error::MetadataFetch("missing token_endpoint".to_string()))?;

    let issuer_state = offer
        .and_then(CredentialOffer::authorization_code)
        .and_then(|grant| grant.issuer_state.as_deref());
    let auth_url = build_authorization_url(
        authorization_endpoint,
        client,
        &issuer_metadata.scope,
        &session,
        issuer_state,
    )?;
    tracing::debug!("awaiting authorization at {authorization_endpoint}");

    let authorize = provider.authorize(&auth_url);
    let code = match config.authorization_timeout {
        Some(timeout) => tokio::time::timeout(timeout, authorize).await.map_err(|_| {
            Error::Timeout("authorization was not completed in time".to_string())
        })?,
        None => authorize.await,
    }
    .map_err(Error::from)?;

    let grant = TokenGrantType::AuthorizationCode {
        code,
        code_verifier: Some(session.code_verifier.clone()),
    };
    let token = access_token(provider, &token_endpoint, grant, client).await?;

    request_and_download(provider, issuer_metadata, &token, config).await
}

/// Run the pre-authorized flow: no browser interaction, only the
/// transaction code challenge when the offer demands one.
async fn pre_authorized(
    provider: &impl Provider, client: &ClientMetadata, issuer_metadata: &IssuerMetadata,
    offer: &CredentialOffer, config: &FlowConfig,
) -> Result<CredentialResponse> {
    // checked by the caller
    let Some(grant) = offer.pre_authorized_code() else {
        return Err(Error::OfferFetch("offer has no pre-authorized grant".to_string()));
    };

    let tx_code = if grant.tx_code.is_some() {
        Some(provider.tx_code().await.map_err(Error::from)?)
    } else {
        None
    };

    let token_endpoint = match issuer_metadata.token_endpoint.clone() {
        Some(endpoint) => endpoint,
        None => {
            let server =
                resolve_server(provider, issuer_metadata, Some(offer), config.download_timeout)
                    .await?;
            server
                .token_endpoint
                .ok_or_else(|| Error::MetadataFetch("missing token_endpoint".to_string()))?
        }
    };

    let grant = TokenGrantType::PreAuthorizedCode {
        pre_authorized_code: grant.pre_authorized_code.clone(),
        tx_code,
    };
    let token = access_token(provider, &token_endpoint, grant, client).await?;

    request_and_download(provider, issuer_metadata, &token, config).await
}

/// Sign the proof, build the format-specific request, and download the
/// credential.
async fn request_and_download(
    provider: &impl Provider, issuer_metadata: &IssuerMetadata, token: &TokenResponse,
    config: &FlowConfig,
) -> Result<CredentialResponse> {
    let jwt = provider
        .proof_jwt(
            &issuer_metadata.credential_issuer,
            token.c_nonce.as_deref(),
            &issuer_metadata.proof_signing_algorithms,
        )
        .await
        .map_err(Error::from)?;
    let proof = Proof::jwt(jwt);

    let request = create_credential_request(
        issuer_metadata.profile.format(),
        &token.access_token,
        issuer_metadata,
        &proof,
    )?;

    tracing::debug!("downloading credential from {}", request.url);
    let response =
        provider.send(&request, config.download_timeout).await.map_err(Error::from)?;

    if response.status == http::StatusCode::UNAUTHORIZED {
        return Err(Error::InvalidAccessToken(format!(
            "credential endpoint rejected the access token: {}",
            response.body
        )));
    }
    if !response.status.is_success() {
        return Err(Error::Download(format!(
            "credential endpoint returned {}: {}",
            response.status, response.body
        )));
    }
    if response.body.trim().is_empty() {
        return Err(Error::Download(format!(
            "empty response from {}",
            request.url
        )));
    }

    CredentialResponse::from_body(&response.body)
}
