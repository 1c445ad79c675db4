//! # Authorization Server Resolution
//!
//! Locates the authorization server for an issuance attempt, fetches its
//! metadata, and assembles the authorization-endpoint URL handed to the
//! external authorization UI.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::pkce::PkceSession;
use crate::provider::HttpClient;
use crate::types::{ClientMetadata, CredentialOffer, IssuerMetadata};

const AS_WELL_KNOWN_SUFFIX: &str = "/.well-known/oauth-authorization-server";

/// Authorization server endpoints relevant to the issuance flow.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthorizationServerMetadata {
    /// The endpoint the user is sent to for interactive authorization.
    pub authorization_endpoint: Option<String>,

    /// The endpoint codes are exchanged at. Used when the issuer metadata
    /// does not publish its own `token_endpoint`.
    pub token_endpoint: Option<String>,
}

/// Fetch metadata for the authorization server governing this attempt:
/// the offer's grant hint when present, else the first entry of the
/// issuer's `authorization_servers`, else the issuer itself.
///
/// # Errors
///
/// Returns [`Error::MetadataFetch`] if the metadata cannot be fetched or
/// parsed.
pub async fn resolve_server(
    http: &impl HttpClient, issuer_metadata: &IssuerMetadata, offer: Option<&CredentialOffer>,
    timeout: Duration,
) -> Result<AuthorizationServerMetadata> {
    let hinted = offer.and_then(|offer| {
        offer
            .authorization_code()
            .and_then(|grant| grant.authorization_server.as_deref())
            .or_else(|| {
                offer
                    .pre_authorized_code()
                    .and_then(|grant| grant.authorization_server.as_deref())
            })
    });
    let server = hinted
        .or_else(|| {
            issuer_metadata
                .authorization_servers
                .as_ref()
                .and_then(|servers| servers.first())
                .map(String::as_str)
        })
        .unwrap_or(&issuer_metadata.credential_issuer);

    let url = format!("{server}{AS_WELL_KNOWN_SUFFIX}");
    tracing::debug!("fetching authorization server metadata from {url}");

    let response = http.get(&url, &[], timeout).await.map_err(|e| {
        Error::MetadataFetch(format!("failed to fetch authorization server metadata: {e:#}"))
    })?;
    if !response.status.is_success() {
        return Err(Error::MetadataFetch(format!(
            "authorization server metadata request returned {}: {}",
            response.status, response.body
        )));
    }
    serde_json::from_str(&response.body).map_err(|e| {
        Error::MetadataFetch(format!("failed to parse authorization server metadata: {e}"))
    })
}

/// Assemble the authorization-endpoint URL from the client metadata, the
/// attempt's PKCE session, and the issuer scope. Pure function;
/// `code_challenge_method` is always `S256`.
///
/// # Errors
///
/// Returns [`Error::MetadataFetch`] if `authorization_endpoint` is not a
/// valid URL.
pub fn build_authorization_url(
    authorization_endpoint: &str, client: &ClientMetadata, scope: &str, session: &PkceSession,
    issuer_state: Option<&str>,
) -> Result<String> {
    let mut url = Url::parse(authorization_endpoint)
        .map_err(|e| Error::MetadataFetch(format!("invalid authorization endpoint: {e}")))?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &client.client_id)
        .append_pair("redirect_uri", &client.redirect_uri)
        .append_pair("scope", scope)
        .append_pair("state", &session.state)
        .append_pair("code_challenge", &session.code_challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("nonce", &session.nonce);
    // offered grants may bind the request back to the offer context
    if let Some(issuer_state) = issuer_state {
        url.query_pairs_mut().append_pair("issuer_state", issuer_state);
    }

    Ok(url.into())
}
