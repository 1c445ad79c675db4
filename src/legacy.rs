//! # Legacy Download Helper
//!
//! The single-shot credential download retained for callers of the old
//! contract: flat issuer metadata supplied directly by the caller, no
//! offer, no token exchange, and a null-returning success path on an
//! empty body. Kept isolated from the flow orchestration; new code
//! should use [`HolderClient`](crate::HolderClient).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::provider::HttpClient;
use crate::request::create_credential_request;
use crate::types::{
    CredentialDefinition, CredentialFormat, CredentialResponse, FormatProfile, IssuerMetadata,
    Proof,
};

/// Caller-assembled issuer metadata for the legacy download path.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LegacyIssuerMetadata {
    /// The audience value, used as the credential issuer identifier.
    pub credential_audience: String,

    /// The endpoint the download request is sent to.
    pub credential_endpoint: String,

    /// The requested credential format.
    pub credential_format: CredentialFormat,

    /// W3C credential type values, for `ldp_vc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<Vec<String>>,

    /// The mdoc document type, for `mso_mdoc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctype: Option<String>,

    /// Claims to request, for `mso_mdoc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Map<String, Value>>,

    /// Bound on the download request, in milliseconds.
    pub download_timeout_ms: u64,
}

impl LegacyIssuerMetadata {
    fn into_typed(self) -> Result<IssuerMetadata> {
        let profile = match self.credential_format {
            CredentialFormat::LdpVc => FormatProfile::LdpVc {
                credential_definition: CredentialDefinition {
                    context: vec![],
                    r#type: self.credential_type.unwrap_or_default(),
                },
            },
            CredentialFormat::MsoMdoc => FormatProfile::MsoMdoc {
                doctype: self.doctype.unwrap_or_default(),
                claims: self.claims,
            },
            format => {
                return Err(Error::InvalidData(format!(
                    "legacy download does not support format {format}"
                )));
            }
        };

        Ok(IssuerMetadata {
            credential_issuer: self.credential_audience,
            credential_endpoint: self.credential_endpoint,
            token_endpoint: None,
            authorization_servers: None,
            scope: "openid".to_string(),
            proof_signing_algorithms: vec![],
            profile,
        })
    }
}

/// Download a credential with a caller-supplied proof and access token.
///
/// Returns `Ok(None)` when the endpoint answers success with an empty
/// body, matching the old contract. No other path returns `None`.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] for metadata the requested format
/// cannot be built from, [`Error::Download`] for non-success responses,
/// and transport errors from the HTTP client unchanged.
#[deprecated(note = "use HolderClient::credential_by_offer or credential_from_trusted_issuer")]
pub async fn request_credential(
    http: &impl HttpClient, issuer_metadata: LegacyIssuerMetadata, proof: &Proof,
    access_token: &str,
) -> Result<Option<CredentialResponse>> {
    let timeout = Duration::from_millis(issuer_metadata.download_timeout_ms);
    let format = issuer_metadata.credential_format;
    let metadata = issuer_metadata.into_typed()?;

    let request = create_credential_request(format, access_token, &metadata, proof)?;
    let response = http.send(&request, timeout).await.map_err(Error::from)?;

    if !response.status.is_success() {
        return Err(Error::Download(format!(
            "credential endpoint returned {}: {}",
            response.status, response.body
        )));
    }
    if response.body.trim().is_empty() {
        tracing::warn!("empty response body from {}, returning no credential", request.url);
        return Ok(None);
    }

    CredentialResponse::from_body(&response.body).map(Some)
}
