//! # Issuer Metadata
//!
//! Fetches Credential Issuer metadata from the well-known endpoint,
//! memoizes the raw document per issuer for the life of the client, and
//! resolves individual credential configurations into typed
//! [`IssuerMetadata`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::provider::HttpClient;
use crate::types::{CredentialDefinition, FormatProfile, IssuerMetadata};

const WELL_KNOWN_SUFFIX: &str = "/.well-known/openid-credential-issuer";
const DEFAULT_SCOPE: &str = "openid";

/// Fetches and caches issuer metadata. One instance is shared by all
/// flows running against the same client; the raw document cache lives
/// for the life of the instance (no expiry) and can be explicitly
/// invalidated.
#[derive(Debug, Default)]
pub struct MetadataService {
    cache: Mutex<HashMap<String, Arc<Map<String, Value>>>>,
}

impl MetadataService {
    /// Create a service with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw metadata document for `credential_issuer`, fetching it on
    /// first use. Concurrent first callers may both fetch; the last
    /// writer wins and later callers hit the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataFetch`] if the request fails, the body is
    /// empty, or the document is not a JSON object.
    pub async fn raw(
        &self, http: &impl HttpClient, credential_issuer: &str, timeout: Duration,
    ) -> Result<Arc<Map<String, Value>>> {
        if let Some(cached) = self.cache.lock().await.get(credential_issuer) {
            return Ok(Arc::clone(cached));
        }

        // fetch outside the lock so a slow issuer does not serialize
        // unrelated lookups
        let fetched = Arc::new(fetch_raw(http, credential_issuer, timeout).await?);
        self.cache.lock().await.insert(credential_issuer.to_string(), Arc::clone(&fetched));
        Ok(fetched)
    }

    /// Drop the cached document for `credential_issuer` so the next
    /// lookup re-fetches.
    pub async fn invalidate(&self, credential_issuer: &str) {
        self.cache.lock().await.remove(credential_issuer);
    }

    /// Resolve the named credential configuration into typed metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataFetch`] if the document cannot be fetched
    /// or the configuration is absent or malformed for its format.
    pub async fn resolve(
        &self, http: &impl HttpClient, credential_issuer: &str, configuration_id: &str,
        timeout: Duration,
    ) -> Result<IssuerMetadata> {
        let raw = self.raw(http, credential_issuer, timeout).await?;
        resolve_configuration(configuration_id, &raw)
    }

    /// The issuer's `credential_configurations_supported` map, validated
    /// so that every entry carries a format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataFetch`] if the map is absent or empty, or
    /// any entry is malformed.
    pub async fn configurations_supported(
        &self, http: &impl HttpClient, credential_issuer: &str, timeout: Duration,
    ) -> Result<Map<String, Value>> {
        let raw = self.raw(http, credential_issuer, timeout).await?;
        let configurations = supported_map(&raw)?;

        if configurations.is_empty() {
            return Err(Error::MetadataFetch(
                "credential_configurations_supported is empty".to_string(),
            ));
        }
        for (id, entry) in configurations {
            let format = entry.get("format").and_then(Value::as_str);
            if format.is_none_or(str::is_empty) {
                return Err(Error::MetadataFetch(format!(
                    "credential configuration {id} is missing format"
                )));
            }
        }

        Ok(configurations.clone())
    }
}

async fn fetch_raw(
    http: &impl HttpClient, credential_issuer: &str, timeout: Duration,
) -> Result<Map<String, Value>> {
    let url = format!("{credential_issuer}{WELL_KNOWN_SUFFIX}");
    tracing::debug!("fetching issuer metadata from {url}");

    let response = http
        .get(&url, &[], timeout)
        .await
        .map_err(|e| Error::MetadataFetch(format!("failed to fetch issuer metadata: {e:#}")))?;
    if !response.status.is_success() {
        return Err(Error::MetadataFetch(format!(
            "issuer metadata request returned {}: {}",
            response.status, response.body
        )));
    }
    if response.body.trim().is_empty() {
        return Err(Error::MetadataFetch("issuer metadata response is empty".to_string()));
    }

    let Value::Object(document) = serde_json::from_str(&response.body)
        .map_err(|e| Error::MetadataFetch(format!("failed to parse issuer metadata: {e}")))?
    else {
        return Err(Error::MetadataFetch("issuer metadata is not a JSON object".to_string()));
    };
    Ok(document)
}

/// Resolve one credential configuration from a raw metadata document into
/// the typed, format-discriminated model.
///
/// # Errors
///
/// Returns [`Error::MetadataFetch`] naming the missing field when the
/// document lacks a shared field or the format's required parameter, and
/// for unsupported or missing `format` values.
pub fn resolve_configuration(
    configuration_id: &str, raw: &Map<String, Value>,
) -> Result<IssuerMetadata> {
    let configurations = supported_map(raw)?;
    let Some(configuration) = configurations.get(configuration_id).and_then(Value::as_object)
    else {
        return Err(Error::MetadataFetch(format!(
            "credential configuration not found: {configuration_id}"
        )));
    };

    let Some(credential_endpoint) = raw.get("credential_endpoint").and_then(Value::as_str) else {
        return Err(Error::MetadataFetch("missing credential_endpoint".to_string()));
    };
    let Some(credential_issuer) = raw.get("credential_issuer").and_then(Value::as_str) else {
        return Err(Error::MetadataFetch("missing credential_issuer".to_string()));
    };

    let scope = configuration
        .get("scope")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_SCOPE)
        .to_string();
    let authorization_servers = raw.get("authorization_servers").and_then(Value::as_array).map(
        |servers| servers.iter().filter_map(Value::as_str).map(String::from).collect(),
    );
    let token_endpoint =
        raw.get("token_endpoint").and_then(Value::as_str).map(String::from);

    let profile = resolve_profile(configuration)?;

    Ok(IssuerMetadata {
        credential_issuer: credential_issuer.to_string(),
        credential_endpoint: credential_endpoint.to_string(),
        token_endpoint,
        authorization_servers,
        scope,
        proof_signing_algorithms: proof_algorithms(configuration),
        profile,
    })
}

// Dispatch on the configuration's `format` field. Absence of a format's
// required parameter is fatal, never silently defaulted.
fn resolve_profile(configuration: &Map<String, Value>) -> Result<FormatProfile> {
    let claims = configuration.get("claims").and_then(Value::as_object).cloned();

    match configuration.get("format").and_then(Value::as_str) {
        Some("mso_mdoc") => {
            let Some(doctype) = configuration.get("doctype").and_then(Value::as_str) else {
                return Err(Error::MetadataFetch("missing doctype".to_string()));
            };
            Ok(FormatProfile::MsoMdoc { doctype: doctype.to_string(), claims })
        }
        Some("ldp_vc") => {
            let definition = configuration
                .get("credential_definition")
                .and_then(Value::as_object)
                .map_or_else(Map::new, Clone::clone);
            Ok(FormatProfile::LdpVc {
                credential_definition: CredentialDefinition {
                    context: string_array(&definition, "@context"),
                    r#type: string_array(&definition, "type"),
                },
            })
        }
        Some(format @ ("vc+sd-jwt" | "dc+sd-jwt")) => {
            let Some(vct) = configuration.get("vct").and_then(Value::as_str) else {
                return Err(Error::MetadataFetch("missing vct for SD-JWT".to_string()));
            };
            let vct = vct.to_string();
            if format == "vc+sd-jwt" {
                Ok(FormatProfile::VcSdJwt { vct, claims })
            } else {
                Ok(FormatProfile::DcSdJwt { vct, claims })
            }
        }
        Some("jwt_vc_json") => Ok(FormatProfile::JwtVcJson {
            credential_id: configuration.get("id").and_then(Value::as_str).map(String::from),
            credential_metadata: configuration.get("credential_metadata").cloned(),
        }),
        _ => Err(Error::MetadataFetch(
            "unsupported or missing credential format in configuration".to_string(),
        )),
    }
}

fn supported_map(raw: &Map<String, Value>) -> Result<&Map<String, Value>> {
    raw.get("credential_configurations_supported").and_then(Value::as_object).ok_or_else(|| {
        Error::MetadataFetch("missing credential_configurations_supported".to_string())
    })
}

fn string_array(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

fn proof_algorithms(configuration: &Map<String, Value>) -> Vec<String> {
    configuration
        .get("proof_types_supported")
        .and_then(|v| v.get("jwt"))
        .and_then(|v| v.get("proof_signing_alg_values_supported"))
        .and_then(Value::as_array)
        .map(|algs| algs.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}
