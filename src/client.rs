//! # Holder Client
//!
//! The crate facade. Owns the per-issuer metadata cache and the flow
//! configuration, logs failures, and guarantees every error leaving the
//! facade is a typed [`Error`]: known kinds pass through unchanged,
//! anything else is wrapped with the stable catch-all code.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::flow::{self, FlowConfig};
use crate::metadata::MetadataService;
use crate::provider::Provider;
use crate::types::{ClientMetadata, CredentialResponse, IssuerMetadata};

/// Holder-side issuance client for one wallet identity.
pub struct HolderClient<P: Provider> {
    provider: P,
    client: ClientMetadata,
    metadata: MetadataService,
    config: FlowConfig,
}

impl<P: Provider> HolderClient<P> {
    /// A client using `provider` for all external collaborators and
    /// identifying itself with `client` in authorization requests.
    #[must_use]
    pub fn new(provider: P, client: ClientMetadata) -> Self {
        Self { provider, client, metadata: MetadataService::new(), config: FlowConfig::default() }
    }

    /// Bound the wait for the external authorizer. Unset by default, so
    /// an abandoned authorization waits until the flow is dropped.
    #[must_use]
    pub const fn with_authorization_timeout(mut self, timeout: Duration) -> Self {
        self.config.authorization_timeout = Some(timeout);
        self
    }

    /// Bound each network request within a flow.
    #[must_use]
    pub const fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.config.download_timeout = timeout;
        self
    }

    /// Resolve typed issuer metadata for one credential configuration.
    /// Served from the per-issuer cache after the first fetch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataFetch`] if the metadata cannot be fetched
    /// or the configuration is absent or malformed.
    pub async fn issuer_metadata(
        &self, credential_issuer: &str, configuration_id: &str,
    ) -> Result<IssuerMetadata> {
        self.surface(
            self.metadata
                .resolve(
                    &self.provider,
                    credential_issuer,
                    configuration_id,
                    self.config.download_timeout,
                )
                .await,
        )
    }

    /// The issuer's `credential_configurations_supported` map, each entry
    /// validated to carry a format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataFetch`] if the map is absent, empty, or
    /// malformed.
    pub async fn credential_configurations_supported(
        &self, credential_issuer: &str,
    ) -> Result<Map<String, Value>> {
        self.surface(
            self.metadata
                .configurations_supported(
                    &self.provider,
                    credential_issuer,
                    self.config.download_timeout,
                )
                .await,
        )
    }

    /// Drop cached metadata for `credential_issuer` so the next lookup
    /// re-fetches.
    pub async fn invalidate_metadata(&self, credential_issuer: &str) {
        self.metadata.invalidate(credential_issuer).await;
    }

    /// Run a full issuance flow from a scanned offer string.
    ///
    /// # Errors
    ///
    /// Returns the stage error for the step that failed; unrecognized
    /// failures are wrapped as [`Error::Unexpected`].
    pub async fn credential_by_offer(&self, offer_string: &str) -> Result<CredentialResponse> {
        self.surface(
            flow::credential_by_offer(
                &self.provider,
                &self.client,
                &self.metadata,
                offer_string,
                &self.config,
            )
            .await,
        )
    }

    /// Run the interactive authorization-code flow against a known
    /// issuer, without an offer.
    ///
    /// # Errors
    ///
    /// Returns the stage error for the step that failed; unrecognized
    /// failures are wrapped as [`Error::Unexpected`].
    pub async fn credential_from_trusted_issuer(
        &self, credential_issuer: &str, configuration_id: &str,
    ) -> Result<CredentialResponse> {
        let result = async {
            let issuer_metadata = self
                .metadata
                .resolve(
                    &self.provider,
                    credential_issuer,
                    configuration_id,
                    self.config.download_timeout,
                )
                .await?;
            flow::issue_with_authorization(
                &self.provider,
                &self.client,
                &issuer_metadata,
                None,
                &self.config,
            )
            .await
        }
        .await;
        self.surface(result)
    }

    fn surface<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e: Error| {
            tracing::error!("issuance failed: {e}");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Error already being typed means surface() must not re-wrap it.
    #[test]
    fn known_errors_pass_through() {
        let err = Error::from(anyhow::Error::new(Error::InvalidAccessToken("nope".to_string())));
        assert!(matches!(err, Error::InvalidAccessToken(_)));

        let err = Error::from(anyhow::anyhow!("disk on fire"));
        let Error::Unexpected { code, message } = err else {
            panic!("should wrap unknown errors");
        };
        assert_eq!(code, crate::error::UNEXPECTED_CODE);
        assert_eq!(message, "disk on fire");
    }
}
