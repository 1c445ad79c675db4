use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A Credential Offer received by the Wallet, either embedded in a scanned
/// URI or fetched from a `credential_offer_uri` reference.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialOffer {
    /// The URL of the Credential Issuer the Wallet can use to obtain
    /// Credentials and the Issuer's metadata.
    pub credential_issuer: String,

    /// Keys into the `credential_configurations_supported` map in the
    /// Credential Issuer metadata, identifying the offered Credentials.
    pub credential_configuration_ids: Vec<String>,

    /// The Grant Types the Credential Issuer is prepared to process for
    /// this offer. When multiple grants are present, it is at the Wallet's
    /// discretion which one to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grants: Option<Grants>,
}

impl CredentialOffer {
    /// Check the invariants every offer must satisfy before use: an issuer
    /// URL, at least one configuration id, and a well-formed grants map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OfferFetch`] describing the first violated
    /// invariant.
    pub fn validate(&self) -> Result<(), Error> {
        if self.credential_issuer.is_empty() {
            return Err(Error::OfferFetch("offer is missing credential_issuer".to_string()));
        }
        if self.credential_configuration_ids.is_empty() {
            return Err(Error::OfferFetch(
                "offer contains no credential_configuration_ids".to_string(),
            ));
        }
        if let Some(grants) = &self.grants
            && grants.authorization_code.is_none()
            && grants.pre_authorized_code.is_none()
        {
            return Err(Error::OfferFetch("offer grants contain no recognized grant type".to_string()));
        }
        Ok(())
    }

    /// Extract the pre-authorized code grant from the offer if present.
    #[must_use]
    pub fn pre_authorized_code(&self) -> Option<&PreAuthorizedCodeGrant> {
        self.grants.as_ref().and_then(|grants| grants.pre_authorized_code.as_ref())
    }

    /// Extract the authorization code grant from the offer if present.
    #[must_use]
    pub fn authorization_code(&self) -> Option<&AuthorizationCodeGrant> {
        self.grants.as_ref().and_then(|grants| grants.authorization_code.as_ref())
    }
}

/// Grant Types offered by the Credential Issuer.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Grants {
    /// Authorization Code Grant Type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<AuthorizationCodeGrant>,

    /// Pre-Authorized Code Grant Type.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "urn:ietf:params:oauth:grant-type:pre-authorized_code")]
    pub pre_authorized_code: Option<PreAuthorizedCodeGrant>,
}

/// Parameters used by the Wallet when requesting the Authorization Code
/// Flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthorizationCodeGrant {
    /// Links the subsequent Authorization Request to the offer context.
    /// When present, the Wallet MUST include it in the Authorization
    /// Request as the `issuer_state` parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_state: Option<String>,

    /// Identifies the Authorization Server to use when the Credential
    /// Issuer metadata lists multiple `authorization_servers` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_server: Option<String>,
}

/// Parameters used by the Wallet in the Pre-Authorized Code Flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PreAuthorizedCodeGrant {
    /// Short-lived, single-use code representing the Issuer's authorization
    /// for the Wallet to obtain the offered Credentials. Sent in the
    /// subsequent Token Request.
    #[serde(rename = "pre-authorized_code")]
    pub pre_authorized_code: String,

    /// Present when the token endpoint expects the End-User to also supply
    /// a Transaction Code bound to this offer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_code: Option<TxCode>,

    /// Identifies the Authorization Server to use when the Credential
    /// Issuer metadata lists multiple `authorization_servers` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_server: Option<String>,
}

/// Describes the Transaction Code the End-User must provide with the Token
/// Request in a Pre-Authorized Code Flow. An empty object still indicates
/// a code is required.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TxCode {
    /// Input character set: "numeric" (default) or "text".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<String>,

    /// Length of the code, to help the Wallet render an input form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i32>,

    /// Guidance for the End-User on where to find the code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
