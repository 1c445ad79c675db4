use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Credential format identifiers a request can be built for.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum CredentialFormat {
    /// A W3C Verifiable Credential using JSON-LD.
    #[serde(rename = "ldp_vc")]
    LdpVc,

    /// An ISO mDL (ISO.18013-5) mdoc credential.
    #[serde(rename = "mso_mdoc")]
    MsoMdoc,

    /// An IETF SD-JWT VC (legacy media type).
    #[serde(rename = "vc+sd-jwt")]
    VcSdJwt,

    /// An IETF SD-JWT VC.
    #[serde(rename = "dc+sd-jwt")]
    DcSdJwt,

    /// A W3C Verifiable Credential secured as a JWT, not using JSON-LD.
    #[serde(rename = "jwt_vc_json")]
    JwtVcJson,
}

impl fmt::Display for CredentialFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LdpVc => write!(f, "ldp_vc"),
            Self::MsoMdoc => write!(f, "mso_mdoc"),
            Self::VcSdJwt => write!(f, "vc+sd-jwt"),
            Self::DcSdJwt => write!(f, "dc+sd-jwt"),
            Self::JwtVcJson => write!(f, "jwt_vc_json"),
        }
    }
}

/// The detailed description of a W3C Credential type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialDefinition {
    /// JSON-LD context values the issued Credential conforms to.
    #[serde(rename = "@context", default)]
    pub context: Vec<String>,

    /// Credential type values.
    #[serde(rename = "type", default)]
    pub r#type: Vec<String>,
}

/// Format-specific parameters of a credential configuration, parsed once at
/// the metadata-resolution boundary. Downstream code dispatches on the
/// variant rather than re-reading raw metadata keys.
///
/// See <https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html#name-credential-format-profiles>
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "format")]
pub enum FormatProfile {
    /// A W3C Verifiable Credential using JSON-LD.
    #[serde(rename = "ldp_vc")]
    LdpVc {
        /// The detailed description of the W3C Credential type.
        #[serde(default)]
        credential_definition: CredentialDefinition,
    },

    /// An ISO mDL (ISO.18013-5) mdoc credential.
    #[serde(rename = "mso_mdoc")]
    MsoMdoc {
        /// The mdoc document type.
        doctype: String,

        /// Claims offered for the document type.
        #[serde(skip_serializing_if = "Option::is_none")]
        claims: Option<Map<String, Value>>,
    },

    /// An IETF SD-JWT VC using the `vc+sd-jwt` media type.
    #[serde(rename = "vc+sd-jwt")]
    VcSdJwt {
        /// The SD-JWT VC type identifier.
        vct: String,

        /// Claims offered for the type.
        #[serde(skip_serializing_if = "Option::is_none")]
        claims: Option<Map<String, Value>>,
    },

    /// An IETF SD-JWT VC using the `dc+sd-jwt` media type.
    #[serde(rename = "dc+sd-jwt")]
    DcSdJwt {
        /// The SD-JWT VC type identifier.
        vct: String,

        /// Claims offered for the type.
        #[serde(skip_serializing_if = "Option::is_none")]
        claims: Option<Map<String, Value>>,
    },

    /// A W3C Verifiable Credential secured as a JWT, not using JSON-LD.
    #[serde(rename = "jwt_vc_json")]
    JwtVcJson {
        /// The configuration's credential identifier.
        #[serde(skip_serializing_if = "Option::is_none")]
        credential_id: Option<String>,

        /// Additional credential metadata published by the issuer.
        #[serde(skip_serializing_if = "Option::is_none")]
        credential_metadata: Option<Value>,
    },
}

impl FormatProfile {
    /// The format discriminator for this profile.
    #[must_use]
    pub const fn format(&self) -> CredentialFormat {
        match self {
            Self::LdpVc { .. } => CredentialFormat::LdpVc,
            Self::MsoMdoc { .. } => CredentialFormat::MsoMdoc,
            Self::VcSdJwt { .. } => CredentialFormat::VcSdJwt,
            Self::DcSdJwt { .. } => CredentialFormat::DcSdJwt,
            Self::JwtVcJson { .. } => CredentialFormat::JwtVcJson,
        }
    }
}

/// Issuer metadata resolved for one (issuer, credential configuration)
/// pair: the shared endpoints plus the typed format profile.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct IssuerMetadata {
    /// The Credential Issuer identifier (URL).
    pub credential_issuer: String,

    /// The endpoint credential requests are sent to.
    pub credential_endpoint: String,

    /// Token endpoint published in the issuer metadata, if any. Falls back
    /// to the authorization server's metadata when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,

    /// Authorization servers the issuer delegates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_servers: Option<Vec<String>>,

    /// OAuth scope requested for this configuration. Defaults to
    /// `"openid"`.
    pub scope: String,

    /// Proof JWT signing algorithms accepted by the issuer for this
    /// configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proof_signing_algorithms: Vec<String>,

    /// The format-specific configuration parameters.
    #[serde(flatten)]
    pub profile: FormatProfile,
}

/// OAuth client metadata identifying the Wallet, supplied by the caller
/// per flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClientMetadata {
    /// OAuth 2.0 client identifier of the Wallet.
    pub client_id: String,

    /// Redirection endpoint the authorization response is returned to.
    pub redirect_uri: String,
}
