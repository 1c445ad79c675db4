//! # Credential Request Factory
//!
//! Validates resolved issuer metadata against the requested format and
//! constructs the format-specific credential-endpoint request. The
//! factory never falls back to defaults and never guesses a format: a
//! mismatch or a missing required field is an invalid-data error naming
//! the fields.

use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::types::{CredentialFormat, FormatProfile, IssuerMetadata, PreparedRequest, Proof};

/// Construct the credential-endpoint request for `format`: a JSON POST to
/// `metadata.credential_endpoint` authorized with `access_token` and
/// carrying the proof.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] naming the missing or mismatched fields
/// when `metadata` does not carry what `format` requires.
pub fn create_credential_request(
    format: CredentialFormat, access_token: &str, metadata: &IssuerMetadata, proof: &Proof,
) -> Result<PreparedRequest> {
    if format != metadata.profile.format() {
        return Err(Error::InvalidData(format!(
            "requested format {format} does not match issuer metadata format {}",
            metadata.profile.format()
        )));
    }

    let body = match &metadata.profile {
        FormatProfile::MsoMdoc { doctype, claims } => mso_mdoc_body(doctype, claims.as_ref(), proof)?,
        FormatProfile::LdpVc { credential_definition } => json!({
            "format": "ldp_vc",
            "credential_definition": credential_definition,
            "proof": proof,
        }),
        FormatProfile::VcSdJwt { vct, claims } | FormatProfile::DcSdJwt { vct, claims } => {
            sd_jwt_body(format, vct, claims.as_ref(), proof)?
        }
        FormatProfile::JwtVcJson { credential_id, .. } => {
            let Some(credential_id) = credential_id.as_ref().filter(|id| !id.is_empty()) else {
                return Err(Error::InvalidData("[credential_id]".to_string()));
            };
            json!({
                "credential_configuration_id": credential_id,
                "proof": proof,
            })
        }
    };

    PreparedRequest::post(&metadata.credential_endpoint, access_token, &body)
}

fn mso_mdoc_body(
    doctype: &str, claims: Option<&serde_json::Map<String, Value>>, proof: &Proof,
) -> Result<Value> {
    let mut missing = vec![];
    if doctype.is_empty() {
        missing.push("doctype");
    }
    if claims.is_none() {
        missing.push("claims");
    }
    if !missing.is_empty() {
        return Err(Error::InvalidData(format!("{missing:?}")));
    }

    Ok(json!({
        "format": "mso_mdoc",
        "doctype": doctype,
        "claims": claims,
        "proof": proof,
    }))
}

fn sd_jwt_body(
    format: CredentialFormat, vct: &str,
    claims: Option<&serde_json::Map<String, Value>>, proof: &Proof,
) -> Result<Value> {
    if vct.is_empty() {
        return Err(Error::InvalidData("[vct]".to_string()));
    }

    let mut body = json!({
        "format": format,
        "vct": vct,
        "proof": proof,
    });
    if let Some(claims) = claims {
        body["claims"] = Value::Object(claims.clone());
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::types::CredentialDefinition;

    fn metadata(profile: FormatProfile) -> IssuerMetadata {
        IssuerMetadata {
            credential_issuer: "https://issuer.example.com".to_string(),
            credential_endpoint: "https://issuer.example.com/credential".to_string(),
            token_endpoint: None,
            authorization_servers: None,
            scope: "openid".to_string(),
            proof_signing_algorithms: vec![],
            profile,
        }
    }

    #[test]
    fn sd_jwt_request() {
        let metadata = metadata(FormatProfile::VcSdJwt {
            vct: "https://credentials.example.com/identity".to_string(),
            claims: None,
        });
        let proof = Proof::jwt("eyJ0eXAiOiJvaWQ0dmNpLXByb29mK2p3dCJ9.e30.sig");

        let request = create_credential_request(
            CredentialFormat::VcSdJwt,
            "token-123",
            &metadata,
            &proof,
        )
        .expect("should build");

        assert_eq!(request.url, "https://issuer.example.com/credential");
        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.header("authorization"), Some("Bearer token-123"));
        assert_eq!(request.header("content-type"), Some("application/json"));

        let body: Value = serde_json::from_str(&request.body).expect("body is JSON");
        assert_eq!(body["format"], "vc+sd-jwt");
        assert_eq!(body["vct"], "https://credentials.example.com/identity");
        assert_eq!(body["proof"]["proof_type"], "jwt");
        assert_eq!(body["proof"]["jwt"], "eyJ0eXAiOiJvaWQ0dmNpLXByb29mK2p3dCJ9.e30.sig");
    }

    // Requesting one format against metadata shaped for another must fail
    // rather than guess.
    #[test]
    fn format_mismatch() {
        let metadata = metadata(FormatProfile::LdpVc {
            credential_definition: CredentialDefinition::default(),
        });

        let err = create_credential_request(
            CredentialFormat::MsoMdoc,
            "token-123",
            &metadata,
            &Proof::jwt("jwt"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)), "unexpected error: {err}");
    }

    #[test]
    fn mdoc_missing_claims() {
        let metadata = metadata(FormatProfile::MsoMdoc {
            doctype: "org.iso.18013.5.1.mDL".to_string(),
            claims: None,
        });

        let err = create_credential_request(
            CredentialFormat::MsoMdoc,
            "token-123",
            &metadata,
            &Proof::jwt("jwt"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("claims"), "error should name claims: {err}");
    }

    #[test]
    fn mdoc_request() {
        let mut claims = Map::new();
        claims.insert("org.iso.18013.5.1".to_string(), json!({"given_name": {}}));
        let metadata = metadata(FormatProfile::MsoMdoc {
            doctype: "org.iso.18013.5.1.mDL".to_string(),
            claims: Some(claims),
        });

        let request = create_credential_request(
            CredentialFormat::MsoMdoc,
            "token-123",
            &metadata,
            &Proof::jwt("jwt"),
        )
        .expect("should build");

        let body: Value = serde_json::from_str(&request.body).expect("body is JSON");
        assert_eq!(body["format"], "mso_mdoc");
        assert_eq!(body["doctype"], "org.iso.18013.5.1.mDL");
        assert!(body["claims"]["org.iso.18013.5.1"].is_object());
    }

    #[test]
    fn ldp_request() {
        let metadata = metadata(FormatProfile::LdpVc {
            credential_definition: CredentialDefinition {
                context: vec!["https://www.w3.org/2018/credentials/v1".to_string()],
                r#type: vec!["VerifiableCredential".to_string()],
            },
        });

        let request = create_credential_request(
            CredentialFormat::LdpVc,
            "token-123",
            &metadata,
            &Proof::jwt("jwt"),
        )
        .expect("should build");

        let body: Value = serde_json::from_str(&request.body).expect("body is JSON");
        assert_eq!(body["format"], "ldp_vc");
        assert_eq!(
            body["credential_definition"]["@context"][0],
            "https://www.w3.org/2018/credentials/v1"
        );
        assert_eq!(body["credential_definition"]["type"][0], "VerifiableCredential");
    }

    #[test]
    fn jwt_vc_json_requires_credential_id() {
        let metadata = metadata(FormatProfile::JwtVcJson {
            credential_id: None,
            credential_metadata: None,
        });

        let err = create_credential_request(
            CredentialFormat::JwtVcJson,
            "token-123",
            &metadata,
            &Proof::jwt("jwt"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("credential_id"));

        let metadata = self::metadata(FormatProfile::JwtVcJson {
            credential_id: Some("EmployeeID_JWT".to_string()),
            credential_metadata: None,
        });
        let request = create_credential_request(
            CredentialFormat::JwtVcJson,
            "token-123",
            &metadata,
            &Proof::jwt("jwt"),
        )
        .expect("should build");

        let body: Value = serde_json::from_str(&request.body).expect("body is JSON");
        assert_eq!(body["credential_configuration_id"], "EmployeeID_JWT");
    }
}
