use http::Method;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Proof of possession of holder key material, bound to a server-supplied
/// nonce and carried in the credential request body.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Proof {
    /// The proof type. Always "jwt" for this client.
    pub proof_type: String,

    /// The signed proof JWT.
    pub jwt: String,
}

impl Proof {
    /// A JWT proof wrapping the given signed token.
    #[must_use]
    pub fn jwt(jwt: impl Into<String>) -> Self {
        Self { proof_type: "jwt".to_string(), jwt: jwt.into() }
    }
}

/// A fully constructed credential-endpoint request, ready to send: the
/// format-specific JSON body plus the bearer authorization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Request URL (the issuer's `credential_endpoint`).
    pub url: String,

    /// HTTP method. Always POST for credential requests.
    pub method: Method,

    /// Request headers.
    pub headers: Vec<(String, String)>,

    /// Serialized JSON body.
    pub body: String,
}

impl PreparedRequest {
    /// A JSON POST to `url`, authorized with `access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the body cannot be serialized.
    pub fn post(url: impl Into<String>, access_token: &str, body: &Value) -> Result<Self, Error> {
        let body = serde_json::to_string(body)
            .map_err(|e| Error::InvalidData(format!("request body serialization: {e}")))?;

        Ok(Self {
            url: url.into(),
            method: Method::POST,
            headers: vec![
                (AUTHORIZATION.to_string(), format!("Bearer {access_token}")),
                (CONTENT_TYPE.to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    /// The value of the named header, if set.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The issuer's response to a credential request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CredentialResponse {
    /// The issued credential payload: a JWT string or a JSON-LD object,
    /// depending on the requested format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<Value>,

    /// The raw HTTP response body, retained for diagnostics.
    #[serde(skip)]
    pub raw: String,
}

impl CredentialResponse {
    /// Parse a credential-endpoint response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Download`] if the body is not valid JSON.
    pub fn from_body(raw: &str) -> Result<Self, Error> {
        let mut response: Self = serde_json::from_str(raw)
            .map_err(|e| Error::Download(format!("malformed credential response: {e}")))?;
        response.raw = raw.to_string();
        Ok(response)
    }
}
