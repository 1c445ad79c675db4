use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Token Request as defined in [RFC6749], with the Pre-Authorized Code
/// Flow extensions.
///
/// [RFC6749]: https://www.rfc-editor.org/rfc/rfc6749.html
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenRequest {
    /// OAuth 2.0 client identifier of the Wallet. Optional for the
    /// Pre-Authorized Code grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// The redirection endpoint used in the authorization request.
    /// Required (and identical) when one was sent there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Authorization grant type and its grant-specific parameters.
    #[serde(flatten)]
    pub grant_type: TokenGrantType,
}

impl TokenRequest {
    /// `application/x-www-form-urlencoded` key/value pairs for this
    /// request. Absent optional fields are omitted, never emitted as empty
    /// strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the request does not serialize to
    /// a flat JSON object.
    pub fn form_encode(&self) -> Result<Vec<(String, String)>, Error> {
        let Value::Object(map) = serde_json::to_value(self)
            .map_err(|e| Error::InvalidData(format!("token request serialization: {e}")))?
        else {
            return Err(Error::InvalidData("token request is not an object".to_string()));
        };

        let mut form = vec![];
        for (key, value) in map {
            let encoded = match value {
                Value::Null => continue,
                Value::String(s) => s,
                other => other.to_string(),
            };
            form.push((key, encoded));
        }
        Ok(form)
    }
}

/// Token authorization grant types.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "grant_type")]
pub enum TokenGrantType {
    /// Parameters for the Authorization Code grant type.
    #[serde(rename = "authorization_code")]
    AuthorizationCode {
        /// The authorization code returned by the authorization server.
        code: String,

        /// PKCE code verifier matching the `code_challenge` sent in the
        /// authorization request.
        #[serde(skip_serializing_if = "Option::is_none")]
        code_verifier: Option<String>,
    },

    /// Parameters for the Pre-Authorized Code grant type.
    #[serde(rename = "urn:ietf:params:oauth:grant-type:pre-authorized_code")]
    PreAuthorizedCode {
        /// The pre-authorized code provided in the Credential Offer.
        #[serde(rename = "pre-authorized_code")]
        pre_authorized_code: String,

        /// Transaction Code provided by the End-User. Required when the
        /// offer's grant carried a `tx_code` object.
        #[serde(skip_serializing_if = "Option::is_none")]
        tx_code: Option<String>,
    },
}

/// Token Response as defined in [RFC6749].
///
/// [RFC6749]: https://www.rfc-editor.org/rfc/rfc6749.html
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Access token used to authorize the subsequent credential request.
    pub access_token: String,

    /// The type of token issued ("Bearer").
    #[serde(default)]
    pub token_type: TokenType,

    /// Lifetime of the access token in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Server-supplied nonce the holder proof must be bound to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_nonce: Option<String>,
}

/// Access token type as defined in [RFC6749]. The only allowed value is
/// "Bearer".
///
/// [RFC6749]: https://www.rfc-editor.org/rfc/rfc6749.html
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum TokenType {
    /// The only valid value.
    #[default]
    Bearer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_encoding_authorization_code() {
        let request = TokenRequest {
            client_id: Some("wallet-1".to_string()),
            redirect_uri: Some("io.wallet://redirect".to_string()),
            grant_type: TokenGrantType::AuthorizationCode {
                code: "SplxlOBeZQQYbYS6WxSbIA".to_string(),
                code_verifier: Some("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string()),
            },
        };

        let form = request.form_encode().expect("should encode");
        assert!(form.contains(&("grant_type".to_string(), "authorization_code".to_string())));
        assert!(form.contains(&("code".to_string(), "SplxlOBeZQQYbYS6WxSbIA".to_string())));
        assert!(form.contains(&("client_id".to_string(), "wallet-1".to_string())));
        assert!(
            form.contains(&(
                "code_verifier".to_string(),
                "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string()
            ))
        );
    }

    // Absent optional fields must not appear in the form at all.
    #[test]
    fn form_encoding_skips_absent_fields() {
        let request = TokenRequest {
            client_id: None,
            redirect_uri: None,
            grant_type: TokenGrantType::PreAuthorizedCode {
                pre_authorized_code: "WQHhDmQ3ZygxyOPlBjunlA".to_string(),
                tx_code: None,
            },
        };

        let form = request.form_encode().expect("should encode");
        assert!(
            form.contains(&(
                "pre-authorized_code".to_string(),
                "WQHhDmQ3ZygxyOPlBjunlA".to_string()
            ))
        );
        assert!(form.iter().all(|(k, _)| k != "tx_code" && k != "client_id"));
        assert!(form.iter().all(|(_, v)| !v.is_empty()));
    }
}
