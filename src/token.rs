//! # Token Exchange
//!
//! Builds the grant-specific [`TokenRequest`] and delegates the HTTP
//! exchange to the caller-supplied [`TokenClient`].

use crate::error::{Error, Result};
use crate::provider::TokenClient;
use crate::types::{ClientMetadata, TokenGrantType, TokenRequest, TokenResponse};

/// Exchange a grant for an access token.
///
/// For the authorization-code grant the request carries the client id,
/// redirect URI, code, and PKCE verifier; for the pre-authorized grant it
/// carries the pre-authorized code and optional transaction code.
///
/// # Errors
///
/// Propagates typed errors from the token client unchanged and returns
/// [`Error::InvalidAccessToken`] when the response contains no token.
pub async fn access_token(
    client: &impl TokenClient, token_endpoint: &str, grant_type: TokenGrantType,
    client_metadata: &ClientMetadata,
) -> Result<TokenResponse> {
    let redirect_uri = match &grant_type {
        TokenGrantType::AuthorizationCode { .. } => Some(client_metadata.redirect_uri.clone()),
        TokenGrantType::PreAuthorizedCode { .. } => None,
    };
    let request = TokenRequest {
        client_id: Some(client_metadata.client_id.clone()),
        redirect_uri,
        grant_type,
    };

    tracing::debug!("exchanging grant at {token_endpoint}");
    let response = client.token(token_endpoint, &request).await.map_err(Error::from)?;

    if response.access_token.is_empty() {
        return Err(Error::InvalidAccessToken(
            "token response contains no access token".to_string(),
        ));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::Result;

    use super::*;

    #[derive(Default)]
    struct StubTokenClient {
        captured: Mutex<Option<(String, TokenRequest)>>,
    }

    impl TokenClient for StubTokenClient {
        async fn token(&self, endpoint: &str, request: &TokenRequest) -> Result<TokenResponse> {
            *self.captured.lock().unwrap() = Some((endpoint.to_string(), request.clone()));
            Ok(TokenResponse {
                access_token: "token-123".to_string(),
                c_nonce: Some("nonce-456".to_string()),
                ..TokenResponse::default()
            })
        }
    }

    #[tokio::test]
    async fn authorization_code_request_shape() {
        let stub = StubTokenClient::default();
        let client_metadata = ClientMetadata {
            client_id: "wallet-1".to_string(),
            redirect_uri: "io.wallet://redirect".to_string(),
        };
        let grant = TokenGrantType::AuthorizationCode {
            code: "SplxlOBeZQQYbYS6WxSbIA".to_string(),
            code_verifier: Some("verifier".to_string()),
        };

        let response = access_token(&stub, "https://auth.example.com/token", grant, &client_metadata)
            .await
            .expect("should exchange");
        assert_eq!(response.access_token, "token-123");

        let (endpoint, request) = stub.captured.lock().unwrap().clone().expect("captured");
        assert_eq!(endpoint, "https://auth.example.com/token");
        assert_eq!(request.client_id.as_deref(), Some("wallet-1"));
        assert_eq!(request.redirect_uri.as_deref(), Some("io.wallet://redirect"));
    }

    #[tokio::test]
    async fn pre_authorized_omits_redirect() {
        let stub = StubTokenClient::default();
        let client_metadata = ClientMetadata {
            client_id: "wallet-1".to_string(),
            redirect_uri: "io.wallet://redirect".to_string(),
        };
        let grant = TokenGrantType::PreAuthorizedCode {
            pre_authorized_code: "WQHhDmQ3ZygxyOPlBjunlA".to_string(),
            tx_code: Some("1234".to_string()),
        };

        access_token(&stub, "https://issuer.example.com/token", grant, &client_metadata)
            .await
            .expect("should exchange");

        let (_, request) = stub.captured.lock().unwrap().clone().expect("captured");
        assert!(request.redirect_uri.is_none());
    }
}
