//! Scripted provider for issuance flow tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use serde_json::json;
use vci_holder::provider::{
    Authorizer, HttpClient, HttpResponse, ProofSigner, TokenClient, TrustPolicy,
};
use vci_holder::types::{PreparedRequest, TokenRequest, TokenResponse, TokenType};

pub const ISSUER: &str = "https://issuer.example.com";
pub const AUTH_SERVER: &str = "https://auth.example.com";
pub const AUTH_CODE: &str = "SplxlOBeZQQYbYS6WxSbIA";
pub const ACCESS_TOKEN: &str = "czZCaGRSa3F0MzpnWDFmQmF0M2JW";
pub const C_NONCE: &str = "tZignsnFbp";
pub const PROOF_JWT: &str = "eyJ0eXAiOiJvaWQ0dmNpLXByb29mK2p3dCJ9.e30.fixed-proof";

/// A provider whose every collaborator returns scripted values and
/// records what it was asked.
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    get_responses: Mutex<HashMap<String, (http::StatusCode, String)>>,
    get_counts: Mutex<HashMap<String, usize>>,
    credential_body: Mutex<String>,
    sent: Mutex<Vec<PreparedRequest>>,
    auth_urls: Mutex<Vec<String>>,
    tx_code: Mutex<Option<String>>,
    token_requests: Mutex<Vec<(String, TokenRequest)>>,
    signed_nonces: Mutex<Vec<Option<String>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the body returned for a GET of `url`.
    pub fn on_get(&self, url: impl Into<String>, body: impl Into<String>) {
        self.on_get_status(url, http::StatusCode::OK, body);
    }

    /// Script a GET response with an explicit status.
    pub fn on_get_status(
        &self, url: impl Into<String>, status: http::StatusCode, body: impl Into<String>,
    ) {
        self.inner.get_responses.lock().unwrap().insert(url.into(), (status, body.into()));
    }

    /// Script the credential endpoint response body.
    pub fn on_credential(&self, body: impl Into<String>) {
        *self.inner.credential_body.lock().unwrap() = body.into();
    }

    /// Script the transaction code the user would enter.
    pub fn on_tx_code(&self, code: impl Into<String>) {
        *self.inner.tx_code.lock().unwrap() = Some(code.into());
    }

    pub fn get_count(&self, url: &str) -> usize {
        self.inner.get_counts.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn sent_requests(&self) -> Vec<PreparedRequest> {
        self.inner.sent.lock().unwrap().clone()
    }

    pub fn auth_urls(&self) -> Vec<String> {
        self.inner.auth_urls.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> Vec<(String, TokenRequest)> {
        self.inner.token_requests.lock().unwrap().clone()
    }

    pub fn signed_nonces(&self) -> Vec<Option<String>> {
        self.inner.signed_nonces.lock().unwrap().clone()
    }

    /// Script the standard happy-path fixtures: issuer metadata with one
    /// SD-JWT configuration, authorization server metadata, and a
    /// credential response.
    pub fn with_issuer_fixtures(self) -> Self {
        self.on_get(
            format!("{ISSUER}/.well-known/openid-credential-issuer"),
            issuer_metadata_body().to_string(),
        );
        self.on_get(
            format!("{AUTH_SERVER}/.well-known/oauth-authorization-server"),
            json!({
                "authorization_endpoint": format!("{AUTH_SERVER}/authorize"),
                "token_endpoint": format!("{AUTH_SERVER}/token"),
            })
            .to_string(),
        );
        self.on_credential(
            json!({"credential": "eyJhbGciOiJFUzI1NiJ9.issued.sig"}).to_string(),
        );
        self
    }
}

pub fn issuer_metadata_body() -> serde_json::Value {
    json!({
        "credential_issuer": ISSUER,
        "credential_endpoint": format!("{ISSUER}/credential"),
        "authorization_servers": [AUTH_SERVER],
        "credential_configurations_supported": {
            "IdentityCredential": {
                "format": "vc+sd-jwt",
                "scope": "identity_credential",
                "vct": "https://credentials.example.com/identity",
                "proof_types_supported": {
                    "jwt": {"proof_signing_alg_values_supported": ["ES256"]}
                }
            }
        }
    })
}

impl HttpClient for MockProvider {
    async fn get(
        &self, url: &str, _headers: &[(&str, &str)], _timeout: Duration,
    ) -> Result<HttpResponse> {
        *self.inner.get_counts.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        let scripted = self.inner.get_responses.lock().unwrap().get(url).cloned();
        match scripted {
            Some((status, body)) => Ok(HttpResponse { status, body }),
            None => Err(anyhow!("no scripted response for GET {url}")),
        }
    }

    async fn send(&self, request: &PreparedRequest, _timeout: Duration) -> Result<HttpResponse> {
        self.inner.sent.lock().unwrap().push(request.clone());
        Ok(HttpResponse {
            status: http::StatusCode::OK,
            body: self.inner.credential_body.lock().unwrap().clone(),
        })
    }
}

impl Authorizer for MockProvider {
    async fn authorize(&self, auth_url: &str) -> Result<String> {
        self.inner.auth_urls.lock().unwrap().push(auth_url.to_string());
        Ok(AUTH_CODE.to_string())
    }

    async fn tx_code(&self) -> Result<String> {
        self.inner
            .tx_code
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("no scripted transaction code"))
    }
}

impl TokenClient for MockProvider {
    async fn token(&self, token_endpoint: &str, request: &TokenRequest) -> Result<TokenResponse> {
        self.inner
            .token_requests
            .lock()
            .unwrap()
            .push((token_endpoint.to_string(), request.clone()));
        Ok(TokenResponse {
            access_token: ACCESS_TOKEN.to_string(),
            token_type: TokenType::Bearer,
            expires_in: Some(300),
            c_nonce: Some(C_NONCE.to_string()),
        })
    }
}

impl ProofSigner for MockProvider {
    async fn proof_jwt(
        &self, _credential_issuer: &str, c_nonce: Option<&str>, _algorithms: &[String],
    ) -> Result<String> {
        self.inner.signed_nonces.lock().unwrap().push(c_nonce.map(String::from));
        Ok(PROOF_JWT.to_string())
    }
}

impl TrustPolicy for MockProvider {}
