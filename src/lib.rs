//! A holder-side engine for acquiring Verifiable Credentials based on the
//! [OpenID for Verifiable Credential Issuance](https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html)
//! specification.
//!
//! The engine resolves credential offers and issuer metadata, runs the
//! authorization-code and pre-authorized-code grant flows with PKCE, and
//! downloads the issued credential. Everything that happens outside the
//! process (HTTP transport, the authorization UI, token exchange, proof
//! signing) is injected through the [`provider`] traits.
//!
//! # Example
//!
//! ```no_run
//! use vci_holder::{ClientMetadata, HolderClient};
//! # use vci_holder::provider::Provider;
//! # async fn issue(provider: impl Provider) -> anyhow::Result<()> {
//! let client = HolderClient::new(provider, ClientMetadata {
//!     client_id: "wallet-1".into(),
//!     redirect_uri: "io.wallet://redirect".into(),
//! });
//! let credential = client.credential_by_offer("openid-credential-offer://?...").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod legacy;
pub mod pkce;
pub mod provider;
pub mod types;

mod authorization;
mod client;
mod flow;
mod metadata;
mod offer;
mod request;
mod token;

pub use crate::client::HolderClient;
pub use crate::error::{Error, Result};
pub use crate::flow::DEFAULT_DOWNLOAD_TIMEOUT;
pub use crate::http::ReqwestClient;
pub use crate::types::{
    ClientMetadata, CredentialFormat, CredentialOffer, CredentialResponse, FormatProfile,
    IssuerMetadata, Proof,
};
