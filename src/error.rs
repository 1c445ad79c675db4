//! # Errors
//!
//! Typed errors for the holder-side issuance engine. Each component raises
//! the most specific applicable kind; the facade re-raises known kinds
//! unchanged and wraps anything unrecognized into [`Error::Unexpected`]
//! with a stable code.

use thiserror::Error;

/// Stable code attached to wrapped, unrecognized errors.
pub const UNEXPECTED_CODE: &str = "VCI-010";

/// Result type for holder-side issuance operations.
pub type Result<T, E = Error> = anyhow::Result<T, E>;

/// Errors raised while resolving offers and metadata, exchanging tokens,
/// and downloading credentials.
#[derive(Error, Debug)]
pub enum Error {
    /// Issuer metadata could not be fetched or resolved.
    #[error("issuer metadata error: {0}")]
    MetadataFetch(String),

    /// A credential offer could not be fetched, parsed, or validated.
    #[error("credential offer error: {0}")]
    OfferFetch(String),

    /// Request construction failed validation. The message names the
    /// missing or mismatched fields.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A network request failed at the transport level.
    #[error("network request failed: {0}")]
    Network(String),

    /// A network request exceeded its bounded timeout.
    #[error("network request timed out: {0}")]
    Timeout(String),

    /// The credential download step failed.
    #[error("credential download failed: {0}")]
    Download(String),

    /// The issuer rejected the supplied access token.
    #[error("invalid access token: {0}")]
    InvalidAccessToken(String),

    /// The holder public key material was rejected.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Catch-all for unrecognized failures, carrying a stable code and the
    /// original message for diagnostics.
    #[error("{code}: {message}")]
    Unexpected {
        /// Stable error code ([`UNEXPECTED_CODE`] when wrapped here).
        code: String,

        /// The original failure message, preserved verbatim.
        message: String,
    },
}

impl Error {
    /// Wrap an unrecognized failure, preserving its message.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected { code: UNEXPECTED_CODE.to_string(), message: message.into() }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<Self>() {
            Some(Self::MetadataFetch(e)) => Self::MetadataFetch(e.clone()),
            Some(Self::OfferFetch(e)) => Self::OfferFetch(e.clone()),
            Some(Self::InvalidData(e)) => Self::InvalidData(e.clone()),
            Some(Self::Network(e)) => Self::Network(e.clone()),
            Some(Self::Timeout(e)) => Self::Timeout(e.clone()),
            Some(Self::Download(e)) => Self::Download(e.clone()),
            Some(Self::InvalidAccessToken(e)) => Self::InvalidAccessToken(e.clone()),
            Some(Self::InvalidPublicKey(e)) => Self::InvalidPublicKey(e.clone()),
            Some(Self::Unexpected { code, message }) => {
                Self::Unexpected { code: code.clone(), message: message.clone() }
            }
            None => Self::unexpected(format!("{err:#}")),
        }
    }
}
