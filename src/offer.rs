//! # Credential Offer Resolution
//!
//! Turns a scanned offer string into a validated [`CredentialOffer`],
//! whether the offer is embedded in the URI (`credential_offer`) or
//! referenced by URL (`credential_offer_uri`).

use std::time::Duration;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{Error, Result};
use crate::provider::HttpClient;
use crate::types::CredentialOffer;

const OFFER_SCHEME_NO_AUTHORITY: &str = "openid-credential-offer://?";
const OFFER_SCHEME_DUMMY_AUTHORITY: &str = "openid-credential-offer://offer?";

/// Resolve an offer string into a validated [`CredentialOffer`].
///
/// # Errors
///
/// Returns [`Error::OfferFetch`] carrying the original failure detail if
/// the URI cannot be parsed, neither recognized key is present, the
/// referenced offer cannot be fetched, or validation fails.
pub async fn resolve_offer(
    http: &impl HttpClient, offer_string: &str, timeout: Duration,
) -> Result<CredentialOffer> {
    // the authority-less form trips standard URI parsing
    let normalized =
        offer_string.replacen(OFFER_SCHEME_NO_AUTHORITY, OFFER_SCHEME_DUMMY_AUTHORITY, 1);
    let uri = Url::parse(&normalized)
        .map_err(|e| Error::OfferFetch(format!("credential offer URL not valid: {e}")))?;

    let mut by_value = None;
    let mut by_reference = None;
    for (key, value) in uri.query_pairs() {
        match key.as_ref() {
            "credential_offer" => by_value = Some(value.into_owned()),
            "credential_offer_uri" => by_reference = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(encoded) = by_value {
        return offer_by_value(&encoded);
    }
    if let Some(url) = by_reference {
        return offer_by_reference(http, &url, timeout).await;
    }
    Err(Error::OfferFetch(
        "invalid credential offer URL: must contain 'credential_offer' or 'credential_offer_uri'"
            .to_string(),
    ))
}

fn offer_by_value(encoded: &str) -> Result<CredentialOffer> {
    let decoded = percent_decode_str(encoded).decode_utf8_lossy();
    let offer: CredentialOffer = serde_json::from_str(&decoded)
        .map_err(|e| Error::OfferFetch(format!("invalid credential offer JSON: {e}")))?;
    offer.validate()?;
    Ok(offer)
}

async fn offer_by_reference(
    http: &impl HttpClient, url: &str, timeout: Duration,
) -> Result<CredentialOffer> {
    let response = http
        .get(url, &[("Accept", "application/json")], timeout)
        .await
        .map_err(|e| Error::OfferFetch(format!("failed to fetch credential offer: {e:#}")))?;
    if !response.status.is_success() {
        return Err(Error::OfferFetch(format!(
            "credential offer request returned {}: {}",
            response.status, response.body
        )));
    }
    if response.body.trim().is_empty() {
        return Err(Error::OfferFetch(format!("empty response from {url}")));
    }

    let offer: CredentialOffer = serde_json::from_str(&response.body)
        .map_err(|e| Error::OfferFetch(format!("invalid credential offer JSON: {e}")))?;
    offer.validate()?;
    Ok(offer)
}
