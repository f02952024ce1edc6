//! OpenID Connect provider discovery.

use serde::Deserialize;

use super::AuthFailure;

/// Path of the provider metadata document relative to the issuer.
pub const WELL_KNOWN_PATH: &str = "/.well-known/openid-configuration";

/// The subset of OpenID provider metadata the SDK uses.
///
/// The issuer in the document is not compared against the authorizer URL,
/// so providers that advertise a different public issuer still work.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    /// Issuer identifier.
    #[serde(default)]
    pub issuer: Option<String>,
    /// OAuth 2.0 token endpoint.
    pub token_endpoint: String,
    /// JSON Web Key Set location.
    #[serde(default)]
    pub jwks_uri: Option<String>,
}

/// Returns the metadata URL for an authorizer base URL.
pub fn discovery_url(authorizer_url: &str) -> String {
    format!("{}{}", authorizer_url.trim_end_matches('/'), WELL_KNOWN_PATH)
}

/// Fetches provider metadata from `{authorizer_url}/.well-known/openid-configuration`.
///
/// # Errors
///
/// Every failure, including an unreachable provider, is reported as
/// [`AuthFailure::Discovery`].
pub async fn discover(
    http: &reqwest::Client,
    authorizer_url: &str,
) -> Result<ProviderMetadata, AuthFailure> {
    let url = discovery_url(authorizer_url);
    tracing::debug!(url = %url, "fetching OpenID provider metadata");

    let discovery_error = |reason: String, source: Option<reqwest::Error>| AuthFailure::Discovery {
        url: url.clone(),
        reason,
        source,
    };

    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| discovery_error("provider unreachable".into(), Some(e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(discovery_error(format!("unexpected status {}", status), None));
    }

    let metadata: ProviderMetadata = response
        .json()
        .await
        .map_err(|e| discovery_error("invalid provider metadata".into(), Some(e)))?;

    if metadata.token_endpoint.is_empty() {
        return Err(discovery_error("provider metadata has no token_endpoint".into(), None));
    }

    Ok(metadata)
}
