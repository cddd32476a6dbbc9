use super::{Identity, IdentityProvider};
use crate::error::AuthError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Body of the provider's "who am I" endpoint. Unknown fields are ignored,
/// missing ones decode as empty and are rejected later by the gateway.
#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

/// Identity provider reached over HTTP, token passed as `access_token`.
pub struct RemoteProvider {
    http: reqwest::Client,
    endpoint: Url,
}

impl RemoteProvider {
    pub fn new(endpoint: Url, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }
}

// The request URL carries the token, keep it out of error messages.
fn describe(e: reqwest::Error) -> String {
    e.without_url().to_string()
}

#[async_trait]
impl IdentityProvider for RemoteProvider {
    async fn who_am_i(&self, token: &str) -> Result<Identity, AuthError> {
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(|e| AuthError::UpstreamUnavailable(describe(e)))?;

        log::debug!("identity provider answered {}", resp.status());

        let me: MeResponse = resp.json().await.map_err(|e| {
            if e.is_decode() {
                AuthError::UpstreamDecodeError(describe(e))
            } else {
                AuthError::UpstreamUnavailable(describe(e))
            }
        })?;

        Ok(Identity {
            provider_id: me.id,
            display_name: me.name,
        })
    }
}
