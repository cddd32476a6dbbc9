//! Identity gateway: bearer token → provider identity → allow-list check.

mod remote;

pub use remote::RemoteProvider;

use crate::error::AuthError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity claims returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub provider_id: String,
    pub display_name: String,
}

/// Exchanges a bearer token for the identity it belongs to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn who_am_i(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Provider ids permitted to use the server. Empty means everyone.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn permits(&self, provider_id: &str) -> bool {
        self.is_open() || self.ids.contains(provider_id)
    }
}

/// Extract the token from an `Authorization` header value.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

pub struct IdentityGateway {
    provider: Arc<dyn IdentityProvider>,
    allow_list: AllowList,
}

impl IdentityGateway {
    pub fn new(provider: Arc<dyn IdentityProvider>, allow_list: AllowList) -> Self {
        Self { provider, allow_list }
    }

    /// Authorize a request from its `Authorization` header. Read-only: no
    /// local state is touched.
    pub async fn authorize(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let token = parse_bearer(header)?;
        let identity = self.provider.who_am_i(token).await?;

        if !self.allow_list.permits(&identity.provider_id) {
            return Err(AuthError::NotAllowed);
        }
        if identity.provider_id.is_empty() || identity.display_name.is_empty() {
            return Err(AuthError::IncompleteIdentity);
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeProvider;

    fn gateway(allow: &[&str]) -> IdentityGateway {
        let provider = FakeProvider::default()
            .with("good", "fb-1", "Ann")
            .with("nameless", "fb-2", "")
            .with("anonymous", "", "Nobody");
        IdentityGateway::new(Arc::new(provider), AllowList::new(allow.iter().copied()))
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert!(matches!(parse_bearer(None), Err(AuthError::MalformedHeader)));
        assert!(matches!(parse_bearer(Some("Bearer ")), Err(AuthError::MalformedHeader)));
        assert!(matches!(parse_bearer(Some("Basic abc")), Err(AuthError::MalformedHeader)));
        assert!(matches!(parse_bearer(Some("bearer abc")), Err(AuthError::MalformedHeader)));
    }

    #[test]
    fn test_allow_list_open_when_empty() {
        let open = AllowList::default();
        assert!(open.is_open());
        assert!(open.permits("anyone"));

        let closed = AllowList::new(["fb-1"]);
        assert!(closed.permits("fb-1"));
        assert!(!closed.permits("fb-2"));
    }

    #[tokio::test]
    async fn test_authorize_allowed_identity() {
        let identity = gateway(&["fb-1"]).authorize(Some("Bearer good")).await.unwrap();
        assert_eq!(identity.provider_id, "fb-1");
        assert_eq!(identity.display_name, "Ann");
    }

    #[tokio::test]
    async fn test_authorize_rejects_not_allowed() {
        let err = gateway(&["fb-9"]).authorize(Some("Bearer good")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotAllowed));
    }

    #[tokio::test]
    async fn test_authorize_rejects_incomplete_identity() {
        let gw = gateway(&[]);
        assert!(matches!(
            gw.authorize(Some("Bearer nameless")).await,
            Err(AuthError::IncompleteIdentity)
        ));
        assert!(matches!(
            gw.authorize(Some("Bearer anonymous")).await,
            Err(AuthError::IncompleteIdentity)
        ));
    }

    #[tokio::test]
    async fn test_authorize_propagates_provider_failure() {
        let err = gateway(&[]).authorize(Some("Bearer unknown")).await.unwrap_err();
        assert!(matches!(err, AuthError::UpstreamDecodeError(_)));
    }

    #[tokio::test]
    async fn test_authorize_rejects_malformed_header_without_calling_provider() {
        let err = gateway(&[]).authorize(Some("Token good")).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedHeader));
    }
}
