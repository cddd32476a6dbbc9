//! Request gate: every protected handler takes a [`UserCtx`], so the
//! identity check and local user lookup run before the handler body.

use crate::db::with_connection;
use crate::error::{AppError, AuthError};
use crate::models::User;
use crate::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::fmt;

/// `[METHOD /path]`, prefixed to every log line of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLabel(String);

impl RequestLabel {
    pub fn from_parts(parts: &Parts) -> Self {
        Self(format!("[{} {}]", parts.method, parts.uri.path()))
    }

    #[cfg(test)]
    pub(crate) fn new(label: &str) -> Self {
        Self(label.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an authorized request.
#[derive(Debug, Clone)]
pub struct UserCtx {
    pub provider_id: String,
    pub display_name: String,
    /// Absent until the user has been provisioned via `POST /users/new`.
    pub local_id: Option<i64>,
    pub request: RequestLabel,
}

impl UserCtx {
    /// Local user id, or 403 for identities not provisioned yet.
    pub fn require_local_id(&self) -> Result<i64, AppError> {
        self.local_id.ok_or_else(|| {
            log::warn!("{} user {} not found in db", self.request, self.provider_id);
            AppError::Auth(AuthError::NotRegistered)
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserCtx {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let request = RequestLabel::from_parts(parts);
        log::debug!(">> {request}");

        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let identity = state.identity.authorize(header).await.map_err(|e| {
            log::warn!("{request} authorize: {e}");
            AppError::from(e)
        })?;

        let provider_id = identity.provider_id.clone();
        let local_id = with_connection(&state.db, request.as_str(), "select user from db", move |conn| {
            Ok(User::find_id_by_provider_id(conn, &provider_id)?)
        })
        .await?;

        Ok(Self {
            provider_id: identity.provider_id,
            display_name: identity.display_name,
            local_id,
            request,
        })
    }
}
