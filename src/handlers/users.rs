use crate::calendar::now_ms;
use crate::db::with_connection;
use crate::error::{is_unique_violation, AppError};
use crate::gate::UserCtx;
use crate::models::User;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;

/// Register the caller under their identity-provider id.
pub async fn create_user(user: UserCtx, State(state): State<AppState>) -> Result<StatusCode, AppError> {
    if user.local_id.is_some() {
        log::warn!("{} user {} already registered", user.request, user.provider_id);
        return Err(AppError::Conflict { entity: "User" });
    }

    let provider_id = user.provider_id.clone();
    let name = user.display_name.clone();
    let created = with_connection(&state.db, user.request.as_str(), "insert user", move |conn| {
        User::create(conn, &provider_id, &name, now_ms()).map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict { entity: "User" }
            } else {
                AppError::Database(e)
            }
        })
    })
    .await?;

    log::info!("{} registered user {} as {}", user.request, created.provider_id, created.id);
    Ok(StatusCode::CREATED)
}
