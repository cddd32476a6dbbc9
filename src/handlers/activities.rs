use super::{json_body, query_id, ActivityListResponse, ActivityResponse, CreatedResponse, NewActivityRequest};
use crate::calendar::now_ms;
use crate::db::with_connection;
use crate::error::AppError;
use crate::gate::UserCtx;
use crate::models::{Activity, Category};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::collections::HashMap;

/// Activities of one of the caller's categories, in display order.
pub async fn list_activities(
    user: UserCtx,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ActivityListResponse>, AppError> {
    let uid = user.require_local_id()?;
    let cat_id = query_id(&params, "cat_id", &user.request)?;

    let activities = with_connection(&state.db, user.request.as_str(), "select activities", move |conn| {
        Ok(Activity::find_by_category(conn, cat_id, uid)?)
    })
    .await?;

    Ok(Json(ActivityListResponse {
        activities: activities.into_iter().map(ActivityResponse::from).collect(),
    }))
}

pub async fn create_activity(
    user: UserCtx,
    State(state): State<AppState>,
    body: Result<Json<NewActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let uid = user.require_local_id()?;
    let req = json_body(body, &user.request)?;
    let NewActivityRequest { name, npoms, cat_id } = req;
    let activity = with_connection(&state.db, user.request.as_str(), "insert activity", move |conn| {
        if Category::find_owned(conn, cat_id, uid)?.is_none() {
            return Err(AppError::NotFound { entity: "Category" });
        }
        Ok(Activity::create(conn, cat_id, &name, npoms, now_ms())?)
    })
    .await?;

    log::debug!(
        "{} created activity {} at order {}",
        user.request, activity.id, activity.display_order
    );
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: activity.id })))
}
