use super::{json_body, query_id, DoRequest, DoResponse, HistoryResponse};
use crate::calendar::now_ms;
use crate::db::with_connection;
use crate::error::AppError;
use crate::gate::UserCtx;
use crate::models::{self, HistoryEntry};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use std::collections::HashMap;

/// Per-activity daily sums over the last seven local days of a category.
pub async fn weekly_history(
    user: UserCtx,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<HistoryResponse>, AppError> {
    let uid = user.require_local_id()?;
    let cat_id = query_id(&params, "cat_id", &user.request)?;
    let window = state.calendar.week_window(now_ms())?;

    let totals = with_connection(&state.db, user.request.as_str(), "select history", move |conn| {
        Ok(HistoryEntry::weekly_totals(conn, uid, cat_id, &window)?)
    })
    .await?;

    Ok(Json(totals))
}

/// Record a completion delta and report today's progress.
pub async fn record_completion(
    user: UserCtx,
    State(state): State<AppState>,
    body: Result<Json<DoRequest>, JsonRejection>,
) -> Result<Json<DoResponse>, AppError> {
    let uid = user.require_local_id()?;
    let req = json_body(body, &user.request)?;
    let now = now_ms();
    let today_start = state.calendar.today_start_ms(now)?;

    let completion = with_connection(&state.db, user.request.as_str(), "insert history", move |conn| {
        models::record_completion(conn, uid, req.activity, req.done_value, now, today_start)?
            .ok_or(AppError::NotFound { entity: "Activity" })
    })
    .await?;

    log::debug!(
        "{} activity {} done {} today, {} left",
        user.request, completion.activity_id, completion.done_today, completion.remaining
    );
    Ok(Json(DoResponse::from(completion)))
}
