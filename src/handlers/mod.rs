// src/handlers/mod.rs
//
// HTTP handlers organized by resource. Every handler except the static
// routes takes a `UserCtx`, which runs the request gate first.

mod dtos;
pub mod activities;
pub mod categories;
pub mod history;
pub mod users;

pub use dtos::*;

use crate::error::AppError;
use crate::gate::RequestLabel;
use crate::validation::parse_id;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use std::collections::HashMap;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Routes of the API plus the static web client.
pub fn router(state: AppState, static_path: &Path) -> Router {
    Router::new()
        .route("/users/new", post(users::create_user))
        .route("/categories/", get(categories::list_categories))
        .route("/categories/new", post(categories::create_category))
        .route("/categories/:id", delete(categories::delete_category))
        .route("/activities", get(activities::list_activities))
        .route("/activities/new", post(activities::create_activity))
        .route("/history", get(history::weekly_history))
        .route("/history/do", post(history::record_completion))
        .route_service("/", ServeFile::new(static_path.join("html").join("index.html")))
        .nest_service("/static", ServeDir::new(static_path))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Unwrap a JSON body, turning any rejection into a 400.
fn json_body<T>(body: Result<Json<T>, JsonRejection>, request: &RequestLabel) -> Result<T, AppError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        log::debug!("{request} decode body: {rejection}");
        AppError::InvalidInput {
            field: "body",
            reason: rejection.body_text(),
        }
    })
}

/// Numeric query parameter; missing or non-numeric values are a 400.
fn query_id(
    params: &HashMap<String, String>,
    field: &'static str,
    request: &RequestLabel,
) -> Result<i64, AppError> {
    path_id(field, params.get(field).map_or("", String::as_str), request)
}

/// Numeric id from a path segment or query value.
fn path_id(field: &'static str, raw: &str, request: &RequestLabel) -> Result<i64, AppError> {
    parse_id(field, raw).inspect_err(|e| log::debug!("{request} {e}"))
}
