use super::{json_body, path_id, CategoryResponse, CreatedResponse, NewCategoryRequest};
use crate::db::with_connection;
use crate::error::AppError;
use crate::gate::UserCtx;
use crate::models::Category;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_categories(
    user: UserCtx,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let uid = user.require_local_id()?;
    let categories = with_connection(&state.db, user.request.as_str(), "select categories", move |conn| {
        Ok(Category::find_all_for_user(conn, uid)?)
    })
    .await?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

pub async fn create_category(
    user: UserCtx,
    State(state): State<AppState>,
    body: Result<Json<NewCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let uid = user.require_local_id()?;
    let req = json_body(body, &user.request)?;
    let name = req.name;

    let category = with_connection(&state.db, user.request.as_str(), "insert category", move |conn| {
        Ok(Category::create(conn, uid, &name)?)
    })
    .await?;

    log::debug!("{} created category {}", user.request, category.id);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: category.id })))
}

/// Delete a category and everything under it.
pub async fn delete_category(
    user: UserCtx,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uid = user.require_local_id()?;
    let id = path_id("id", &raw_id, &user.request)?;

    let deleted = with_connection(&state.db, user.request.as_str(), "delete category", move |conn| {
        Ok(Category::delete_with_activities(conn, id, uid)?)
    })
    .await?;

    if !deleted {
        log::debug!("{} category {id} not found for user {uid}", user.request);
        return Err(AppError::NotFound { entity: "Category" });
    }
    log::debug!("{} deleted category {id}", user.request);
    Ok(StatusCode::OK)
}
