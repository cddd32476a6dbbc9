// src/handlers/dtos.rs

use crate::models::{Activity, Category, Completion, WeekRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Deserialize)]
pub struct NewActivityRequest {
    pub name: String,
    pub npoms: i32,
    pub cat_id: i64,
}

#[derive(Serialize)]
pub struct ActivityResponse {
    pub id: i64,
    pub name: String,
    pub npom: i32,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name,
            npom: activity.npom,
        }
    }
}

#[derive(Serialize)]
pub struct ActivityListResponse {
    pub activities: Vec<ActivityResponse>,
}

#[derive(Deserialize)]
pub struct DoRequest {
    pub activity: i64,
    pub done_value: i32,
}

#[derive(Serialize)]
pub struct DoResponse {
    pub activity: i64,
    pub new_value: i64,
    pub left: i64,
    pub last_updated: i64,
}

impl From<Completion> for DoResponse {
    fn from(c: Completion) -> Self {
        Self {
            activity: c.activity_id,
            new_value: c.done_today,
            left: c.remaining,
            last_updated: c.timestamp,
        }
    }
}

/// Activity id → seven daily sums, serialized as a JSON object.
pub type HistoryResponse = BTreeMap<i64, WeekRow>;
