use std::collections::BTreeMap;

use axum::extract::State;
use serde::Serialize;

use crate::database::models::Question;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RecordId};
use crate::state::AppState;

use super::category_map;

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: BTreeMap<i64, String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryQuestions {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
}

/// GET /categories
pub async fn list(State(state): State<AppState>) -> ApiResult<CategoryList> {
    let categories = category_map(state.store.as_ref()).await?;
    Ok(ApiResponse::success(CategoryList { categories }))
}

/// GET /categories/:id/questions - every question in one category
pub async fn questions(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<CategoryQuestions> {
    let category = state
        .store
        .category(id)
        .await?
        .ok_or_else(ApiError::resource_not_found)?;

    let questions = state.store.questions_in_category(id).await?;

    Ok(ApiResponse::success(CategoryQuestions {
        total_questions: questions.len(),
        questions,
        current_category: category.kind,
    }))
}
