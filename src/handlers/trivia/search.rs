use std::collections::HashMap;

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::database::models::Question;
use crate::error::ApiError;
use crate::filter::Page;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    /// Category of each matching question, in match order
    #[serde(rename = "currentCategory")]
    pub current_category: Vec<i64>,
}

/// POST /search - case-insensitive substring match on the question text
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    JsonBody(payload): JsonBody<SearchPayload>,
) -> ApiResult<SearchResults> {
    let term = payload.search_term.ok_or_else(|| ApiError::missing_field("searchTerm"))?;

    let matches = state.store.search_questions(&term).await?;
    if matches.is_empty() {
        return Err(ApiError::resource_not_found());
    }

    let page = Page::from_query(&params);
    Ok(ApiResponse::success(SearchResults {
        questions: page.slice(&matches).to_vec(),
        total_questions: matches.len(),
        current_category: matches.iter().map(|q| q.category).collect(),
    }))
}
