use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::models::Question;
use crate::error::ApiError;
use crate::handlers::required_integer;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::{pick_question, ALL_CATEGORIES};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    pub id: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct QuizPayload {
    #[serde(default)]
    pub previous_questions: Option<Vec<i64>>,
    pub quiz_category: Option<QuizCategory>,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub question: Question,
}

/// POST /quizzes - next random question not yet seen
///
/// Category id 0 draws from every category. Running out of unseen
/// questions is a 422.
pub async fn play(State(state): State<AppState>, JsonBody(payload): JsonBody<QuizPayload>) -> ApiResult<QuizQuestion> {
    let category = payload
        .quiz_category
        .ok_or_else(|| ApiError::missing_field("quiz_category"))?;
    let category_id = required_integer(category.id, "quiz_category.id")?;
    let previous = payload.previous_questions.unwrap_or_default();

    let candidates = if category_id == ALL_CATEGORIES {
        state.store.questions().await?
    } else {
        state.store.questions_in_category(category_id).await?
    };

    let question = pick_question(&candidates, &previous, &mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| ApiError::unprocessable_entity("unprocessable: no questions left to play"))?;

    Ok(ApiResponse::success(QuizQuestion { question }))
}
