use std::collections::{BTreeMap, HashMap};

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::models::{NewQuestion, Question};
use crate::error::ApiError;
use crate::filter::Page;
use crate::handlers::{required_integer, required_text};
use crate::middleware::{ApiResponse, ApiResult, JsonBody, RecordId};
use crate::state::AppState;

use super::category_map;

#[derive(Debug, Serialize)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub categories: BTreeMap<i64, String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionDeleted {
    pub deleted: i64,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct QuestionCreated {
    pub created: i64,
    pub question_created: Vec<Question>,
    pub total_questions: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuestionPayload {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<Value>,
    pub difficulty: Option<Value>,
}

impl QuestionPayload {
    fn validate(self) -> Result<NewQuestion, ApiError> {
        let question = required_text(self.question, "question")?;
        let answer = required_text(self.answer, "answer")?;
        let category = required_integer(self.category, "category")?;
        let difficulty = required_integer(self.difficulty, "difficulty")?;
        let difficulty = i32::try_from(difficulty)
            .map_err(|_| ApiError::unprocessable_entity("unprocessable: 'difficulty' out of range"))?;

        Ok(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

/// GET /questions?page=N
///
/// An empty page is a 404.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<QuestionPage> {
    let page = Page::from_query(&params);
    let all = state.store.questions().await?;

    let questions = page.slice(&all).to_vec();
    if questions.is_empty() {
        return Err(ApiError::resource_not_found());
    }

    Ok(ApiResponse::success(QuestionPage {
        questions,
        total_questions: all.len() as i64,
        categories: category_map(state.store.as_ref()).await?,
    }))
}

/// POST /questions
pub async fn create(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    JsonBody(payload): JsonBody<QuestionPayload>,
) -> ApiResult<QuestionCreated> {
    let new_question = payload.validate()?;
    let question = state.store.insert_question(new_question).await?;
    tracing::info!("Created question {}", question.id);

    let all = state.store.questions().await?;
    let page = Page::from_query(&params);

    Ok(ApiResponse::success(QuestionCreated {
        created: question.id,
        question_created: page.slice(&all).to_vec(),
        total_questions: state.store.count_questions().await?,
    }))
}

/// DELETE /questions/:id
///
/// Deleting a question that does not exist is a 422.
pub async fn delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<QuestionDeleted> {
    state.store.delete_question(id).await?;
    tracing::info!("Deleted question {}", id);

    let remaining = state.store.questions().await?;
    let page = Page::from_query(&params);

    Ok(ApiResponse::success(QuestionDeleted {
        deleted: id,
        questions: page.slice(&remaining).to_vec(),
    }))
}
