use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::error::ApiError;
use crate::handlers::required_text;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GreetingTable {
    pub greetings: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SingleGreeting {
    pub greeting: String,
}

#[derive(Debug, Deserialize)]
pub struct GreetingPayload {
    pub lang: Option<String>,
    pub greeting: Option<String>,
}

/// GET /greeting
pub async fn all(State(state): State<AppState>) -> ApiResult<GreetingTable> {
    let greetings = state.store.greetings().await?;
    Ok(ApiResponse::success(GreetingTable { greetings }))
}

/// GET /greeting/:lang
pub async fn one(State(state): State<AppState>, Path(lang): Path<String>) -> ApiResult<SingleGreeting> {
    let greeting = state
        .store
        .greeting(&lang)
        .await?
        .ok_or_else(ApiError::resource_not_found)?;
    Ok(ApiResponse::success(SingleGreeting { greeting }))
}

/// POST /greeting - add or replace one language
pub async fn add(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<GreetingPayload>,
) -> ApiResult<GreetingTable> {
    let lang = required_text(payload.lang, "lang")?;
    let greeting = required_text(payload.greeting, "greeting")?;

    state.store.put_greeting(&lang, &greeting).await?;

    let greetings = state.store.greetings().await?;
    Ok(ApiResponse::success(GreetingTable { greetings }))
}

/// GET /headers and GET /image - echo the verified identity
pub async fn whoami(Extension(identity): Extension<Identity>) -> ApiResponse<Identity> {
    ApiResponse::success(identity)
}
