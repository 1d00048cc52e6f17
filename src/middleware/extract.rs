use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` whose rejections use the failure envelope.
///
/// Syntax errors and a missing content type are 400; well-formed JSON of the
/// wrong shape is 422.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(JsonRejection::JsonDataError(e)) => {
                Err(ApiError::unprocessable_entity(format!("unprocessable: {}", e.body_text())))
            }
            Err(rejection) => Err(ApiError::bad_request(format!("bad request: {}", rejection.body_text()))),
        }
    }
}

/// Integer record id from the last path segment. Anything else is a 404,
/// the same as a route that never matched.
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::resource_not_found())?;
        raw.parse::<i64>()
            .map(RecordId)
            .map_err(|_| ApiError::resource_not_found())
    }
}
