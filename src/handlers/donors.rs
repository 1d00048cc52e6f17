use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::database::models::{is_valid_blood_type, Donor, DonorChanges, NewDonor, BLOOD_TYPES};
use crate::error::ApiError;
use crate::filter::Page;
use crate::handlers::required_text;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, RecordId};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DonorPayload {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub blood_type: Option<String>,
    pub products: Option<String>,
    pub num_products: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct DonorPage {
    pub donors: Vec<Donor>,
    pub total_donors: usize,
}

#[derive(Debug, Serialize)]
pub struct SingleDonor {
    pub donor: Donor,
}

#[derive(Debug, Serialize)]
pub struct DonorCreated {
    pub created: i64,
    pub donor: Donor,
}

#[derive(Debug, Serialize)]
pub struct DonorDeleted {
    pub deleted: i64,
}

fn check_blood_type(value: &str) -> Result<(), ApiError> {
    if is_valid_blood_type(value) {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity(format!(
            "unprocessable: blood_type must be one of {}",
            BLOOD_TYPES.join(", ")
        )))
    }
}

fn check_num_products(value: i32) -> Result<(), ApiError> {
    if value < 0 {
        return Err(ApiError::unprocessable_entity("unprocessable: num_products cannot be negative"));
    }
    Ok(())
}

impl DonorPayload {
    fn into_new(self) -> Result<NewDonor, ApiError> {
        let name = required_text(self.name, "name")?;
        let date_of_birth = self.date_of_birth.ok_or_else(|| ApiError::missing_field("date_of_birth"))?;
        let blood_type = required_text(self.blood_type, "blood_type")?;
        check_blood_type(&blood_type)?;
        let num_products = self.num_products.unwrap_or(0);
        check_num_products(num_products)?;

        Ok(NewDonor {
            name,
            date_of_birth,
            blood_type,
            products: self.products,
            num_products,
        })
    }

    fn into_changes(self) -> Result<DonorChanges, ApiError> {
        if let Some(blood_type) = &self.blood_type {
            check_blood_type(blood_type)?;
        }
        if let Some(num_products) = self.num_products {
            check_num_products(num_products)?;
        }

        let changes = DonorChanges {
            name: self.name.map(|n| required_text(Some(n), "name")).transpose()?,
            date_of_birth: self.date_of_birth,
            blood_type: self.blood_type,
            products: self.products,
            num_products: self.num_products,
        };
        if changes.is_empty() {
            return Err(ApiError::unprocessable_entity("unprocessable: nothing to update"));
        }
        Ok(changes)
    }
}

/// GET /donors?page=N - requires `get:donors`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<DonorPage> {
    let all = state.store.donors().await?;
    let donors = Page::from_query(&params).paginate(&all, Donor::clone);
    if donors.is_empty() {
        return Err(ApiError::resource_not_found());
    }

    Ok(ApiResponse::success(DonorPage {
        donors,
        total_donors: all.len(),
    }))
}

/// GET /donors/:id - requires `get:donors`
pub async fn show(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<SingleDonor> {
    let donor = state
        .store
        .donor(id)
        .await?
        .ok_or_else(ApiError::resource_not_found)?;
    Ok(ApiResponse::success(SingleDonor { donor }))
}

/// POST /donors - requires `post:donors`
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(payload): JsonBody<DonorPayload>,
) -> ApiResult<DonorCreated> {
    let donor = state.store.insert_donor(payload.into_new()?).await?;
    tracing::info!("Donor {} registered by {}", donor.id, identity.subject);

    Ok(ApiResponse::with_status(
        DonorCreated {
            created: donor.id,
            donor,
        },
        StatusCode::CREATED,
    ))
}

/// PATCH /donors/:id - requires `patch:donors`
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<DonorPayload>,
) -> ApiResult<SingleDonor> {
    let donor = state.store.update_donor(id, payload.into_changes()?).await?;
    tracing::info!("Donor {} updated by {}", donor.id, identity.subject);

    Ok(ApiResponse::success(SingleDonor { donor }))
}

/// DELETE /donors/:id - requires `delete:donors`
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    RecordId(id): RecordId,
) -> ApiResult<DonorDeleted> {
    state.store.delete_donor(id).await?;
    tracing::info!("Donor {} removed by {}", id, identity.subject);

    Ok(ApiResponse::success(DonorDeleted { deleted: id }))
}
