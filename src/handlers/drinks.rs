use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::database::models::{Drink, DrinkChanges, Ingredient, NewDrink, ShortDrink};
use crate::error::ApiError;
use crate::handlers::required_text;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, RecordId};
use crate::state::AppState;

/// A recipe may be posted as one ingredient or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    fn into_recipe(self) -> Result<Vec<Ingredient>, ApiError> {
        let recipe = match self {
            RecipeInput::Many(ingredients) => ingredients,
            RecipeInput::One(ingredient) => vec![ingredient],
        };

        if recipe.is_empty() {
            return Err(ApiError::unprocessable_entity("unprocessable: recipe needs at least one ingredient"));
        }
        if let Some(bad) = recipe.iter().find(|i| i.name.trim().is_empty() || i.parts < 1) {
            return Err(ApiError::unprocessable_entity(format!(
                "unprocessable: invalid ingredient '{}'",
                bad.name
            )));
        }
        Ok(recipe)
    }
}

#[derive(Debug, Deserialize)]
pub struct DrinkPayload {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Serialize)]
pub struct ShortDrinks {
    pub drinks: Vec<ShortDrink>,
}

#[derive(Debug, Serialize)]
pub struct LongDrinks {
    pub drinks: Vec<Drink>,
}

#[derive(Debug, Serialize)]
pub struct DrinkDeleted {
    pub delete: i64,
}

/// GET /drinks - public, short recipe form
pub async fn list(State(state): State<AppState>) -> ApiResult<ShortDrinks> {
    let drinks = state.store.drinks().await?;
    Ok(ApiResponse::success(ShortDrinks {
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

/// GET /drinks-detail - requires `get:drinks-detail`
pub async fn detail(State(state): State<AppState>) -> ApiResult<LongDrinks> {
    let drinks = state.store.drinks().await?;
    Ok(ApiResponse::success(LongDrinks {
        drinks: drinks.iter().map(Drink::long).collect(),
    }))
}

/// POST /drinks - requires `post:drinks`
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(payload): JsonBody<DrinkPayload>,
) -> ApiResult<LongDrinks> {
    let title = required_text(payload.title, "title")?;
    let recipe = payload
        .recipe
        .ok_or_else(|| ApiError::missing_field("recipe"))?
        .into_recipe()?;

    let drink = state.store.insert_drink(NewDrink { title, recipe }).await?;
    tracing::info!("Drink {} created by {}", drink.id, identity.subject);

    Ok(ApiResponse::success(LongDrinks {
        drinks: vec![drink.long()],
    }))
}

/// PATCH /drinks/:id - requires `patch:drinks`
///
/// Updates whichever of `title` and `recipe` are present; at least one must be.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<DrinkPayload>,
) -> ApiResult<LongDrinks> {
    let changes = DrinkChanges {
        title: payload.title.map(|t| required_text(Some(t), "title")).transpose()?,
        recipe: payload.recipe.map(RecipeInput::into_recipe).transpose()?,
    };
    if changes.is_empty() {
        return Err(ApiError::unprocessable_entity("unprocessable: nothing to update"));
    }

    let drink = state.store.update_drink(id, changes).await?;
    tracing::info!("Drink {} updated by {}", drink.id, identity.subject);

    Ok(ApiResponse::success(LongDrinks {
        drinks: vec![drink.long()],
    }))
}

/// DELETE /drinks/:id - requires `delete:drinks`
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    RecordId(id): RecordId,
) -> ApiResult<DrinkDeleted> {
    state.store.delete_drink(id).await?;
    tracing::info!("Drink {} deleted by {}", id, identity.subject);

    Ok(ApiResponse::success(DrinkDeleted { delete: id }))
}
