pub mod categories;
pub mod questions;
pub mod quizzes;
pub mod search;

use std::collections::BTreeMap;

use crate::database::Store;
use crate::error::ApiError;

/// `{id: type}` map of every category
pub(crate) async fn category_map(store: &dyn Store) -> Result<BTreeMap<i64, String>, ApiError> {
    let categories = store.categories().await?;
    Ok(categories.into_iter().map(|c| (c.id, c.kind)).collect())
}
