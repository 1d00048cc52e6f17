//! Store traits the handlers talk to.
//!
//! Reads that find nothing return `Ok(None)` or an empty list; mutations
//! aimed at a missing row return [`StoreError::NotFound`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{
    Category, Donor, DonorChanges, Drink, DrinkChanges, NewDonor, NewDrink, NewQuestion, Question,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("invalid value: {0}")]
    Invalid(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TriviaStore: Send + Sync {
    async fn categories(&self) -> StoreResult<Vec<Category>>;

    async fn category(&self, id: i64) -> StoreResult<Option<Category>>;

    /// All questions ordered by id
    async fn questions(&self) -> StoreResult<Vec<Question>>;

    /// Questions of one category ordered by id
    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>>;

    /// Questions whose text contains `term`, case-insensitively, ordered by id
    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>>;

    async fn count_questions(&self) -> StoreResult<i64>;

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question>;

    async fn delete_question(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait DrinkStore: Send + Sync {
    async fn drinks(&self) -> StoreResult<Vec<Drink>>;

    async fn insert_drink(&self, drink: NewDrink) -> StoreResult<Drink>;

    async fn update_drink(&self, id: i64, changes: DrinkChanges) -> StoreResult<Drink>;

    async fn delete_drink(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait DonorStore: Send + Sync {
    async fn donors(&self) -> StoreResult<Vec<Donor>>;

    async fn donor(&self, id: i64) -> StoreResult<Option<Donor>>;

    async fn insert_donor(&self, donor: NewDonor) -> StoreResult<Donor>;

    async fn update_donor(&self, id: i64, changes: DonorChanges) -> StoreResult<Donor>;

    async fn delete_donor(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait GreetingStore: Send + Sync {
    async fn greetings(&self) -> StoreResult<BTreeMap<String, String>>;

    async fn greeting(&self, lang: &str) -> StoreResult<Option<String>>;

    /// Insert or replace the greeting for `lang`
    async fn put_greeting(&self, lang: &str, greeting: &str) -> StoreResult<()>;
}

/// Everything the HTTP layer needs from a backing store
#[async_trait]
pub trait Store: TriviaStore + DrinkStore + DonorStore + GreetingStore {
    /// Cheap connectivity check for `/health`
    async fn ping(&self) -> StoreResult<()>;
}
