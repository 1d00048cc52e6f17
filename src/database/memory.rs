use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{
    Category, Donor, DonorChanges, Drink, DrinkChanges, NewDonor, NewDrink, NewQuestion, Question, DEFAULT_GREETINGS,
};
use super::store::{DonorStore, DrinkStore, GreetingStore, Store, StoreError, StoreResult, TriviaStore};
use crate::filter::search::contains_ignore_case;

pub const DEFAULT_CATEGORIES: [&str; 6] = ["Science", "Art", "Geography", "History", "Entertainment", "Sports"];

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    questions: BTreeMap<i64, Question>,
    drinks: BTreeMap<i64, Drink>,
    donors: BTreeMap<i64, Donor>,
    greetings: BTreeMap<String, String>,
    next_question_id: i64,
    next_drink_id: i64,
    next_donor_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Non-persistent store for tests and `serve --in-memory`.
///
/// Mirrors the PostgreSQL store: rows come back ordered by id, drink titles
/// are unique and questions must reference an existing category.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store with no categories or greetings
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded like a freshly migrated database
    pub fn seeded() -> Self {
        let mut tables = Tables::default();
        for (idx, kind) in DEFAULT_CATEGORIES.iter().enumerate() {
            let id = idx as i64 + 1;
            tables.categories.insert(id, Category { id, kind: kind.to_string() });
        }
        for (lang, greeting) in DEFAULT_GREETINGS {
            tables.greetings.insert(lang.to_string(), greeting.to_string());
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl TriviaStore for MemoryStore {
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn questions(&self) -> StoreResult<Vec<Question>> {
        Ok(self.tables.read().await.questions.values().cloned().collect())
    }

    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| contains_ignore_case(&q.question, term))
            .cloned()
            .collect())
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.questions.len() as i64)
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&question.category) {
            return Err(StoreError::Invalid(format!("category {} does not exist", question.category)));
        }

        let id = Tables::next_id(&mut tables.next_question_id);
        let row = Question {
            id,
            question: question.question,
            answer: question.answer,
            category: question.category,
            difficulty: question.difficulty,
        };
        tables.questions.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_question(&self, id: i64) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .questions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("question {}", id)))
    }
}

#[async_trait]
impl DrinkStore for MemoryStore {
    async fn drinks(&self) -> StoreResult<Vec<Drink>> {
        Ok(self.tables.read().await.drinks.values().cloned().collect())
    }

    async fn insert_drink(&self, drink: NewDrink) -> StoreResult<Drink> {
        let mut tables = self.tables.write().await;
        if tables.drinks.values().any(|d| d.title == drink.title) {
            return Err(StoreError::Conflict(format!("drink '{}'", drink.title)));
        }

        let id = Tables::next_id(&mut tables.next_drink_id);
        let row = Drink {
            id,
            title: drink.title,
            recipe: drink.recipe,
        };
        tables.drinks.insert(id, row.clone());
        Ok(row)
    }

    async fn update_drink(&self, id: i64, changes: DrinkChanges) -> StoreResult<Drink> {
        let mut tables = self.tables.write().await;
        if let Some(title) = &changes.title {
            if tables.drinks.values().any(|d| d.id != id && &d.title == title) {
                return Err(StoreError::Conflict("drink title".to_string()));
            }
        }

        let drink = tables
            .drinks
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("drink {}", id)))?;
        changes.apply(drink);
        Ok(drink.clone())
    }

    async fn delete_drink(&self, id: i64) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .drinks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("drink {}", id)))
    }
}

#[async_trait]
impl DonorStore for MemoryStore {
    async fn donors(&self) -> StoreResult<Vec<Donor>> {
        Ok(self.tables.read().await.donors.values().cloned().collect())
    }

    async fn donor(&self, id: i64) -> StoreResult<Option<Donor>> {
        Ok(self.tables.read().await.donors.get(&id).cloned())
    }

    async fn insert_donor(&self, donor: NewDonor) -> StoreResult<Donor> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_donor_id);
        let row = Donor {
            id,
            name: donor.name,
            date_of_birth: donor.date_of_birth,
            blood_type: donor.blood_type,
            products: donor.products,
            num_products: donor.num_products,
        };
        tables.donors.insert(id, row.clone());
        Ok(row)
    }

    async fn update_donor(&self, id: i64, changes: DonorChanges) -> StoreResult<Donor> {
        let mut tables = self.tables.write().await;
        let donor = tables
            .donors
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("donor {}", id)))?;
        changes.apply(donor);
        Ok(donor.clone())
    }

    async fn delete_donor(&self, id: i64) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .donors
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("donor {}", id)))
    }
}

#[async_trait]
impl GreetingStore for MemoryStore {
    async fn greetings(&self) -> StoreResult<BTreeMap<String, String>> {
        Ok(self.tables.read().await.greetings.clone())
    }

    async fn greeting(&self, lang: &str) -> StoreResult<Option<String>> {
        Ok(self.tables.read().await.greetings.get(lang).cloned())
    }

    async fn put_greeting(&self, lang: &str, greeting: &str) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .greetings
            .insert(lang.to_string(), greeting.to_string());
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
