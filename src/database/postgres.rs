use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};

use super::models::{
    Category, Donor, DonorChanges, Drink, DrinkChanges, Greeting, Ingredient, NewDonor, NewDrink, NewQuestion,
    Question,
};
use super::store::{DonorStore, DrinkStore, GreetingStore, Store, StoreError, StoreResult, TriviaStore};
use crate::filter::like_pattern;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: Json<Vec<Ingredient>>,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        Drink {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

/// Translate constraint violations into typed store errors
fn classify(err: sqlx::Error, entity: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(entity.to_string());
        }
        if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
            return StoreError::Invalid(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl TriviaStore for PgStore {
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(r#"SELECT id, "type" FROM categories ORDER BY id"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn category(&self, id: i64) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(r#"SELECT id, "type" FROM categories WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn questions(&self) -> StoreResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            "SELECT id, question, answer, category, difficulty FROM questions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            "SELECT id, question, answer, category, difficulty FROM questions WHERE category = $1 ORDER BY id",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r"SELECT id, question, answer, category, difficulty FROM questions
              WHERE question ILIKE $1 ESCAPE '\' ORDER BY id",
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question> {
        sqlx::query_as::<_, Question>(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES ($1, $2, $3, $4)
             RETURNING id, question, answer, category, difficulty",
        )
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "question"))
    }

    async fn delete_question(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("question {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl DrinkStore for PgStore {
    async fn drinks(&self) -> StoreResult<Vec<Drink>> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Drink::from).collect())
    }

    async fn insert_drink(&self, drink: NewDrink) -> StoreResult<Drink> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(&drink.title)
        .bind(Json(&drink.recipe))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, &format!("drink '{}'", drink.title)))?;
        Ok(row.into())
    }

    async fn update_drink(&self, id: i64, changes: DrinkChanges) -> StoreResult<Drink> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "UPDATE drinks SET title = COALESCE($2, title), recipe = COALESCE($3, recipe)
             WHERE id = $1 RETURNING id, title, recipe",
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.recipe.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "drink title"))?;

        row.map(Drink::from)
            .ok_or_else(|| StoreError::NotFound(format!("drink {}", id)))
    }

    async fn delete_drink(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("drink {}", id)));
        }
        Ok(())
    }
}

const DONOR_COLUMNS: &str = "id, name, date_of_birth, blood_type, products, num_products";

#[async_trait]
impl DonorStore for PgStore {
    async fn donors(&self) -> StoreResult<Vec<Donor>> {
        let sql = format!("SELECT {} FROM donors ORDER BY id", DONOR_COLUMNS);
        let rows = sqlx::query_as::<_, Donor>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn donor(&self, id: i64) -> StoreResult<Option<Donor>> {
        let sql = format!("SELECT {} FROM donors WHERE id = $1", DONOR_COLUMNS);
        let row = sqlx::query_as::<_, Donor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_donor(&self, donor: NewDonor) -> StoreResult<Donor> {
        let sql = format!(
            "INSERT INTO donors (name, date_of_birth, blood_type, products, num_products)
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            DONOR_COLUMNS
        );
        sqlx::query_as::<_, Donor>(&sql)
            .bind(&donor.name)
            .bind(donor.date_of_birth)
            .bind(&donor.blood_type)
            .bind(donor.products.as_deref())
            .bind(donor.num_products)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "donor"))
    }

    async fn update_donor(&self, id: i64, changes: DonorChanges) -> StoreResult<Donor> {
        let sql = format!(
            "UPDATE donors SET
                name = COALESCE($2, name),
                date_of_birth = COALESCE($3, date_of_birth),
                blood_type = COALESCE($4, blood_type),
                products = COALESCE($5, products),
                num_products = COALESCE($6, num_products)
             WHERE id = $1 RETURNING {}",
            DONOR_COLUMNS
        );
        let row = sqlx::query_as::<_, Donor>(&sql)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.date_of_birth)
            .bind(changes.blood_type.as_deref())
            .bind(changes.products.as_deref())
            .bind(changes.num_products)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "donor"))?;

        row.ok_or_else(|| StoreError::NotFound(format!("donor {}", id)))
    }

    async fn delete_donor(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM donors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("donor {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl GreetingStore for PgStore {
    async fn greetings(&self) -> StoreResult<BTreeMap<String, String>> {
        let rows = sqlx::query_as::<_, Greeting>("SELECT lang, greeting FROM greetings")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|g| (g.lang, g.greeting)).collect())
    }

    async fn greeting(&self, lang: &str) -> StoreResult<Option<String>> {
        let greeting = sqlx::query_scalar::<_, String>("SELECT greeting FROM greetings WHERE lang = $1")
            .bind(lang)
            .fetch_optional(&self.pool)
            .await?;
        Ok(greeting)
    }

    async fn put_greeting(&self, lang: &str, greeting: &str) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO greetings (lang, greeting) VALUES ($1, $2)
             ON CONFLICT (lang) DO UPDATE SET greeting = EXCLUDED.greeting",
        )
        .bind(lang)
        .bind(greeting)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
