#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use course_api::auth::{generate_jwt, Claims, JwtVerifier};
use course_api::database::models::{NewDonor, NewDrink, NewQuestion, Ingredient};
use course_api::database::{DonorStore, DrinkStore, MemoryStore, Store, TriviaStore};
use course_api::state::AppState;

pub const SECRET: &str = "integration-test-secret";

/// Router over a freshly seeded in-memory store, with HS256 tokens
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::seeded());
        let state = AppState::new(
            store.clone() as Arc<dyn Store>,
            Arc::new(JwtVerifier::hs256(SECRET)),
        );

        Self {
            router: course_api::app(state),
            store,
        }
    }

    /// Send a request and return the raw response
    pub async fn raw(&self, request: Request<Body>) -> Result<Response> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    /// Send a request and decode the JSON body; an empty body decodes to `null`
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.raw(request).await?;
        let status = response.status();
        Ok((status, json_body(response).await?))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    pub async fn add_questions(&self, count: usize, category: i64) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(count);
        for n in 0..count {
            let question = self
                .store
                .insert_question(NewQuestion {
                    question: format!("Question number {}?", n + 1),
                    answer: format!("Answer {}", n + 1),
                    category,
                    difficulty: 1,
                })
                .await?;
            ids.push(question.id);
        }
        Ok(ids)
    }

    pub async fn add_drink(&self, title: &str) -> Result<i64> {
        let drink = self
            .store
            .insert_drink(NewDrink {
                title: title.to_string(),
                recipe: vec![Ingredient {
                    name: "espresso".to_string(),
                    color: "brown".to_string(),
                    parts: 1,
                }],
            })
            .await?;
        Ok(drink.id)
    }

    pub async fn add_donor(&self, name: &str) -> Result<i64> {
        let donor = self
            .store
            .insert_donor(NewDonor {
                name: name.to_string(),
                date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 1, 15).expect("valid date"),
                blood_type: "O+".to_string(),
                products: None,
                num_products: 0,
            })
            .await?;
        Ok(donor.id)
    }
}

pub async fn json_body(response: Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Valid token carrying `permissions`
pub fn token(permissions: &[&str]) -> String {
    let claims = Claims::new("tester", permissions.iter().map(|p| p.to_string()).collect(), 1).expect("claims");
    generate_jwt(&claims, SECRET).expect("token")
}

/// Token that expired an hour ago
pub fn expired_token(permissions: &[&str]) -> String {
    let mut claims = Claims::new("tester", permissions.iter().map(|p| p.to_string()).collect(), 1).expect("claims");
    claims.exp = chrono::Utc::now().timestamp() - 3600;
    generate_jwt(&claims, SECRET).expect("token")
}

/// Token signed with a different secret
pub fn foreign_token(permissions: &[&str]) -> String {
    let claims = Claims::new("intruder", permissions.iter().map(|p| p.to_string()).collect(), 1).expect("claims");
    generate_jwt(&claims, "some-other-secret").expect("token")
}

pub fn assert_failure(body: &Value, status: StatusCode) {
    assert_eq!(body["success"], false, "body: {}", body);
    assert_eq!(body["error"], status.as_u16(), "body: {}", body);
    assert!(body["message"].is_string(), "body: {}", body);
}
