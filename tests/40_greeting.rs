mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{assert_failure, TestApp};

#[tokio::test]
async fn lists_seeded_greetings() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/greeting").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["greetings"]["en"], "hello");
    assert_eq!(body["greetings"]["fi"], "Hei");
    assert_eq!(body["greetings"].as_object().map(|g| g.len()), Some(7));
    Ok(())
}

#[tokio::test]
async fn greeting_by_language() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/greeting/es").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "greeting": "Hola"}));

    let (status, body) = app.get("/greeting/xx").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn add_greeting_then_read_it_back() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post("/greeting", json!({"lang": "de", "greeting": "Hallo"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["greetings"]["de"], "Hallo");
    assert_eq!(body["greetings"]["en"], "hello");

    let (_, body) = app.get("/greeting/de").await?;
    assert_eq!(body["greeting"], "Hallo");
    Ok(())
}

#[tokio::test]
async fn add_greeting_requires_both_fields() -> Result<()> {
    let app = TestApp::new();

    for payload in [json!({"lang": "de"}), json!({"greeting": "Hallo"}), json!({"lang": " ", "greeting": "Hallo"})] {
        let (status, body) = app.post("/greeting", payload.clone()).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", payload);
        assert_failure(&body, StatusCode::UNPROCESSABLE_ENTITY);
    }

    let (_, body) = app.get("/greeting").await?;
    assert_eq!(body["greetings"].as_object().map(|g| g.len()), Some(7));
    Ok(())
}
