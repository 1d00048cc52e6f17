mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use common::{assert_failure, expired_token, foreign_token, json_body, token, TestApp};

#[tokio::test]
async fn missing_header_is_unauthorized() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/drinks-detail").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_headers_are_unauthorized() -> Result<()> {
    let app = TestApp::new();
    let valid = token(&["get:drinks-detail"]);

    for value in [
        "Bearer".to_string(),
        format!("Token {}", valid),
        format!("Bearer {} extra", valid),
        format!("Bearer  {}", valid),
        valid.clone(),
    ] {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/drinks-detail")
            .header(header::AUTHORIZATION, value.as_str())
            .body(Body::empty())?;
        let response = app.raw(request).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "header {:?}", value);
        assert_failure(&json_body(response).await?, StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

#[tokio::test]
async fn scheme_is_case_insensitive() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/drinks-detail")
        .header(header::AUTHORIZATION, format!("bEaReR {}", token(&["get:drinks-detail"])))
        .body(Body::empty())?;

    let response = app.raw(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn expired_and_foreign_tokens_are_unauthorized() -> Result<()> {
    let app = TestApp::new();

    for bad in [expired_token(&["get:drinks-detail"]), foreign_token(&["get:drinks-detail"])] {
        let (status, body) = app.send(Method::GET, "/drinks-detail", Some(bad.as_str()), None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_failure(&body, StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

#[tokio::test]
async fn missing_permission_is_forbidden() -> Result<()> {
    let app = TestApp::new();
    let barista = token(&["get:drinks-detail"]);

    let (status, body) = app
        .send(
            Method::POST,
            "/drinks",
            Some(barista.as_str()),
            Some(json!({"title": "latte", "recipe": [{"name": "milk", "color": "white", "parts": 2}]})),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_failure(&body, StatusCode::FORBIDDEN);

    // Nothing was written
    let (_, body) = app.get("/drinks").await?;
    assert_eq!(body["drinks"], json!([]));
    Ok(())
}

#[tokio::test]
async fn scope_claim_grants_permissions() -> Result<()> {
    let app = TestApp::new();
    let mut claims = course_api::auth::Claims::new("manager", vec![], 1)?;
    claims.scope = Some("get:donors post:donors".to_string());
    let scoped = course_api::auth::generate_jwt(&claims, common::SECRET)?;

    let id = app.add_donor("Ada").await?;
    let (status, body) = app
        .send(Method::GET, &format!("/donors/{}", id), Some(scoped.as_str()), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["donor"]["name"], "Ada");
    Ok(())
}

#[tokio::test]
async fn whoami_needs_only_a_valid_token() -> Result<()> {
    let app = TestApp::new();

    let (status, _) = app.get("/headers").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let bare = token(&[]);
    for path in ["/headers", "/image"] {
        let (status, body) = app.send(Method::GET, path, Some(bare.as_str()), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["subject"], "tester");
        assert_eq!(body["permissions"], json!([]));
    }
    Ok(())
}

#[tokio::test]
async fn public_routes_ignore_bad_tokens() -> Result<()> {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::GET, "/drinks", Some("not-a-jwt"), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
