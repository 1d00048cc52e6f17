mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{assert_failure, token, TestApp};

const STAFF: &[&str] = &["get:donors", "post:donors", "patch:donors", "delete:donors"];

#[tokio::test]
async fn donors_require_permission() -> Result<()> {
    let app = TestApp::new();
    app.add_donor("Ada").await?;

    let (status, _) = app.get("/donors").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(Method::GET, "/donors", Some(token(&["post:donors"]).as_str()), None)
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_failure(&body, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn list_is_paged() -> Result<()> {
    let app = TestApp::new();
    for n in 0..12 {
        app.add_donor(&format!("donor {}", n)).await?;
    }
    let staff = token(STAFF);

    let (status, body) = app.send(Method::GET, "/donors", Some(staff.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["donors"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["total_donors"], 12);

    let (_, body) = app.send(Method::GET, "/donors?page=2", Some(staff.as_str()), None).await?;
    assert_eq!(body["donors"].as_array().map(Vec::len), Some(2));

    let (status, _) = app.send(Method::GET, "/donors?page=3", Some(staff.as_str()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn register_and_fetch_donor() -> Result<()> {
    let app = TestApp::new();
    let staff = token(STAFF);

    let (status, body) = app
        .send(
            Method::POST,
            "/donors",
            Some(staff.as_str()),
            Some(json!({
                "name": "Grace",
                "date_of_birth": "1985-12-09",
                "blood_type": "AB-",
                "products": "plasma",
                "num_products": 2
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], 1);
    assert_eq!(body["donor"]["blood_type"], "AB-");

    let (status, body) = app.send(Method::GET, "/donors/1", Some(staff.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["donor"]["name"], "Grace");
    assert_eq!(body["donor"]["date_of_birth"], "1985-12-09");

    let (status, _) = app.send(Method::GET, "/donors/99", Some(staff.as_str()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn register_rejects_invalid_donors() -> Result<()> {
    let app = TestApp::new();
    let staff = token(STAFF);

    for payload in [
        json!({"date_of_birth": "1985-12-09", "blood_type": "O+"}),
        json!({"name": "Grace", "blood_type": "O+"}),
        json!({"name": "Grace", "date_of_birth": "1985-12-09", "blood_type": "Z"}),
        json!({"name": "Grace", "date_of_birth": "1985-12-09", "blood_type": "O+", "num_products": -1}),
        json!({"name": "Grace", "date_of_birth": "not a date", "blood_type": "O+"}),
    ] {
        let (status, body) = app
            .send(Method::POST, "/donors", Some(staff.as_str()), Some(payload.clone()))
            .await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", payload);
        assert_failure(&body, StatusCode::UNPROCESSABLE_ENTITY);
    }

    let (status, _) = app.send(Method::GET, "/donors", Some(staff.as_str()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_donor() -> Result<()> {
    let app = TestApp::new();
    let staff = token(STAFF);
    let id = app.add_donor("Ada").await?;

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/donors/{}", id),
            Some(staff.as_str()),
            Some(json!({"num_products": 4, "blood_type": "B+"})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["donor"]["num_products"], 4);
    assert_eq!(body["donor"]["blood_type"], "B+");
    assert_eq!(body["donor"]["name"], "Ada");

    let (status, body) = app
        .send(Method::DELETE, &format!("/donors/{}", id), Some(staff.as_str()), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "deleted": id}));

    let (status, _) = app
        .send(Method::DELETE, &format!("/donors/{}", id), Some(staff.as_str()), None)
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .send(Method::PATCH, "/donors/1000", Some(staff.as_str()), Some(json!({"name": "ghost"})))
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}
