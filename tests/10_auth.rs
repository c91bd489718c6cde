mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use storefront_identity::auth::TokenService;
use storefront_identity::database::models::identity::Role;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::request(&app.router, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_returns_standard_role_and_decodable_token() -> Result<()> {
    let app = common::test_app();

    let data = common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;

    assert_eq!(data["identity"]["role"], "standard");
    assert!(data["identity"].get("password_hash").is_none());

    // Token must decode to the same identity and role as stored
    let tokens = TokenService::new(common::TEST_SECRET, 24);
    let claims = tokens.verify(data["token"].as_str().unwrap())?;
    assert_eq!(claims.role, Role::Standard);
    assert_eq!(claims.sub.to_string(), data["identity"]["id"].as_str().unwrap());
    Ok(())
}

#[tokio::test]
async fn register_ignores_caller_supplied_role() -> Result<()> {
    let app = common::test_app();

    // A role field in the registration body must not take effect
    let (status, body) = common::request(
        &app.router,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "Mallory",
            "email": "m@x.com",
            "handle": "mal1",
            "password": "secret1",
            "role": "administrator",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["identity"]["role"], "standard");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() -> Result<()> {
    let app = common::test_app();
    common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;

    // Same email, different handle
    let (status, body) = common::request(
        &app.router,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "Ann Again",
            "email": "a@x.com",
            "handle": "ann2",
            "password": "secret1",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("Email"));
    Ok(())
}

#[tokio::test]
async fn duplicate_handle_registration_conflicts() -> Result<()> {
    let app = common::test_app();
    common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;

    let (status, body) = common::request(
        &app.router,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "Bob",
            "email": "b@x.com",
            "handle": "ann1",
            "password": "secret1",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("handle"));
    Ok(())
}

#[tokio::test]
async fn register_validates_required_fields() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::request(
        &app.router,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "",
            "email": "not-an-email",
            "handle": "",
            "password": "x",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let field_errors = body["field_errors"].as_object().unwrap();
    assert!(field_errors.contains_key("name"));
    assert!(field_errors.contains_key("email"));
    assert!(field_errors.contains_key("handle"));
    assert!(field_errors.contains_key("password"));
    Ok(())
}

#[tokio::test]
async fn login_works_with_email_or_handle() -> Result<()> {
    let app = common::test_app();
    let registered = common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;

    let by_email = common::login(&app.router, "a@x.com", "secret1").await;
    let by_handle = common::login(&app.router, "ann1", "secret1").await;

    // Same identity id across registration and both login identifiers
    assert_eq!(by_email["identity"]["id"], registered["identity"]["id"]);
    assert_eq!(by_handle["identity"]["id"], registered["identity"]["id"]);
    Ok(())
}

#[tokio::test]
async fn login_failures_share_one_generic_message() -> Result<()> {
    let app = common::test_app();
    common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;

    let (wrong_password_status, wrong_password_body) = common::request(
        &app.router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "identifier": "a@x.com", "password": "wrong" })),
    )
    .await;

    let (unknown_status, unknown_body) = common::request(
        &app.router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "identifier": "nobody@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // Neither response may reveal which part of the credentials was wrong
    assert_eq!(wrong_password_body["message"], unknown_body["message"]);
    Ok(())
}

#[tokio::test]
async fn login_identifier_is_case_sensitive() -> Result<()> {
    let app = common::test_app();
    common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;

    let (status, _) = common::request(
        &app.router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "identifier": "A@X.COM", "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
