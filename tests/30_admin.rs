mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn admin_routes_gate_by_token_then_role() -> Result<()> {
    let app = common::test_app();
    let standard = common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;
    let (_, admin_token) = common::seed_admin(&app.state, "root@x.com", "root1", "adminpass").await;

    // No token: unauthenticated
    let (none, _) = common::request(&app.router, "GET", "/users", None, None).await;
    assert_eq!(none, StatusCode::UNAUTHORIZED);

    // Valid token, standard role: forbidden
    let standard_token = standard["token"].as_str().unwrap();
    let (forbidden, _) =
        common::request(&app.router, "GET", "/users", Some(standard_token), None).await;
    assert_eq!(forbidden, StatusCode::FORBIDDEN);

    // Administrator: proceeds
    let (ok, body) = common::request(&app.router, "GET", "/users", Some(&admin_token), None).await;
    assert_eq!(ok, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn admin_can_fetch_and_update_other_identities() -> Result<()> {
    let app = common::test_app();
    let ann = common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;
    let (_, admin_token) = common::seed_admin(&app.state, "root@x.com", "root1", "adminpass").await;
    let ann_id = ann["identity"]["id"].as_str().unwrap();

    let (status, body) = common::request(
        &app.router,
        "GET",
        &format!("/users/{}", ann_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["handle"], "ann1");

    // Promotion applies the role verbatim to the target
    let (updated, body) = common::request(
        &app.router,
        "PUT",
        &format!("/users/{}", ann_id),
        Some(&admin_token),
        Some(json!({ "role": "administrator", "name": "Ann the Admin" })),
    )
    .await;
    assert_eq!(updated, StatusCode::OK);
    assert_eq!(body["data"]["role"], "administrator");
    assert_eq!(body["data"]["name"], "Ann the Admin");

    // Ann's existing token was issued before promotion; a fresh login
    // carries the new role onto admin routes
    let fresh = common::login(&app.router, "ann1", "secret1").await;
    let (ok, _) = common::request(
        &app.router,
        "GET",
        "/users",
        Some(fresh["token"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(ok, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn demoted_admin_loses_access_before_token_expiry() -> Result<()> {
    let app = common::test_app();
    let (first_admin, first_token) =
        common::seed_admin(&app.state, "root@x.com", "root1", "adminpass").await;
    let (_, second_token) = common::seed_admin(&app.state, "two@x.com", "root2", "adminpass").await;

    // Second admin demotes the first
    let (status, _) = common::request(
        &app.router,
        "PUT",
        &format!("/users/{}", first_admin.id),
        Some(&second_token),
        Some(json!({ "role": "standard" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The first admin's still-unexpired token embeds the administrator role,
    // but the store refresh on admin routes sees the demotion immediately
    let (after, _) = common::request(&app.router, "GET", "/users", Some(&first_token), None).await;
    assert_eq!(after, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_update_rejects_duplicate_email() -> Result<()> {
    let app = common::test_app();
    let ann = common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;
    common::register(&app.router, "Bob", "b@x.com", "bob1", "secret1").await;
    let (_, admin_token) = common::seed_admin(&app.state, "root@x.com", "root1", "adminpass").await;

    let (status, _) = common::request(
        &app.router,
        "PUT",
        &format!("/users/{}", ann["identity"]["id"].as_str().unwrap()),
        Some(&admin_token),
        Some(json!({ "email": "b@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn admin_delete_removes_target_but_never_self() -> Result<()> {
    let app = common::test_app();
    let ann = common::register(&app.router, "Ann", "a@x.com", "ann1", "secret1").await;
    let (admin, admin_token) =
        common::seed_admin(&app.state, "root@x.com", "root1", "adminpass").await;
    let ann_id = ann["identity"]["id"].as_str().unwrap();

    // Self-deletion through the admin path is rejected regardless of role
    let (denied, _) = common::request(
        &app.router,
        "DELETE",
        &format!("/users/{}", admin.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(denied, StatusCode::FORBIDDEN);

    // Deleting another identity works
    let (deleted, _) = common::request(
        &app.router,
        "DELETE",
        &format!("/users/{}", ann_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(deleted, StatusCode::NO_CONTENT);

    let (gone, _) = common::request(
        &app.router,
        "GET",
        &format!("/users/{}", ann_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(gone, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_target_identity_is_not_found() -> Result<()> {
    let app = common::test_app();
    let (_, admin_token) = common::seed_admin(&app.state, "root@x.com", "root1", "adminpass").await;

    let missing = uuid::Uuid::new_v4();
    let (status, _) = common::request(
        &app.router,
        "GET",
        &format!("/users/{}", missing),
        Some(&admin_token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleted_identity_token_is_unauthenticated_on_admin_routes() -> Result<()> {
    let app = common::test_app();
    let (victim, victim_token) =
        common::seed_admin(&app.state, "gone@x.com", "gone1", "adminpass").await;
    let (_, admin_token) = common::seed_admin(&app.state, "root@x.com", "root1", "adminpass").await;

    let (deleted, _) = common::request(
        &app.router,
        "DELETE",
        &format!("/users/{}", victim.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(deleted, StatusCode::NO_CONTENT);

    // Store refresh: a token for a removed identity fails as unauthenticated
    let (after, _) = common::request(&app.router, "GET", "/users", Some(&victim_token), None).await;
    assert_eq!(after, StatusCode::UNAUTHORIZED);
    Ok(())
}
