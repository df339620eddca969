use axum::http::{Method, StatusCode};
use serde_json::json;

use auth_cell::router::auth_routes;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::{send_json, TestConfig};

#[tokio::test]
async fn test_user_signup_returns_token_and_profile() {
    let state = TestConfig::default().to_state();
    let app = auth_routes(state.clone());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/user/signup",
        None,
        Some(json!({ "name": "Asha", "email": "asha@x.com", "password": "secret1", "role": "admin" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "asha@x.com");
    // role in the payload is ignored
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("passwordHash").is_none());

    let principal = validate_token(body["token"].as_str().unwrap(), &state.config.jwt_secret).unwrap();
    assert!(principal.is_user());
    assert!(!principal.is_admin());
}

#[tokio::test]
async fn test_duplicate_signup_is_conflict() {
    let app = auth_routes(TestConfig::default().to_state());
    let payload = json!({ "name": "Asha", "email": "asha@x.com", "password": "secret1" });

    let (first, _) = send_json(&app, Method::POST, "/user/signup", None, Some(payload.clone())).await;
    let (second, body) = send_json(&app, Method::POST, "/user/signup", None, Some(payload)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_signup_validation_lists_fields() {
    let app = auth_routes(TestConfig::default().to_state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/user/signup",
        None,
        Some(json!({ "name": " ", "email": "nope", "password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "password"]);
}

#[tokio::test]
async fn test_admin_signup_forces_admin_role_and_admin_login_works() {
    let state = TestConfig::default().to_state();
    let app = auth_routes(state.clone());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/admin/signup",
        None,
        Some(json!({ "name": "Root", "email": "root@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "admin");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "email": "ROOT@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let principal = validate_token(body["token"].as_str().unwrap(), &state.config.jwt_secret).unwrap();
    assert!(principal.is_admin());
}

#[tokio::test]
async fn test_admin_login_rejects_regular_user() {
    let app = auth_routes(TestConfig::default().to_state());
    send_json(
        &app,
        Method::POST,
        "/user/signup",
        None,
        Some(json!({ "name": "Asha", "email": "asha@x.com", "password": "secret1" })),
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "email": "asha@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid credentials or not an admin");
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let app = auth_routes(TestConfig::default().to_state());
    send_json(
        &app,
        Method::POST,
        "/user/signup",
        None,
        Some(json!({ "name": "Asha", "email": "asha@x.com", "password": "secret1" })),
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/user/login",
        None,
        Some(json!({ "email": "asha@x.com", "password": "secret2" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_hospital_signup_and_login() {
    let state = TestConfig::default().to_state();
    let app = auth_routes(state.clone());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/hospital/signup",
        None,
        Some(json!({
            "name": "City Care",
            "email": "h@x.com",
            "password": "secret1",
            "state": "Kerala",
            "district": "Ernakulam",
            "establishYear": 1990,
            "opdCharge": [300, 500]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["hospital"]["country"], "India");
    assert_eq!(body["hospital"]["district"], "Ernakulam");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/hospital/login",
        None,
        Some(json!({ "email": "h@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let principal = validate_token(body["token"].as_str().unwrap(), &state.config.jwt_secret).unwrap();
    assert!(principal.is_hospital());
    assert_eq!(principal.role, None);

    let stored = state.directory.find_hospital_by_email("h@x.com").await.unwrap().unwrap();
    assert_eq!(stored.opd_charge, vec![300.0, 500.0]);
}

#[tokio::test]
async fn test_hospital_signup_rejects_implausible_year() {
    let app = auth_routes(TestConfig::default().to_state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/hospital/signup",
        None,
        Some(json!({
            "name": "Old Care",
            "email": "old@x.com",
            "password": "secret1",
            "state": "Kerala",
            "district": "Ernakulam",
            "establishYear": 1700
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "establishYear");
}
