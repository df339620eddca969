use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::{json, Value};

use hospital_booking_api::create_router;
use shared_utils::test_utils::{send_json, TestConfig};

async fn signup(app: &Router, uri: &str, body: Value) -> Value {
    let (status, body) = send_json(app, Method::POST, uri, None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{} -> {}", uri, body);
    body
}

async fn dashboard(app: &Router, admin: &str) -> Value {
    let (status, body) = send_json(app, Method::GET, "/api/admin/stats/dashboard", Some(admin), None).await;
    assert_eq!(status, StatusCode::OK);
    body
}

struct World {
    app: Router,
    admin: String,
    hospital: String,
    hospital_id: String,
    user: String,
}

async fn world() -> World {
    let app = create_router(TestConfig::default().to_state());

    let admin = signup(
        &app,
        "/api/auth/admin/signup",
        json!({ "name": "Root", "email": "root@x.com", "password": "rootpass" }),
    )
    .await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/admin/hospitals",
        Some(&admin),
        Some(json!({
            "name": "Lakeshore",
            "email": "lakeshore@x.com",
            "password": "hospital1",
            "state": "Kerala",
            "district": "Ernakulam",
            "establishYear": 2003
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let hospital_id = body["hospital"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/auth/hospital/login",
        None,
        Some(json!({ "email": "lakeshore@x.com", "password": "hospital1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hospital = body["token"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/hospitals/surgeries",
        Some(&hospital),
        Some(json!({
            "surgeryType": "Knee Replacement",
            "price": 150000,
            "doctor": { "name": "Dr. Menon", "degree": "MS Ortho" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let user = signup(
        &app,
        "/api/auth/user/signup",
        json!({ "name": "Asha", "email": "asha@x.com", "password": "secret1" }),
    )
    .await["token"]
        .as_str()
        .unwrap()
        .to_string();

    World {
        app,
        admin,
        hospital,
        hospital_id,
        user,
    }
}

async fn book(world: &World) -> String {
    let (status, body) = send_json(
        &world.app,
        Method::GET,
        "/api/users/search-hospitals?surgeryType=knee",
        Some(&world.user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], world.hospital_id.as_str());

    let (status, body) = send_json(
        &world.app,
        Method::POST,
        "/api/users/book-appointment",
        Some(&world.user),
        Some(json!({
            "name": "Ravi Kumar",
            "age": 54,
            "appointmentType": "surgery",
            "surgeryType": "Knee Replacement",
            "address": "MG Road",
            "mobileNo": "9876543210",
            "hospitalId": world.hospital_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["patient"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let app = create_router(TestConfig::default().to_state());

    let (status, body) = send_json(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("running"));

    let (status, body) = send_json(&app, Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_booking_to_completion_moves_dashboard() {
    let world = world().await;
    let patient_id = book(&world).await;

    let before = dashboard(&world.app, &world.admin).await;
    assert_eq!(before["totalPatients"], 1);
    assert_eq!(before["totalUsers"], 1);
    assert_eq!(before["pendingApprovals"], 1);

    let (status, _) = send_json(
        &world.app,
        Method::PATCH,
        &format!("/api/hospitals/patients/{}/approval", patient_id),
        Some(&world.hospital),
        Some(json!({ "approvedForSurgery": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &world.app,
        Method::PATCH,
        &format!("/api/hospitals/patients/{}/surgery-status", patient_id),
        Some(&world.hospital),
        Some(json!({ "surgeryDone": true, "surgeryDoneBy": "Dr. Menon" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["booker"]["email"], "asha@x.com");

    let after = dashboard(&world.app, &world.admin).await;
    assert_eq!(
        after["surgeriesDone"].as_u64().unwrap(),
        before["surgeriesDone"].as_u64().unwrap() + 1
    );
    assert_eq!(
        after["pendingSurgeries"].as_u64().unwrap(),
        before["pendingSurgeries"].as_u64().unwrap() - 1
    );
    assert_eq!(after["approvedPatients"], 1);

    let (status, body) = send_json(
        &world.app,
        Method::GET,
        &format!("/api/patients/{}", patient_id),
        Some(&world.user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["surgeryDone"], true);
    assert_eq!(body["surgeryDoneBy"], "Dr. Menon");
}

#[tokio::test]
async fn test_hospital_delete_removes_its_appointments() {
    let world = world().await;
    let patient_id = book(&world).await;

    let (status, _) = send_json(
        &world.app,
        Method::DELETE,
        &format!("/api/admin/hospitals/{}", world.hospital_id),
        Some(&world.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_json(&world.app, Method::GET, "/api/admin/patients", Some(&world.admin), None).await;
    assert_eq!(body, json!([]));

    let (_, body) = send_json(&world.app, Method::GET, "/api/users/my-appointments", Some(&world.user), None).await;
    assert_eq!(body, json!([]));

    let (status, _) = send_json(
        &world.app,
        Method::GET,
        &format!("/api/patients/{}", patient_id),
        Some(&world.user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&world.app, Method::GET, "/api/hospitals/profile", Some(&world.hospital), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_roles_are_enforced_across_cells() {
    let world = world().await;
    let patient_id = book(&world).await;

    let (status, _) = send_json(&world.app, Method::GET, "/api/admin/users", Some(&world.user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(
        &world.app,
        Method::PATCH,
        &format!("/api/hospitals/patients/{}/approval", patient_id),
        Some(&world.user),
        Some(json!({ "approvedForSurgery": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(&world.app, Method::GET, "/api/users/my-appointments", Some(&world.hospital), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // admins are user-kind principals
    let (status, _) = send_json(&world.app, Method::GET, "/api/users/my-appointments", Some(&world.admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&world.app, Method::GET, "/api/admin/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
