//! API integration tests
//!
//! These tests require a running server with a seeded admin account
//! (admin@campussoft.example / admin).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated admin token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@campussoft.example",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn post_json(client: &Client, token: &str, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .header("Authorization", format!("Bearer {}", token))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert!(
        response.status().is_success(),
        "POST {} failed: {}",
        path,
        response.status()
    );
    response.json().await.expect("Failed to parse response")
}

/// Build a department, a room in it, a software entry, and a teacher.
/// Returns (room_id, software_id, teacher_id).
async fn seed_fixture(client: &Client, token: &str, tag: &str) -> (String, String, String) {
    let department = post_json(
        client,
        token,
        "/departments",
        json!({ "name": format!("Dept {}", tag), "code": format!("D-{}", tag) }),
    )
    .await;

    let room = post_json(
        client,
        token,
        "/rooms",
        json!({
            "name": format!("Room {}", tag),
            "room_type": "departmental",
            "department_id": department["id"],
            "capacity": 24
        }),
    )
    .await;

    let software = post_json(
        client,
        token,
        "/software",
        json!({
            "name": format!("Software {}", tag),
            "publisher": "ACME",
            "version": "1.0.0"
        }),
    )
    .await;

    let teacher = post_json(
        client,
        token,
        "/users/teachers",
        json!({
            "email": format!("teacher-{}@campussoft.example", tag),
            "last_name": "Doe",
            "first_name": "Jane",
            "role": "teacher",
            "employee_number": format!("EMP-{}", tag)
        }),
    )
    .await;

    (
        room["id"].as_str().unwrap().to_string(),
        software["id"].as_str().unwrap().to_string(),
        teacher["teacher"]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@campussoft.example",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_requests_without_token_are_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/requests", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

/// Room installation updates cascade into item and request statuses.
#[tokio::test]
#[ignore]
async fn test_installation_cascade() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (room_a, software_id, teacher_id) = seed_fixture(&client, &token, "cascade").await;

    // Second room for the same department so the item starts with two targets
    let department = post_json(
        &client,
        &token,
        "/departments",
        json!({ "name": "Dept cascade-b", "code": "D-CASB" }),
    )
    .await;
    let room_b = post_json(
        &client,
        &token,
        "/rooms",
        json!({
            "name": "Room cascade-b",
            "room_type": "departmental",
            "department_id": department["id"]
        }),
    )
    .await;
    let room_b = room_b["id"].as_str().unwrap();

    let request = post_json(
        &client,
        &token,
        "/requests",
        json!({
            "teacher_id": teacher_id,
            "academic_year": "current",
            "items": [{ "software_id": software_id, "room_ids": [room_a, room_b] }]
        }),
    )
    .await;
    let request_id = request["id"].as_str().unwrap();
    assert_eq!(request["status"], "new");

    // Creation is audited once per item
    let history: Value = client
        .get(format!("{}/requests/{}/history", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let created_entries = history
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["action"] == "request_created")
        .count();
    assert_eq!(created_entries, 1);

    let details: Value = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let item_id = details["items"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(details["items"][0]["status"], "pending");

    // Install in one of two rooms: item becomes partially installed
    let response = client
        .put(format!(
            "{}/requests/{}/items/{}/rooms/{}",
            BASE_URL, request_id, item_id, room_a
        ))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "installed": true }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let item: Value = client
        .get(format!("{}/items/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["status"], "partially_installed");

    let request: Value = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(request["status"], "in_progress");

    // Install the second room: item all installed, request installed
    let response = client
        .put(format!(
            "{}/requests/{}/items/{}/rooms/{}",
            BASE_URL, request_id, item_id, room_b
        ))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "installed": true }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let item: Value = client
        .get(format!("{}/items/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["status"], "all_installed");
    assert!(item["installed_at"].is_string());

    let request: Value = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(request["status"], "installed");

    // Consistency report agrees with the stored state
    let report: Value = client
        .get(format!("{}/requests/{}/consistency", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["consistent"], true);
}

/// A request can only be closed from new or in_progress, with a comment.
#[tokio::test]
#[ignore]
async fn test_close_rules() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (room_id, software_id, teacher_id) = seed_fixture(&client, &token, "close").await;

    let request = post_json(
        &client,
        &token,
        "/requests",
        json!({
            "teacher_id": teacher_id,
            "academic_year": "current",
            "items": [{ "software_id": software_id, "room_ids": [room_id] }]
        }),
    )
    .await;
    let request_id = request["id"].as_str().unwrap();

    // Closing without a usable comment is rejected
    let response = client
        .post(format!("{}/requests/{}/close", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "comment": "no" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Closing a new request works
    let response = client
        .post(format!("{}/requests/{}/close", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "comment": "no longer needed" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let closed: Value = response.json().await.unwrap();
    assert_eq!(closed["status"], "closed");
    assert!(closed["closed_at"].is_string());

    // Closing twice is rejected: closed is terminal
    let response = client
        .post(format!("{}/requests/{}/close", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "comment": "again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

/// /auth/me carries the teacher profile; specializations are role-checked.
#[tokio::test]
#[ignore]
async fn test_profiles_and_specializations() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // The admin account has no teacher profile
    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["user"]["email"], "admin@campussoft.example");
    assert!(me["teacher"].is_null());

    // A teacher sees their own specialization on /auth/me
    let teacher = post_json(
        &client,
        &token,
        "/users/teachers",
        json!({
            "email": "teacher-profile@campussoft.example",
            "last_name": "Doe",
            "first_name": "John",
            "role": "teacher",
            "password": "profile-pass",
            "employee_number": "EMP-PROFILE"
        }),
    )
    .await;
    let teacher_login: Value = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "teacher-profile@campussoft.example",
            "password": "profile-pass"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let teacher_token = teacher_login["token"].as_str().unwrap();
    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["teacher"]["id"], teacher["teacher"]["id"]);

    // Administrator specialization attaches once, to admin accounts only
    let admin_user = post_json(
        &client,
        &token,
        "/users",
        json!({
            "email": "second-admin@campussoft.example",
            "last_name": "Ops",
            "first_name": "Second",
            "role": "admin"
        }),
    )
    .await;
    let admin_id = admin_user["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/users/{}/administrator", BASE_URL, admin_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = client
        .post(format!("{}/users/{}/administrator", BASE_URL, admin_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // A request naming an unknown room is rejected up front
    let (_, software_id, teacher_id) = seed_fixture(&client, &token, "norooms").await;
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "teacher_id": teacher_id,
            "academic_year": "current",
            "items": [{
                "software_id": software_id,
                "room_ids": ["00000000-0000-0000-0000-000000000000"]
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

/// One attestation per request; the campaign only fills the gaps.
#[tokio::test]
#[ignore]
async fn test_attestation_conflict_and_campaign() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (room_id, software_id, teacher_id) = seed_fixture(&client, &token, "attest").await;

    let request = post_json(
        &client,
        &token,
        "/requests",
        json!({
            "teacher_id": teacher_id,
            "academic_year": "2025",
            "items": [{ "software_id": software_id, "room_ids": [room_id] }]
        }),
    )
    .await;
    let request_id = request["id"].as_str().unwrap();

    // Drive the request to installed
    let details: Value = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let item_id = details["items"][0]["id"].as_str().unwrap();
    post_json(
        &client,
        &token,
        &format!("/requests/{}/items/{}/install-all", request_id, item_id),
        json!({}),
    )
    .await;

    // First campaign run creates the missing attestation
    let result = post_json(
        &client,
        &token,
        "/attestations/campaign",
        json!({ "academic_year": "2025" }),
    )
    .await;
    assert!(result["affected"].as_u64().unwrap() >= 1);

    // Second run is idempotent for this request
    let attestation: Value = client
        .get(format!("{}/requests/{}/attestation", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(attestation["status"], "pending");
    assert_eq!(attestation["academic_year"], "2025");

    // A manual create now conflicts
    let response = client
        .post(format!("{}/attestations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "request_id": request_id,
            "academic_year": "2025",
            "period_start": "2025-09-01",
            "period_end": "2026-08-31"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    // Confirming extends the request expiry to the period end
    let attestation_id = attestation["id"].as_str().unwrap();
    let confirmed = post_json(
        &client,
        &token,
        &format!("/attestations/{}/confirm", attestation_id),
        json!({}),
    )
    .await;
    assert_eq!(confirmed["status"], "confirmed");

    let request: Value = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(request["expires_at"], confirmed["period_end"]);
}
