use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{ADMIN_PASSWORD, ADMIN_USERNAME, login_token, request, signup, spawn_app};

#[tokio::test]
async fn test_submit_and_retrieve_request() {
    let app = spawn_app().await;

    signup(&app, "alice", "hunter2hunter2", "user").await;
    let token = login_token(&app, "alice", "hunter2hunter2").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/requests",
        Some(&token),
        Some(json!({
            "bot_token": "123456:TESTTOKEN",
            "chat_id": "-100200300",
            "message": "deploy finished",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "submit failed: {body}");
    // The messaging endpoint is unreachable in tests, so delivery fails
    // but the request is stored regardless.
    assert_eq!(body["data"]["status"], "failed");
    assert_eq!(body["data"]["bot_token"], "123456:TESTTOKEN");
    assert_eq!(body["data"]["chat_id"], "-100200300");
    assert_eq!(body["data"]["message"], "deploy finished");

    let id = body["data"]["id"].as_i64().unwrap();

    // Retrievable unchanged
    let (status, body) = request(&app, "GET", &format!("/api/requests/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "deploy finished");
    assert_eq!(body["data"]["chat_id"], "-100200300");

    // And listed for its owner
    let (status, body) = request(&app, "GET", "/api/requests", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let requests = body["data"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["id"].as_i64().unwrap(), id);
}

#[tokio::test]
async fn test_failed_delivery_is_logged() {
    let app = spawn_app().await;

    signup(&app, "alice", "hunter2hunter2", "user").await;
    let token = login_token(&app, "alice", "hunter2hunter2").await;
    let admin_token = login_token(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/requests",
        Some(&token),
        Some(json!({
            "bot_token": "123456:TESTTOKEN",
            "chat_id": "42",
            "message": "ping",
        })),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    // Per-request log, admin only
    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/requests/{id}/log"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/requests/{id}/log"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["outcome"], "failed");
    assert_eq!(entries[0]["request_id"].as_i64().unwrap(), id);

    // The paginated system view sees it too
    let (status, body) = request(&app, "GET", "/api/system/logs", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["logs"].as_array().unwrap().len(), 1);

    // Unknown request id
    let (status, _) = request(
        &app,
        "GET",
        "/api/requests/999999/log",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_visibility_scoping() {
    let app = spawn_app().await;

    signup(&app, "alice", "hunter2hunter2", "user").await;
    signup(&app, "eve", "hunter2hunter2", "user").await;
    signup(&app, "martin", "hunter2hunter2", "manager").await;

    let alice_token = login_token(&app, "alice", "hunter2hunter2").await;
    let eve_token = login_token(&app, "eve", "hunter2hunter2").await;
    let manager_token = login_token(&app, "martin", "hunter2hunter2").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/requests",
        Some(&alice_token),
        Some(json!({
            "bot_token": "123456:TESTTOKEN",
            "chat_id": "42",
            "message": "for alice only",
        })),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    // Another plain user sees neither the listing entry nor the row
    let (status, body) = request(&app, "GET", "/api/requests", Some(&eve_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/requests/{id}"),
        Some(&eve_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A manager sees everything
    let (status, body) = request(&app, "GET", "/api/requests", Some(&manager_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/requests/{id}"),
        Some(&manager_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_submit_request_validation() {
    let app = spawn_app().await;

    signup(&app, "alice", "hunter2hunter2", "user").await;
    let token = login_token(&app, "alice", "hunter2hunter2").await;

    for payload in [
        json!({"bot_token": "", "chat_id": "42", "message": "hi"}),
        json!({"bot_token": "123456:T", "chat_id": "", "message": "hi"}),
        json!({"bot_token": "123456:T", "chat_id": "42", "message": "   "}),
    ] {
        let (status, _) = request(&app, "POST", "/api/requests", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, body) = request(&app, "GET", "/api/requests", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_system_status_counters() {
    let app = spawn_app().await;

    signup(&app, "alice", "hunter2hunter2", "user").await;
    let token = login_token(&app, "alice", "hunter2hunter2").await;

    request(
        &app,
        "POST",
        "/api/requests",
        Some(&token),
        Some(json!({
            "bot_token": "123456:TESTTOKEN",
            "chat_id": "42",
            "message": "ping",
        })),
    )
    .await;

    let (status, body) = request(&app, "GET", "/api/system/status", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"].as_u64().unwrap(), 2); // admin + alice
    assert_eq!(body["data"]["requests"].as_u64().unwrap(), 1);
    assert_eq!(body["data"]["delivered"].as_u64().unwrap(), 0);
    assert_eq!(body["data"]["failed"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn test_clear_delivery_logs() {
    let app = spawn_app().await;

    signup(&app, "alice", "hunter2hunter2", "user").await;
    let token = login_token(&app, "alice", "hunter2hunter2").await;
    let admin_token = login_token(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    request(
        &app,
        "POST",
        "/api/requests",
        Some(&token),
        Some(json!({
            "bot_token": "123456:TESTTOKEN",
            "chat_id": "42",
            "message": "ping",
        })),
    )
    .await;

    // Pruning with a generous window keeps fresh entries
    let (status, body) = request(
        &app,
        "DELETE",
        "/api/system/logs?older_than_days=30",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_u64().unwrap(), 0);

    let (status, body) = request(&app, "DELETE", "/api/system/logs", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_u64().unwrap(), 1);

    let (status, body) = request(&app, "GET", "/api/system/logs", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["logs"].as_array().unwrap().is_empty());

    // The request row itself is untouched
    let (status, body) = request(&app, "GET", "/api/requests", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
