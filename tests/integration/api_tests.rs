//! API integration tests

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
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
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_songs() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/songs", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_bulk_import_songs_isolates_failures() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Second candidate has no title, so it must fail alone
    let response = client
        .post(format!("{}/songs/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "songs": [
                { "title": "Blackbird", "artist": "The Beatles", "difficulty": 3, "notes": "fingerpicking" },
                { "artist": "Unknown" },
                { "title": "Autumn Leaves", "artist": "Joseph Kosma" }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["summary"]["total"], 3);
    assert_eq!(body["summary"]["failed"], 1);
    assert_eq!(body["errors"][0]["index"], 1);
    assert_eq!(body["errors"][0]["error"], "Validation failed");
    // Persisted record comes back with every submitted field
    assert_eq!(body["results"][0]["data"]["notes"], "fingerpicking");
}

#[tokio::test]
#[ignore]
async fn test_bulk_import_songs_skips_duplicates_by_default() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let song = json!({ "title": "Wonderwall", "artist": "Oasis" });

    let first: Value = client
        .post(format!("{}/songs/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "songs": [song.clone()] }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(first["summary"]["success"], 1);
    assert_eq!(first["results"][0]["status"], "created");

    let second: Value = client
        .post(format!("{}/songs/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "songs": [song] }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(second["summary"]["skipped"], 1);
    assert_eq!(second["results"][0]["status"], "skipped");
}

#[tokio::test]
#[ignore]
async fn test_bulk_validate_only_writes_nothing() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let body: Value = client
        .post(format!("{}/songs/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "songs": [
                { "title": "Yesterday", "artist": "The Beatles" },
                { "difficulty": 9 }
            ],
            "validate_only": true
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(body["validation_results"].is_array());
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["valid"], 1);
    assert_eq!(body["summary"]["invalid"], 1);
}

#[tokio::test]
#[ignore]
async fn test_bulk_empty_batch_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/songs/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "songs": [] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Songs array is required and cannot be empty");
}

#[tokio::test]
#[ignore]
async fn test_bulk_oversized_batch_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let songs: Vec<Value> = (0..101)
        .map(|i| json!({ "title": format!("Song {}", i) }))
        .collect();

    let response = client
        .post(format!("{}/songs/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "songs": songs }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Cannot process more than 100 songs at once");
}

#[tokio::test]
#[ignore]
async fn test_bulk_delete_absent_song_is_skipped() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let body: Value = client
        .delete(format!("{}/songs/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "songs": [999999] }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["summary"]["skipped"], 1);
    assert_eq!(body["results"][0]["status"], "skipped");
}

#[tokio::test]
#[ignore]
async fn test_bulk_create_lessons() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let body: Value = client
        .post(format!("{}/lessons/bulk", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "lessons": [
                {
                    "teacher_id": 1,
                    "student_id": 1,
                    "date": "2026-09-07",
                    "time": "14:00"
                }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["summary"]["total"], 1);
    // Defaults apply when the candidate omits them
    if body["summary"]["success"] == 1 {
        assert_eq!(body["results"][0]["status"], "created");
        assert_eq!(body["results"][0]["data"]["duration_minutes"], 30);
        assert_eq!(body["results"][0]["data"]["status"], "scheduled");
    }
}

#[tokio::test]
#[ignore]
async fn test_bulk_endpoints_require_authentication() {
    let client = Client::new();

    let response = client
        .post(format!("{}/lessons/bulk", BASE_URL))
        .json(&json!({ "lessons": [{}] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
