//! End-to-end submission pipeline tests
//!
//! Drives the real router against a local stand-in inference endpoint and
//! asserts both the immediate response (result, accuracy, tier, token) and
//! the audit record that lands asynchronously afterwards.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use riskwatch_common::config::Config;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: Router,
    pool: sqlx::SqlitePool,
    _dir: TempDir,
}

/// Spawn a stand-in inference endpoint returning a fixed status and body
async fn spawn_endpoint(status: StatusCode, body: Value) -> String {
    let handler = move || {
        let body = body.clone();
        async move { (status, Json(body)) }
    };
    let stub = Router::new().route("/predict/:domain", post(handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn setup(inference_base_url: &str) -> TestApp {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("riskwatch.db");
    let pool = riskwatch_common::db::init_database(&db_path)
        .await
        .expect("db init");

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: PathBuf::from(&db_path),
        admin_email: "admin@riskwatch.test".to_string(),
        inference_base_url: inference_base_url.to_string(),
        // Nothing listens here: geolocation degrades to "Unknown" fast
        geoip_url: "http://127.0.0.1:1/json/".to_string(),
    };

    let state = riskwatch_web::AppState::new(pool.clone(), config).expect("state");
    TestApp {
        app: riskwatch_web::build_router(state),
        pool,
        _dir: dir,
    }
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn signup(app: &Router, email: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": email, "password": "secret1"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn predict_request(domain: &str, cookie: &str, draft: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/predict/{}", domain))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(draft.to_string()))
        .unwrap()
}

/// Wait for the fire-and-forget audit write to land
async fn wait_for_record(pool: &sqlx::SqlitePool) -> Value {
    for _ in 0..50 {
        let row: Option<(String, String, String, String, String, String)> = sqlx::query_as(
            "SELECT user_email, prediction_type, result, accuracy, blockchain_hash, country \
             FROM predictions LIMIT 1",
        )
        .fetch_optional(pool)
        .await
        .unwrap();

        if let Some((user_email, prediction_type, result, accuracy, blockchain_hash, country)) = row
        {
            return json!({
                "user_email": user_email,
                "prediction_type": prediction_type,
                "result": result,
                "accuracy": accuracy,
                "blockchain_hash": blockchain_hash,
                "country": country,
            });
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("audit record never landed");
}

fn heart_draft() -> Value {
    json!({
        "age": 54,
        "sex": "M",
        "chest_pain_type": "ASY",
        "resting_bp": 130,
        "cholesterol": 250,
        "fasting_bs": "0",
        "max_hr": 150,
        "exercise_angina": "N",
        "oldpeak": 1.2
    })
}

fn is_verification_token(token: &str) -> bool {
    token.len() == 42
        && token.starts_with("0x")
        && token[2..].chars().all(|c| c.is_ascii_hexdigit())
}

// =============================================================================
// Successful submissions
// =============================================================================

#[tokio::test]
async fn test_heart_submission_detected_and_persisted() {
    let endpoint = spawn_endpoint(
        StatusCode::OK,
        json!({"predicted_class": "ASY High Risk", "confidence_score": 0.87}),
    )
    .await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    let response = test
        .app
        .clone()
        .oneshot(predict_request("heart", &cookie, heart_draft()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"], "ASY High Risk");
    assert_eq!(body["accuracy"], "87.00%");
    assert_eq!(body["risk"]["tier"], "Detected");
    assert!(is_verification_token(body["token"].as_str().unwrap()));

    // The audit write is not awaited by the response; poll for it
    let record = wait_for_record(&test.pool).await;
    assert_eq!(record["user_email"], "user@example.com");
    assert_eq!(record["prediction_type"], "heart");
    assert_eq!(record["result"], "ASY High Risk");
    assert_eq!(record["accuracy"], "87.00%");
    assert_eq!(record["country"], "Unknown");
    // Response token and stored token are the same submission token
    assert_eq!(record["blockchain_hash"], body["token"]);
}

#[tokio::test]
async fn test_diabetes_zero_result_is_normal_with_na_accuracy() {
    let endpoint = spawn_endpoint(StatusCode::OK, json!({"result": "0"})).await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    let draft = json!({
        "pregnancies": 2,
        "glucose": 120,
        "blood_pressure": 70,
        "bmi": 32.1,
        "age": 41
    });
    let response = test
        .app
        .clone()
        .oneshot(predict_request("diabetes", &cookie, draft))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"], "0");
    assert_eq!(body["accuracy"], "N/A");
    assert_eq!(body["risk"]["tier"], "Normal");

    let record = wait_for_record(&test.pool).await;
    assert_eq!(record["accuracy"], "N/A");
    assert_eq!(record["result"], "0");
}

#[tokio::test]
async fn test_image_upload_no_tumor_is_normal() {
    let endpoint = spawn_endpoint(
        StatusCode::OK,
        json!({"predicted_class": "no_tumor", "confidence_score": 0.95}),
    )
    .await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    let boundary = "RISKWATCHBOUNDARY";
    let multipart_body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"scan.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         not-actually-a-png\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict/brain")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, cookie.as_str())
        .body(Body::from(multipart_body))
        .unwrap();

    let response = test.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    // "no_tumor" contains "tumor" but is the negative class
    assert_eq!(body["result"], "no_tumor");
    assert_eq!(body["accuracy"], "95.00%");
    assert_eq!(body["risk"]["tier"], "Normal");

    // The stored input is just the filename, not the blob
    let record = wait_for_record(&test.pool).await;
    assert_eq!(record["result"], "no_tumor");
    let input: (String,) = sqlx::query_as("SELECT input_data FROM predictions LIMIT 1")
        .fetch_one(&test.pool)
        .await
        .unwrap();
    let input: Value = serde_json::from_str(&input.0).unwrap();
    assert_eq!(input, json!({"filename": "scan.png"}));
}

#[tokio::test]
async fn test_record_attributed_to_identity_captured_at_submit_time() {
    let endpoint = spawn_endpoint(
        StatusCode::OK,
        json!({"prediction": "Yes", "confidence": 0.7}),
    )
    .await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    let response = test
        .app
        .clone()
        .oneshot(predict_request("heart", &cookie, heart_draft()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Sign out immediately; the in-flight audit write keeps the email it
    // captured at submit time
    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, cookie.as_str())
        .body(Body::empty())
        .unwrap();
    let response = test.app.clone().oneshot(logout).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let record = wait_for_record(&test.pool).await;
    assert_eq!(record["user_email"], "user@example.com");
}

// =============================================================================
// Failing submissions
// =============================================================================

#[tokio::test]
async fn test_structured_server_error_surfaces_message() {
    let endpoint = spawn_endpoint(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"error": {"message": "Model is warming up"}}),
    )
    .await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    let response = test
        .app
        .clone()
        .oneshot(predict_request("heart", &cookie, heart_draft()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Model is warming up");

    // No partial result is persisted for a failed inference call
    tokio::time::sleep(Duration::from_millis(200)).await;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM predictions")
        .fetch_one(&test.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_persistence_failure_does_not_change_submission_response() {
    let endpoint = spawn_endpoint(
        StatusCode::OK,
        json!({"predicted_class": "ASY High Risk", "confidence_score": 0.87}),
    )
    .await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    // Break the audit table out from under the spawned writer
    sqlx::query("DROP TABLE predictions")
        .execute(&test.pool)
        .await
        .unwrap();

    let response = test
        .app
        .clone()
        .oneshot(predict_request("heart", &cookie, heart_draft()))
        .await
        .unwrap();

    // The user still gets the full result; the failed write is logged and
    // swallowed inside the spawned task
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"], "ASY High Risk");
    assert_eq!(body["accuracy"], "87.00%");
    assert_eq!(body["risk"]["tier"], "Detected");
    assert!(is_verification_token(body["token"].as_str().unwrap()));

    // Nothing was persisted and nothing recreated the table
    tokio::time::sleep(Duration::from_millis(300)).await;
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'predictions'",
    )
    .fetch_one(&test.pool)
    .await
    .unwrap();
    assert_eq!(tables, 0);
}

#[tokio::test]
async fn test_unstructured_server_error_gets_generic_message() {
    let endpoint = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "?"})).await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    let response = test
        .app
        .clone()
        .oneshot(predict_request("heart", &cookie, heart_draft()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Server error: 500");
}

#[tokio::test]
async fn test_unreachable_endpoint_surfaces_network_error() {
    let test = setup("http://127.0.0.1:1").await;
    let cookie = signup(&test.app, "user@example.com").await;

    let response = test
        .app
        .clone()
        .oneshot(predict_request("heart", &cookie, heart_draft()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("Network error"));
}

#[tokio::test]
async fn test_tokens_differ_across_identical_submissions() {
    let endpoint = spawn_endpoint(StatusCode::OK, json!({"result": "0"})).await;
    let test = setup(&endpoint).await;
    let cookie = signup(&test.app, "user@example.com").await;

    let draft = json!({
        "pregnancies": 2,
        "glucose": 120,
        "blood_pressure": 70,
        "bmi": 32.1,
        "age": 41
    });

    let first = test
        .app
        .clone()
        .oneshot(predict_request("diabetes", &cookie, draft.clone()))
        .await
        .unwrap();
    let second = test
        .app
        .clone()
        .oneshot(predict_request("diabetes", &cookie, draft))
        .await
        .unwrap();

    let first = extract_json(first.into_body()).await;
    let second = extract_json(second.into_body()).await;

    // The verification token is independent randomness, not a payload hash:
    // the same draft submitted twice gets two different tokens
    assert_ne!(first["token"], second["token"]);
    assert!(is_verification_token(first["token"].as_str().unwrap()));
    assert!(is_verification_token(second["token"].as_str().unwrap()));
}
