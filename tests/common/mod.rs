#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use storefront::{ServerConfig, create_app, db::Database, jwt::JwtConfig};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret";

/// Lowest bcrypt cost, keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Create a test app and return (app, db, jwt_config).
pub async fn create_test_app() -> (Router, Database, JwtConfig) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_SECRET.to_vec(),
        bcrypt_cost: TEST_BCRYPT_COST,
    };
    (create_app(&config), db, JwtConfig::new(TEST_SECRET))
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get_with_bearer(app: &Router, uri: &str, token: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("cookie", cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Register a user through the API and return its ID.
pub async fn register(app: &Router, username: &str, email: &str, password: &str) -> i64 {
    let body = serde_json::json!({ "username": username, "email": email, "password": password });
    let response = post_json(app, "/api/auth/register", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["user"]["id"].as_i64().unwrap()
}

/// Log in through the API and return (access_token, refresh_token).
pub async fn login(app: &Router, username: &str, password: &str) -> (String, String) {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/auth/login", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    (
        json["token"].as_str().unwrap().to_string(),
        json["refreshToken"].as_str().unwrap().to_string(),
    )
}

/// Sign arbitrary claims with the given secret.
pub fn sign_claims(secret: &[u8], claims: &serde_json::Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(secret),
    )
    .unwrap()
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
