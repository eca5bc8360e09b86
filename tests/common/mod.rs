#![allow(dead_code)]

use std::net::SocketAddr;

use actix_web::dev::ServiceResponse;
use actix_web::test::{self, TestRequest};
use actix_web::web::Data;
use serde_json::Value;
use sqlx::SqlitePool;

use hr_backoffice::auth::jwt;
use hr_backoffice::auth::revocation::RevocationSet;
use hr_backoffice::config::Config;
use hr_backoffice::db;

/// Limits are high enough that no test can trip them; every request in
/// a test binary arrives from the same fake peer address.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        jwt_ttl: 3600,
        rate_login_per_min: 600,
        rate_protected_per_min: 6000,
    }
}

/// Fresh in-memory database with schema and the seeded default admin.
pub async fn setup_pool(config: &Config) -> SqlitePool {
    let pool = db::init_db(&config.database_url).await.unwrap();
    db::migrate(&pool).await.unwrap();
    db::seed_default_admin(&pool).await.unwrap();
    pool
}

pub fn revocations(config: &Config) -> Data<RevocationSet> {
    Data::new(RevocationSet::new(config.jwt_ttl))
}

/// Bearer token for the seeded admin, which gets id 1 on a fresh
/// database. Skips the login round-trip where the test is not about it.
pub fn admin_token(config: &Config) -> String {
    jwt::generate_access_token(
        1,
        db::DEFAULT_ADMIN_EMAIL,
        "admin",
        &config.jwt_secret,
        config.jwt_ttl,
    )
    .unwrap()
}

fn peer() -> SocketAddr {
    // The rate limiter keys on the peer IP and rejects requests that
    // carry none, so every builder sets one.
    "127.0.0.1:9000".parse().unwrap()
}

pub fn get(path: &str, token: &str) -> TestRequest {
    TestRequest::get()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .peer_addr(peer())
}

pub fn post_json(path: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::post()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .peer_addr(peer())
}

pub fn patch_json(path: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::patch()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .peer_addr(peer())
}

pub fn delete(path: &str, token: &str) -> TestRequest {
    TestRequest::delete()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .peer_addr(peer())
}

/// Unauthenticated POST, for login and guard tests.
pub fn post_json_noauth(path: &str, body: Value) -> TestRequest {
    TestRequest::post().uri(path).set_json(body).peer_addr(peer())
}

pub fn get_noauth(path: &str) -> TestRequest {
    TestRequest::get().uri(path).peer_addr(peer())
}

pub async fn read_json(resp: ServiceResponse) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap()
}
