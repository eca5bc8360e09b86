mod common;

use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::{App, test};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use uuid::Uuid;

use hr_backoffice::auth::jwt::{self, Claims};
use hr_backoffice::db;
use hr_backoffice::routes;

#[actix_web::test]
async fn login_issues_a_decodable_token() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let req = common::post_json_noauth(
        "/auth/login",
        json!({ "email": db::DEFAULT_ADMIN_EMAIL, "password": db::DEFAULT_ADMIN_PASSWORD }),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = common::read_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["data"]["expiresIn"], 3600);

    let token = body["data"]["access_token"].as_str().unwrap();
    let claims = jwt::verify_token(token, &config.jwt_secret).unwrap();
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.email, db::DEFAULT_ADMIN_EMAIL);
    assert_eq!(claims.role, "admin");
}

#[actix_web::test]
async fn login_rejects_a_wrong_password() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let req = common::post_json_noauth(
        "/auth/login",
        json!({ "email": db::DEFAULT_ADMIN_EMAIL, "password": "not-the-password" }),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body = common::read_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid credentials");
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    assert_eq!(body["statusCode"], 400);
}

#[actix_web::test]
async fn login_rejects_an_unknown_email() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let req = common::post_json_noauth(
        "/auth/login",
        json!({ "email": "nobody@example.com", "password": "password123" }),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body = common::read_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[actix_web::test]
async fn login_reports_every_missing_field() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let req = common::post_json_noauth("/auth/login", json!({}));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Validation failed");

    let fields = body["error"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["field"], "email");
    assert_eq!(
        fields[0]["errors"],
        json!(["email must be a string", "email should not be empty"])
    );
    assert_eq!(fields[1]["field"], "password");
}

#[actix_web::test]
async fn guard_rejects_a_missing_token() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let resp = test::call_service(&app, common::get_noauth("/employees").to_request()).await;
    assert_eq!(resp.status().as_u16(), 401);

    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Authorization token is missing");
    assert_eq!(body["error"]["code"], "TOKEN_MISSING");
}

#[actix_web::test]
async fn guard_rejects_a_garbled_token() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let resp =
        test::call_service(&app, common::get("/employees", "not.a.token").to_request()).await;
    assert_eq!(resp.status().as_u16(), 401);

    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Invalid token");
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_web::test]
async fn guard_reports_an_expired_token() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    // Issued two hours ago, expired well past the validator's leeway.
    let issued_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
        - 7200;
    let claims = Claims {
        sub: 1,
        email: db::DEFAULT_ADMIN_EMAIL.to_string(),
        role: "admin".to_string(),
        iat: issued_at,
        exp: issued_at + 60,
        jti: Uuid::new_v4().to_string(),
    };
    let stale = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    let resp = test::call_service(&app, common::get("/employees", &stale).to_request()).await;
    assert_eq!(resp.status().as_u16(), 401);

    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Token has expired");
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
}

#[actix_web::test]
async fn logout_blacklists_the_presented_token() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let token = common::admin_token(&config);

    // The token works before logout.
    let resp = test::call_service(&app, common::get("/employees", &token).to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = common::post_json("/auth/logout", &token, json!({}));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Logout successful");
    assert_eq!(body["data"], serde_json::Value::Null);

    // Every later use of the same token is refused, logout included.
    let resp = test::call_service(&app, common::get("/employees", &token).to_request()).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Token has been blacklisted");
    assert_eq!(body["error"]["code"], "TOKEN_BLACKLISTED");

    let req = common::post_json("/auth/logout", &token, json!({}));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_web::test]
async fn logout_leaves_other_tokens_alone() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let first = common::admin_token(&config);
    let second = common::admin_token(&config);

    let req = common::post_json("/auth/logout", &first, json!({}));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    // A different token for the same account keeps working.
    let resp = test::call_service(&app, common::get("/employees", &second).to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn sessions_returns_the_callers_profile() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let token = common::admin_token(&config);
    let resp = test::call_service(&app, common::get("/auth/sessions", &token).to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Sessions fetched successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["email"], db::DEFAULT_ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"].get("password").is_none());
}

#[actix_web::test]
async fn sessions_is_not_found_once_the_account_is_gone() {
    let config = common::test_config();
    let pool = common::setup_pool(&config).await;
    let revocations = common::revocations(&config);
    let app = test::init_service(App::new().configure(|cfg| {
        routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
    }))
    .await;

    let token = common::admin_token(&config);
    sqlx::query("DELETE FROM users WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    let resp = test::call_service(&app, common::get("/auth/sessions", &token).to_request()).await;
    assert_eq!(resp.status().as_u16(), 404);

    let body = common::read_json(resp).await;
    assert_eq!(body["message"], "Admin not found");
    assert_eq!(body["error"]["code"], "ADMIN_NOT_FOUND");
}
