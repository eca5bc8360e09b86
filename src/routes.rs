use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web::{self, Data};
use sqlx::SqlitePool;

use crate::api::{admin, employee, leave_record};
use crate::auth::handlers;
use crate::auth::revocation::RevocationSet;
use crate::config::Config;
use crate::error::{ApiError, FieldError};

fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap()
}

/// Mounts every route with its rate limiter. Auth for the protected
/// scopes happens in the `AuthUser` extractor, not in middleware, so
/// each handler states its own requirement.
pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = build_limiter(config.rate_login_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::logout)),
            )
            .service(
                web::resource("/sessions")
                    .wrap(Governor::new(&protected_limiter))
                    .route(web::get().to(handlers::sessions)),
            ),
    );

    cfg.service(
        web::scope("/admins")
            .wrap(Governor::new(&protected_limiter))
            .service(
                web::resource("")
                    .route(web::get().to(admin::list_admins))
                    .route(web::post().to(admin::create_admin)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(admin::get_admin))
                    .route(web::patch().to(admin::update_admin))
                    .route(web::delete().to(admin::delete_admin)),
            ),
    );

    cfg.service(
        web::scope("/employees")
            .wrap(Governor::new(&protected_limiter))
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::patch().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    );

    cfg.service(
        web::scope("/leave-records")
            .wrap(Governor::new(&protected_limiter))
            .service(
                web::resource("")
                    .route(web::get().to(leave_record::list_leave_records))
                    .route(web::post().to(leave_record::create_leave_record)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(leave_record::get_leave_record))
                    .route(web::patch().to(leave_record::update_leave_record))
                    .route(web::delete().to(leave_record::delete_leave_record)),
            ),
    );
}

/// Registers shared state, extractor error handlers and all routes in
/// one call, so the binary and the test harness build identical apps.
/// The revocation set must be created once per process and passed in;
/// building it inside would hand every worker its own blacklist.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    pool: SqlitePool,
    config: Config,
    revocations: Data<RevocationSet>,
) {
    cfg.app_data(Data::new(pool))
        .app_data(Data::new(config.clone()))
        .app_data(revocations)
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config());

    configure(cfg, &config);
}

/// Body deserialization failures (bad JSON, wrong types, unknown fields)
/// answer with the validation envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(vec![FieldError::new("body", vec![err.to_string()])]).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| {
        ApiError::Validation(vec![FieldError::new(
            "id",
            vec!["id must be a number conforming to the specified constraints".to_string()],
        )])
        .into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(vec![FieldError::new("query", vec![err.to_string()])]).into()
    })
}
