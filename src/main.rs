use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hr_backoffice::auth::revocation::RevocationSet;
use hr_backoffice::config::Config;
use hr_backoffice::db;
use hr_backoffice::docs::ApiDoc;
use hr_backoffice::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = db::init_db(&config.database_url).await?;
    db::migrate(&pool).await?;
    db::seed_default_admin(&pool).await?;

    // One revocation set for the whole process. Built inside the factory
    // closure, every worker would get its own blacklist.
    let revocations = Data::new(RevocationSet::new(config.jwt_ttl));

    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .configure(|cfg| {
                routes::configure_app(cfg, pool.clone(), config.clone(), revocations.clone())
            })
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
