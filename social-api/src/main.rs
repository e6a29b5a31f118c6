use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_api::config::Config;
use social_api::handlers;
use social_api::middleware::TokenAuth;
use social_api::services::{AccountService, InteractionService, NotificationService};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(env = %config.app.env, "starting social-api");

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;
    info!("connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;
    info!("database migrations applied");

    let notifications = NotificationService::new(pool.clone());
    let interactions = InteractionService::new(
        pool.clone(),
        notifications.clone(),
        config.notifications.notify_on_follow,
    );
    let accounts = AccountService::new(pool.clone());

    let addr = (config.app.host.clone(), config.app.port);
    info!("listening on {}:{}", addr.0, addr.1);

    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .app_data(web::Data::new(accounts.clone()))
            .app_data(web::Data::new(interactions.clone()))
            .app_data(web::Data::new(notifications.clone()))
            .wrap(TokenAuth)
            .route(
                "/health",
                web::get().to(|| async {
                    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
                }),
            )
            .service(web::scope("/api").configure(|cfg| {
                handlers::accounts::register_routes(cfg);
                handlers::posts::register_routes(cfg);
                handlers::comments::register_routes(cfg);
                handlers::notifications::register_routes(cfg);
            }))
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
