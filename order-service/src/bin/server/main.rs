use std::sync::Arc;

use anyhow::Context;
use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use order_service::config::Config;
use order_service::domain::user::service::UserService;
use order_service::inbound::http::router::create_router;
use order_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "order-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load().context("Failed to load configuration")?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    let password_hasher = PasswordHasher::with_params(
        config.password.memory_cost_kib,
        config.password.time_cost,
        config.password.parallelism,
    )?;
    let validity = chrono::Duration::try_hours(config.jwt.expiration_hours)
        .context("jwt.expiration_hours out of range")?;
    let jwt_handler = JwtHandler::new(config.jwt.secret.as_bytes())?.with_validity(validity);

    let authenticator = Arc::new(Authenticator::new(password_hasher, jwt_handler));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}
