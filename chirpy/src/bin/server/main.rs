use std::sync::Arc;

use auth::Authenticator;
use chirpy::config::Config;
use chirpy::domain::chirp::service::ChirpService;
use chirpy::domain::user::service::UserService;
use chirpy::inbound::http::router::create_router;
use chirpy::outbound::repositories::PostgresChirpRepository;
use chirpy::outbound::repositories::PostgresRefreshTokenRepository;
use chirpy::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // A missing .env is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "chirpy",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        platform = %config.server.platform,
        static_dir = %config.server.static_dir,
        access_token_ttl_seconds = config.jwt.access_token_ttl_seconds,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let chirp_repository = Arc::new(PostgresChirpRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));

    let authenticator = Arc::new(
        Authenticator::new(
            config.jwt.secret.as_bytes(),
            user_repository.clone(),
            refresh_token_repository,
        )?
        .with_access_token_ttl(chrono::Duration::seconds(
            config.jwt.access_token_ttl_seconds,
        )),
    );

    let user_service = Arc::new(UserService::new(user_repository));
    let chirp_service = Arc::new(ChirpService::new(chirp_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        chirp_service,
        authenticator,
        &config.server,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
