//! Planboard API server binary.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use planboard_api::config::ApiConfig;

/// CLI arguments. A flag wins over its environment variable; when both are
/// unset the `ApiConfig::from_env` default applies.
#[derive(Parser, Debug)]
#[command(name = "planboard_server", about = "Planboard API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR")]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 25)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,planboard_api=debug,planboard_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    // Refuses to start in production without an explicit SESSION_SECRET.
    let mut config = ApiConfig::from_env()?;
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    info!(
        environment = ?config.environment,
        max_connections = args.max_connections,
        "starting planboard_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    info!("running database migrations");
    planboard_api::migrate(&pool).await?;

    let bind_addr = config.bind_addr.clone();
    let state = planboard_api::AppState::postgres(pool, config)?;
    let app = planboard_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
