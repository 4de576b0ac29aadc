use std::net::SocketAddr;

use clap::Parser;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use forumd::config::ServerConfig;
use forumd::web;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "forumd.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir);
    info!("Starting forum server");

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10);
    let db_pool: DatabaseConnection = Database::connect(opt).await?;

    let app = web::create_axum_router(db_pool);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|e| format!("Invalid LISTEN_ADDR {:?}: {e}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Forum API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
