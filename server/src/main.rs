use std::net::IpAddr;

use anyhow::{Context, Result};
use clap::Parser;
use platform_db::{DatabaseSettings, connect, migrate};
use platform_obs::{ObsConfig, init_tracing};
use server::{AppConfig, AppState, ServeConfig, serve};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "employee-server", version, about = "Employee directory REST API")]
struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let settings = DatabaseSettings::with_url(cli.database_url).max_connections(cli.max_connections);
    let pool = connect(&settings).await.context("database connection failed")?;
    migrate(&pool).await.context("database migration failed")?;

    info!(upload_dir = %config.upload_dir.display(), "configuration loaded");
    let state = AppState::new(pool, config);
    serve(ServeConfig::new(cli.host, cli.port), state).await
}
