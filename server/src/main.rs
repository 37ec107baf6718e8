mod config;
mod http;

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{EmployeeService, SeaOrmEmployeeGateway, seed::seed_demo};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-server", version, about = "Employee records service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert demo employees, skipping emails that already exist.
    Seed,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
    /// List applied and pending migrations.
    Status,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    let pool = connect(&app_config.database).await?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, pool, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&pool).await,
            MigrateCommand::Down => migrate_down(&pool).await,
            MigrateCommand::Status => migrate_status(&pool).await,
        },
        Command::Seed => run_seed(pool).await,
    }
}

async fn run_seed(pool: DbPool) -> Result<()> {
    let service = EmployeeService::new(Arc::new(SeaOrmEmployeeGateway::new(pool)));
    let report = seed_demo(&service).await?;
    info!(created = report.created, skipped = report.skipped, "seed finished");
    Ok(())
}

async fn run_server(cmd: ServeCommand, pool: DbPool, config: Arc<AppConfig>) -> Result<()> {
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let state = AppState::new(pool, config);
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up(pool: &DbPool) -> Result<()> {
    Migrator::up(pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(pool: &DbPool) -> Result<()> {
    Migrator::down(pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}

async fn migrate_status(pool: &DbPool) -> Result<()> {
    for migration in Migrator::get_applied_migrations(pool).await? {
        info!(name = migration.name(), "applied");
    }
    for migration in Migrator::get_pending_migrations(pool).await? {
        info!(name = migration.name(), "pending");
    }
    Ok(())
}
