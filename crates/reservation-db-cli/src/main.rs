// crates/reservation-db-cli/src/main.rs

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reservation_db::{db, Database, DatabaseConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reservation database connection tool", long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Command,
}

/// Flags that take precedence over `DB_*` variables and `.env`.
#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// Database host (overrides DB_HOST)
    #[arg(long, global = true)]
    host: Option<String>,
    /// Database name (overrides DB_NAME)
    #[arg(long, global = true)]
    dbname: Option<String>,
    /// Database user (overrides DB_USER)
    #[arg(long, global = true)]
    user: Option<String>,
    /// Database password (overrides DB_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Try to connect, printing a diagnostic on failure
    Check,
    /// Connect and run a test query; failures exit non-zero
    Ping,
    /// Print the resolved connection settings as JSON
    Config,
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    descriptor: String,
    #[serde(flatten)]
    config: &'a DatabaseConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let database = Database::new(resolve_config(cli.overrides));

    match cli.command {
        Command::Check => handle_check(&database, &mut io::stdout()).await,
        Command::Ping => handle_ping(&database).await,
        Command::Config => {
            let config = database.config();
            let report = ConfigReport {
                descriptor: config.descriptor(),
                config,
            };
            let rendered = serde_json::to_string_pretty(&report)
                .context("failed to render configuration")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn resolve_config(overrides: ConfigOverrides) -> DatabaseConfig {
    dotenvy::dotenv().ok();
    apply_overrides(DatabaseConfig::from_env(), overrides)
}

fn apply_overrides(mut config: DatabaseConfig, overrides: ConfigOverrides) -> DatabaseConfig {
    if let Some(host) = overrides.host {
        config = config.with_host(host);
    }
    if let Some(dbname) = overrides.dbname {
        config = config.with_database_name(dbname);
    }
    if let Some(user) = overrides.user {
        config = config.with_username(user);
    }
    if let Some(password) = overrides.password {
        config = config.with_password(password);
    }
    config
}

/// Failures are reported on `out` and still count as success.
async fn handle_check<W: Write>(database: &Database, out: &mut W) -> Result<()> {
    if database.connect_reporting_to(out).await.is_some() {
        writeln!(out, "Connection OK").context("failed to write check result")?;
    }
    Ok(())
}

async fn handle_ping(database: &Database) -> Result<()> {
    let descriptor = database.config().descriptor();
    let mut conn = database
        .connect()
        .await
        .with_context(|| format!("failed to connect to {descriptor}"))?;

    db::ping(&mut conn)
        .await
        .with_context(|| format!("test query against {descriptor} failed"))?;
    let encoding = db::client_encoding(&mut conn)
        .await
        .context("failed to read client encoding")?;

    info!(%descriptor, %encoding, "ping succeeded");
    println!("{descriptor} OK (client_encoding={encoding})");
    Ok(())
}
