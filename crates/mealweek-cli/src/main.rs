mod config;
mod session;
#[cfg(test)]
mod test_util;

use anyhow::Result;
use clap::{Parser, Subcommand};

use mealweek_db::pool;

use config::MealweekConfig;
use session::Session;

#[derive(Parser)]
#[command(name = "mealweek", about = "Weekly meal planner with a shopping list export")]
struct Cli {
    /// Database URL (overrides MEALWEEK_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Without a subcommand, an interactive planning session starts.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a mealweek config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/mealweek")]
        db_url: String,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the mealweek database (if needed) and run migrations
    DbInit,
}

/// `mealweek init`: write the config file.
fn cmd_init(db_url: &str, force: bool) -> Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    config::save_config(&config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_owned(),
        },
    })?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `mealweek db-init` to create and migrate the database.");
    Ok(())
}

/// `mealweek db-init`: create the database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> Result<()> {
    let resolved = MealweekConfig::resolve(cli_db_url)?;

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::connect(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let tables = pool::table_names(&db_pool).await?;
    db_pool.close().await;

    println!("Database ready. Tables: {}", tables.join(", "));
    Ok(())
}

/// Default command: the interactive menu session on stdin/stdout.
///
/// A connection failure here aborts the whole run; everything after this
/// point reports errors to the user and keeps the session alive.
async fn run_session(cli_db_url: Option<&str>) -> Result<()> {
    let resolved = MealweekConfig::resolve(cli_db_url)?;
    let db_pool = pool::connect(&resolved.db_config).await?;

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let result = Session::new(db_pool.clone(), stdin, stdout).run().await;

    db_pool.close().await;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { db_url, force }) => cmd_init(&db_url, force)?,
        Some(Commands::DbInit) => cmd_db_init(cli.database_url.as_deref()).await?,
        None => run_session(cli.database_url.as_deref()).await?,
    }

    Ok(())
}
