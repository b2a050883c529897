use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use quotation_api::{config, db, migrator};

/// Schema bootstrap for the quotation database
#[derive(Debug, Parser)]
#[command(name = "migration", version, about)]
struct Cli {
    /// Database URL; defaults to DATABASE_URL or the DB_* variables
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply every pending migration (default)
    Up,
    /// Roll back the last `steps` migrations
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop every table and re-apply all migrations
    Fresh,
    /// Print applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::init_tracing("info", false);

    let cli = Cli::parse();
    let database_url = match cli.database_url {
        Some(url) => url,
        None => config::database_url_from_env()?,
    };

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => migrator::run_migration(&database_url).await?,
        Command::Down { steps } => {
            let pool = db::establish_connection(&database_url).await?;
            info!(steps, "Rolling back migrations");
            migrator::Migrator::down(&pool, Some(steps)).await?;
        }
        Command::Fresh => {
            let pool = db::establish_connection(&database_url).await?;
            info!("Dropping all tables and re-applying migrations");
            migrator::Migrator::fresh(&pool).await?;
        }
        Command::Status => {
            let pool = db::establish_connection(&database_url).await?;
            migrator::Migrator::status(&pool).await?;
        }
    }

    info!("Migration command completed");
    Ok(())
}
