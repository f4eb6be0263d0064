mod consignees;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::consignees::ConsigneeCommands;

#[derive(Debug, Parser)]
#[command(name = "tenderdb-cli")]
#[command(about = "Tender and consignee management command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Consignee CSV tools (no database needed)
    Consignees {
        #[command(subcommand)]
        command: ConsigneeCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Apply migrations, then load default users and sample tenders
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Logs go to stderr so `--json` output on stdout stays machine-readable.
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => run_db(command).await?,
        Some(Commands::Consignees { command }) => consignees::run(command)?,
        None => println!("tenderdb-cli ready; run with --help for commands"),
    }

    Ok(())
}

async fn run_db(command: DbCommands) -> anyhow::Result<()> {
    let config = tenderdb_core::load_app_config()?;
    let pool_config = tenderdb_db::PoolConfig::from_app_config(&config);
    let pool = tenderdb_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        DbCommands::Ping => {
            tenderdb_db::ping(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = tenderdb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed => {
            let applied = tenderdb_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            let summary = tenderdb_db::seed_database(&pool).await?;
            println!(
                "seeded {} user(s), {} tender(s), {} new consignee(s)",
                summary.users, summary.tenders, summary.consignees
            );
        }
    }

    pool.close().await;
    Ok(())
}
