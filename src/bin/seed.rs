//! Operator CLI: fill the database with fake catalog content.
//!
//! ```text
//! seed <all|games|categories|comments|users> [--count N]
//! ```

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use irl_games_api::clock::{Clock, SystemClock};
use irl_games_api::seed::{self, SeedTarget};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Generate fake data for the database")]
struct Cli {
    /// What to generate
    #[arg(value_enum)]
    what: SeedTarget,

    /// Number of objects to generate
    #[arg(long, default_value_t = 5)]
    count: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "irl_games_api=info,sea_orm=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = irl_games_api::db::connect(&database_url).await?;
    Migrator::up(&db, None).await?;

    match seed::run(&db, cli.what, cli.count, SystemClock.now()).await {
        Ok(report) => {
            tracing::debug!(?report, "seeding finished");
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err}");
            Err(err.into())
        }
    }
}
