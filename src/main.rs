use clap::{Parser, Subcommand};
use crm_lib::app::{seed_demo_data, SeedOutcome};
use crm_lib::config;

#[derive(Debug, Parser)]
#[command(name = "payassured-crm")]
#[command(about = "PayAssured CRM API server", version)]
struct Cli {
    /// Overrides DATABASE_URL.
    #[arg(long, global = true)]
    database_url: Option<String>,
    /// Overrides HOST.
    #[arg(long, global = true)]
    host: Option<String>,
    /// Overrides PORT.
    #[arg(long, global = true)]
    port: Option<u16>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Insert demo clients and cases into an empty database.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load()?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
        settings.db_target()?;
    }
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }

    crm_lib::init_tracing(settings.debug);
    tracing::info!(debug = settings.debug, "starting PayAssured CRM");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => crm_lib::serve(settings).await,
        Command::Seed => {
            let pool = crm_lib::open_database(&settings)?;
            match tokio::task::spawn_blocking(move || seed_demo_data(&pool)).await?? {
                SeedOutcome::Seeded { clients, cases } => {
                    tracing::info!(clients, cases, "demo data added");
                }
                SeedOutcome::AlreadyPopulated { clients, cases } => {
                    tracing::info!(clients, cases, "data already exists, nothing seeded");
                }
            }
            Ok(())
        }
    }
}
