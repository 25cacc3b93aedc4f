mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use influence_mapping::{Mapping, Settings};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "influence")]
#[command(about = "Query campaign-finance aggregates from Influence Explorer")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// API key (overrides INFLUENCE_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Aggregate API base URL (overrides INFLUENCE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available endpoints
    Endpoints(commands::endpoints::EndpointsArgs),
    /// Show an endpoint's parameters and output fields
    Describe(commands::describe::DescribeArgs),
    /// Call an endpoint and print normalized records
    Call(commands::call::CallArgs),
    /// List a choice catalog (parties, seats, cycles, reference tables)
    Choices(commands::choices::ChoicesArgs),
    /// Resolve a name to an entity id
    Resolve(commands::resolve::ResolveArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("influence=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(key) = &cli.api_key {
        settings = settings.with_api_key(key);
    }
    if let Some(url) = &cli.base_url {
        settings = settings.with_base_url(url);
    }
    let mapping = Mapping::new(settings)?;
    let format = cli.output;

    match &cli.command {
        Commands::Endpoints(args) => commands::endpoints::run(args, &mapping, format)?,
        Commands::Describe(args) => commands::describe::run(args, &mapping, format)?,
        Commands::Call(args) => commands::call::run(args, &mapping, format).await?,
        Commands::Choices(args) => commands::choices::run(args, &mapping, format).await?,
        Commands::Resolve(args) => commands::resolve::run(args, &mapping, format).await?,
    }

    Ok(())
}
