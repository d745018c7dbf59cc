//! Runs the PetFriends contract suite against a live service.

use clap::{Parser, ValueEnum};
use petfriends_contract::{
    ClientConfig, ContractSuite, Credentials, PetFriendsClient, SuiteConfig,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "petfriends-contract", about = "PetFriends API contract suite")]
struct Args {
    /// Service base URL
    #[arg(long, env = "PETFRIENDS_BASE_URL", default_value = petfriends_contract::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Email of an account the service accepts
    #[arg(long, env = "PETFRIENDS_VALID_EMAIL")]
    valid_email: String,

    /// Password of that account
    #[arg(long, env = "PETFRIENDS_VALID_PASSWORD", hide_env_values = true)]
    valid_password: String,

    #[arg(long, env = "PETFRIENDS_INVALID_EMAIL", default_value = SuiteConfig::DEFAULT_INVALID_EMAIL)]
    invalid_email: String,

    #[arg(long, env = "PETFRIENDS_INVALID_PASSWORD", default_value = SuiteConfig::DEFAULT_INVALID_PASSWORD)]
    invalid_password: String,

    /// Directory holding dog.jpg and lol.txt
    #[arg(long, env = "PETFRIENDS_FIXTURES_DIR", default_value = petfriends_contract::config::DEFAULT_FIXTURES_DIR)]
    fixtures_dir: PathBuf,

    /// Only run scenarios whose name contains this text
    #[arg(long)]
    filter: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("petfriends_contract={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let suite_config = SuiteConfig::new(
        Credentials::new(args.valid_email, args.valid_password),
        Credentials::new(args.invalid_email, args.invalid_password),
    )
    .with_fixtures_dir(args.fixtures_dir);
    suite_config.validate()?;

    let client = PetFriendsClient::new(ClientConfig::with_base_url(args.base_url))?;

    info!(
        base_url = %client.base_url(),
        filter = ?args.filter,
        "Starting PetFriends contract suite"
    );

    let report = ContractSuite::new(&client, &suite_config)
        .run(args.filter.as_deref())
        .await;

    match args.format {
        ReportFormat::Text => println!("{report}"),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
