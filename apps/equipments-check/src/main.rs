//! CLI smoke test and seeding for the hotel equipments tables.
//!
//! Runs the complete check by default. Subcommands run a single probe, the
//! seeding alone, or the extended verification suite. Exits 0 when the checks
//! pass and 1 otherwise, including on Ctrl+C.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use equipments_client::config::{
    DEFAULT_APP_URL, DEFAULT_BASE_URL, DEFAULT_SUCCESS_THRESHOLD, POLICY_REJECTION_MARKER,
};
use equipments_client::{runner, steps, verify, ClientConfig, RestClient};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the hosted project
    #[arg(long, env = "SUPABASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Static API key, also sent as the bearer token
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    api_key: String,

    /// Timeout for single reads and writes, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Timeout for the batch seed insert, in seconds
    #[arg(long, default_value_t = 15)]
    seed_timeout_secs: u64,

    /// Minimum success rate (percent) for a functional verdict
    #[arg(long, default_value_t = DEFAULT_SUCCESS_THRESHOLD,
          value_parser = clap::value_parser!(u32).range(0..=100))]
    threshold: u32,

    /// Error text marking an access-policy rejection (case-insensitive)
    #[arg(long, default_value = POLICY_REJECTION_MARKER)]
    policy_marker: String,

    /// Application URL shown in the follow-up instructions
    #[arg(long, default_value = DEFAULT_APP_URL)]
    app_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Run every check and print the scored report (default)
    Run,

    /// Check that one table is readable
    Probe {
        /// Table name, e.g. `hotel_equipments`
        table: String,
    },

    /// Insert the default equipments if the table is empty
    Seed,

    /// Run the extended CRUD, constraint and filter checks
    Verify,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
            seed_timeout: Duration::from_secs(self.seed_timeout_secs),
            success_threshold_percent: self.threshold,
            policy_rejection_marker: self.policy_marker.clone(),
            app_url: self.app_url.clone(),
        }
    }
}

/// Exit code for a command line clap refused. Help and version requests
/// succeed; every other parse error is an ordinary failure.
fn parse_error_exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return parse_error_exit_code(e.kind());
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    tokio::select! {
        result = run(args) => match result {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                println!("\n❌ Erreur fatale: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Ok(()) = signal::ctrl_c() => {
            println!("\n⚠️ Test interrompu par l'utilisateur");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let config = args.client_config();

    println!("🔧 SoliReserve Enhanced - Système Équipements");
    println!("{}", "=".repeat(60));
    println!("🔗 URL: {}", config.base_url);

    let client = RestClient::new(config).context("failed to build REST client")?;

    let passed = match args.command.unwrap_or(Commands::Run) {
        Commands::Run => runner::run_complete_test(&client).await,
        Commands::Probe { table } => steps::probe_table(&client, &table).await.is_ok(),
        Commands::Seed => steps::seed_initial_equipments(&client).await.is_ok(),
        Commands::Verify => {
            let report = verify::run_extended_verification(&client).await;
            println!("{}", report.render(client.config()));
            report.is_functional(client.config().success_threshold_percent)
        }
    };
    Ok(passed)
}
