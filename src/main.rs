
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use load_test::LoadTestConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use txrecords::{
    Clock, ManualClock, ServiceConfig, SystemClock, TransactionRequest, TransactionService,
    TxnError,
};

#[derive(Parser)]
#[command(name = "txrecords")]
#[command(about = "Transaction records with monotonic ids and duplicate-submission detection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk through create, duplicate rejection, window expiry, and paging
    Demo,
    /// Run concurrent create/list/get/update/delete phases and report latencies
    Stress {
        #[arg(long, default_value_t = 10_000)]
        requests: usize,
        #[arg(long, default_value_t = 10)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env().context("failed to load service configuration")?;

    match cli.command {
        Command::Demo => run_demo(&config),
        Command::Stress {
            requests,
            concurrency,
        } => {
            let service = TransactionService::from_config(&config)
                .context("failed to build transaction service")?;
            info!(requests, concurrency, "starting stress run");
            load_test::run_load_test(
                Arc::new(service),
                LoadTestConfig {
                    requests,
                    concurrency,
                    page_size: config.default_page_size,
                },
            )
            .await
        }
    }
}

fn run_demo(config: &ServiceConfig) -> Result<()> {
    // A hand-driven clock lets the demo step past the dedup window instantly.
    let clock = Arc::new(ManualClock::new(SystemClock.now_millis()));
    let service = TransactionService::from_config_with_clock(config, clock.clone())
        .context("failed to build transaction service")?;

    let request = TransactionRequest::new("A", "B", 100, "USD")
        .beneficiary_name("Nickel Fang")
        .description("invoice 42");
    println!("fingerprint: {}", request.fingerprint());

    let first = service.create(request.clone())?;
    println!("created:\n{}", serde_json::to_string_pretty(&first)?);

    match service.create(request.clone()) {
        Err(err @ TxnError::DuplicateSubmission(_)) => println!("resubmitted: {err}"),
        Ok(response) => warn!(id = %response.id, "resubmission was not detected as duplicate"),
        Err(err) => return Err(err.into()),
    }

    clock.advance(config.dedup_window + Duration::from_millis(1));
    let second = service.create(request)?;
    println!(
        "after {}s window: created id {} (previous {}, increasing: {})",
        config.dedup_window.as_secs(),
        second.id,
        first.id,
        second.id > first.id
    );

    let parts = service.id_generator().decompose(second.id);
    println!(
        "id fields: timestamp={} region={} instance={} sequence={}",
        parts.timestamp, parts.region, parts.instance, parts.sequence
    );

    let page = service.list(1, config.default_page_size)?;
    println!("page 1 holds {} transaction(s)", page.len());

    println!(
        "dedup stats: {}",
        serde_json::to_string(&service.dedup_stats())?
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("txrecords=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
