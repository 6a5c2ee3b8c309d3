//! Fortifier Operator Console
//!
//! Reads the on-chain circuit-breaker switch and drives the pause/unpause
//! workflow: read, gate check, build, direct-sign submit, reconcile.

use anyhow::Result;
use breaker_core::{
    build, gate, BreakerFunction, DirectSubmitter, FeePolicy, PollPolicy, ReconcileOutcome,
    Reconciler, Session, StateReader, Submitter,
};
use clap::{Parser, Subcommand};
use stacks_api::{ContractId, HttpNodeClient};
use stacks_codec::Network;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

/// On-chain circuit breaker operator console
#[derive(Parser, Debug)]
#[command(name = "fortifier")]
#[command(about = "Pause, resume and inspect the on-chain circuit breaker", long_about = None)]
struct Args {
    /// Stacks network to talk to
    #[arg(long, default_value = "testnet")]
    network: Network,

    /// Contract reference OWNER.name (defaults to FORTIFIER_CONTRACT)
    #[arg(long)]
    contract: Option<String>,

    /// Flat transaction fee in micro-STX
    #[arg(long, default_value = "10000")]
    fee: u64,

    /// Seconds to wait before the first confirmation read
    #[arg(long, default_value = "5")]
    confirm_delay_secs: u64,

    /// Bounded rechecks after the first confirmation read
    #[arg(long, default_value = "1")]
    rechecks: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read and print the current switch state
    Status,
    /// Pause the circuit breaker (requires a signing key)
    Pause,
    /// Resume the circuit breaker (requires a signing key)
    Unpause,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let contract = config::resolve_contract(args.contract.as_deref())?;
    let client = Arc::new(HttpNodeClient::new(args.network));
    let reader = StateReader::new(client.clone(), contract.clone());

    match args.command {
        Command::Status => run_status(&reader, &contract).await,
        Command::Pause => run_flip(&args, client, reader, &contract, BreakerFunction::Pause).await,
        Command::Unpause => {
            run_flip(&args, client, reader, &contract, BreakerFunction::Unpause).await
        }
    }
}

/// Print the current switch state; `Unknown` is reported, not fatal
async fn run_status(reader: &StateReader<HttpNodeClient>, contract: &ContractId) -> Result<()> {
    let outcome = reader.read().await;
    println!("contract: {}", contract);
    println!(
        "circuit breaker: {}",
        outcome.state.to_string().to_uppercase()
    );
    if outcome.state == breaker_core::SwitchState::Unknown {
        println!("(state could not be read; the node may be unreachable)");
    }
    Ok(())
}

/// Full state-changing workflow for one command
async fn run_flip(
    args: &Args,
    client: Arc<HttpNodeClient>,
    reader: StateReader<HttpNodeClient>,
    contract: &ContractId,
    function: BreakerFunction,
) -> Result<()> {
    let key = config::load_secret_key()?;
    let submitter = DirectSubmitter::new(client, key, args.network);
    let session = Session::connect(*submitter.sender(), args.network);

    let current = reader.read_state().await;
    tracing::info!("current switch state: {}", current);
    gate::check(function, current, &session, None)?;

    let fee = FeePolicy {
        fee_microstx: args.fee,
    };
    let request = build(function, &session, contract, &fee)?;
    let mut pending = submitter.submit(&request).await?;
    if let Some(txid) = &pending.txid {
        println!("transaction submitted: {}", txid);
        println!("explorer: {}", args.network.explorer_txid_url(txid));
    }

    let policy = PollPolicy {
        initial_delay: Duration::from_secs(args.confirm_delay_secs),
        recheck_delay: Duration::from_secs(args.confirm_delay_secs),
        max_rechecks: args.rechecks,
    };
    let reconciler = Reconciler::new(reader, policy);
    match reconciler
        .reconcile(&mut pending, function.expected_state())
        .await
    {
        ReconcileOutcome::Confirmed => {
            println!("confirmed: switch is now {}", function.expected_state());
            Ok(())
        }
        ReconcileOutcome::Unconfirmed => {
            println!(
                "not confirmed yet; the transaction may still land. \
                 Check again with 'fortifier status'."
            );
            std::process::exit(1);
        }
    }
}
