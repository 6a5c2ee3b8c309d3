//! Fortifier Deployment Tool
//!
//! Broadcasts one contract-deployment transaction per listed contract and
//! exits non-zero if any deployment fails.

use anyhow::{bail, Context, Result};
use breaker_core::keys;
use clap::Parser;
use secp256k1::{Secp256k1, SecretKey};
use stacks_api::{HttpNodeClient, NodeClient};
use stacks_codec::{
    AnchorMode, Network, Payload, PostConditionMode, StacksAddress, UnsignedTransaction,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod sources;

use sources::ContractSource;

pub const PRIVATE_KEY_ENV: &str = "DEPLOYER_PRIVATE_KEY";
pub const MNEMONIC_ENV: &str = "DEPLOYER_MNEMONIC";

/// Deploy the circuit-breaker contracts to a Stacks network
#[derive(Parser, Debug)]
#[command(name = "fortifier-deploy")]
#[command(about = "Deploy Clarity contracts for the circuit breaker", long_about = None)]
struct Args {
    /// Target network
    #[arg(value_name = "NETWORK")]
    network: Network,

    /// Directory holding the .clar contract sources
    #[arg(long, default_value = "./contracts")]
    contracts_dir: PathBuf,

    /// Contract names to deploy, in order
    #[arg(long = "contract", default_value = "circuit-breaker")]
    contracts: Vec<String>,

    /// Flat fee per deployment in micro-STX
    #[arg(long, default_value = "10000")]
    fee: u64,

    /// Seconds to wait between deployments
    #[arg(long, default_value = "3")]
    pacing_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
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

    let sources = sources::load_contract_sources(&args.contracts_dir, &args.contracts)?;
    let key = load_deployer_key()?;

    let secp = Secp256k1::new();
    let sender =
        StacksAddress::from_public_key(args.network.address_version(), &key.public_key(&secp));
    tracing::info!(
        "deploying {} contract(s) to {} as {}",
        sources.len(),
        args.network,
        sender
    );

    let client = HttpNodeClient::new(args.network);
    // fetch the ordering nonce once and advance it locally; the confirmed
    // nonce does not move between paced broadcasts
    let mut nonce = client
        .account_nonce(&sender.encode())
        .await
        .context("fetching deployer account nonce")?;

    let mut deployed = 0usize;
    for (i, source) in sources.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(Duration::from_secs(args.pacing_secs)).await;
        }
        match deploy_one(&client, args.network, args.fee, nonce, &key, source).await {
            Ok(txid) => {
                println!("{} deployed: txid {}", source.name, txid);
                println!("  explorer: {}", args.network.explorer_txid_url(&txid));
                deployed += 1;
                nonce += 1;
            }
            Err(e) => {
                // a rejected transaction never entered the mempool, so the
                // nonce is reusable for the next contract
                tracing::error!("{} deployment failed: {:#}", source.name, e);
            }
        }
    }

    println!("deployed {}/{} contracts", deployed, sources.len());
    if deployed < sources.len() {
        std::process::exit(1);
    }
    Ok(())
}

/// Signing key from the environment; mnemonics are shape-checked but
/// derivation happens outside this tool
fn load_deployer_key() -> Result<SecretKey> {
    if let Ok(hexkey) = std::env::var(PRIVATE_KEY_ENV) {
        return keys::parse_secret_key(&hexkey)
            .with_context(|| format!("{} is not a usable private key", PRIVATE_KEY_ENV));
    }
    if let Ok(mnemonic) = std::env::var(MNEMONIC_ENV) {
        keys::validate_mnemonic_shape(&mnemonic)?;
        bail!(
            "{} holds a valid mnemonic, but key derivation happens outside this tool; \
             export the derived private key via {}",
            MNEMONIC_ENV,
            PRIVATE_KEY_ENV
        );
    }
    bail!(
        "{} or {} must be set to sign deployments",
        PRIVATE_KEY_ENV,
        MNEMONIC_ENV
    )
}

async fn deploy_one(
    client: &HttpNodeClient,
    network: Network,
    fee: u64,
    nonce: u64,
    key: &SecretKey,
    source: &ContractSource,
) -> Result<String> {
    let tx = UnsignedTransaction::for_network(
        network,
        fee,
        nonce,
        PostConditionMode::Allow,
        AnchorMode::Any,
        Payload::SmartContract {
            name: source.name.clone(),
            code_body: source.code.clone(),
        },
    );
    let signed = tx.sign(key)?;
    tracing::info!(
        "broadcasting deployment of {} (nonce {}, txid {})",
        source.name,
        nonce,
        signed.txid()
    );
    let txid = client.broadcast(signed.bytes()).await?;
    Ok(txid)
}
