#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]

//! Simplicity node startup.
//!
//! Selects a chain, applies regtest overrides, and wires the parameters
//! for the rest of the node. Invalid arguments fail fast with a nonzero
//! exit status and a message naming the bad parameter.

use anyhow::{bail, Result};
use clap::Parser;
use spl_consensus::ExperimentalRetargeter;
use spl_params::{ChainParams, Network, RegtestOptions};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Simplicity full node.
#[derive(Parser, Debug)]
#[command(name = "spl-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chain to run (main, test, regtest)
    #[arg(long, default_value = "main")]
    chain: String,

    /// Segwit activation height; -1 disables (regtest only)
    #[arg(long = "segwitheight")]
    segwit_height: Option<i64>,

    /// Version-bits override, deployment:start:end (regtest only, repeatable)
    #[arg(long = "vbparams")]
    vbparams: Vec<String>,

    /// Experimental retargeter: asert, stf, or wma (regtest only)
    #[arg(long = "experimental-retargeter")]
    experimental_retargeter: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let network: Network = args.chain.parse()?;

    let experimental_retargeter = match &args.experimental_retargeter {
        None => None,
        Some(name) => match name.parse::<ExperimentalRetargeter>() {
            Ok(choice) => Some(choice),
            Err(()) => bail!("unknown experimental retargeter ({name}), expecting asert, stf, or wma"),
        },
    };

    let options = RegtestOptions {
        segwit_height: args.segwit_height,
        vbparams: args.vbparams.clone(),
        experimental_retargeter,
    };

    let params = ChainParams::for_network(network, &options)?;

    info!(chain = %params.network, "chain parameters loaded");
    info!(
        genesis = %params.genesis_hash,
        port = params.default_port,
        hrp = params.bech32_hrp,
        "network identity"
    );
    info!(
        spacing = params.consensus.pow_target_spacing,
        timespan = params.consensus.pow_target_timespan,
        window = params.consensus.miner_confirmation_window,
        "retargeting constants"
    );
    if let Some(choice) = params.consensus.experimental_retargeter {
        info!(?choice, "experimental retargeter enabled");
    }

    Ok(())
}
