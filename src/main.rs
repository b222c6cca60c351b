use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use axe::config::{self, Config, ExplorerKind};
use axe::infrastructure::abi::{AbiSource, CachedAbiSource, EtherscanClient, SourcifyClient};
use axe::infrastructure::ethereum::HttpChainClient;
use axe::modules::calldata::{self, DataSource, DecodeInput, SourceSelectors};
use axe::modules::constants::{self, ConstantKind};
use axe::modules::export::{self, OutputFormat};
use axe::store::AbiCache;

#[derive(Debug, Parser)]
#[command(
    name = "axe",
    version,
    about = "Axe: EVM calldata decoding and constants at your fingertips"
)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to $AXE_CONFIG or ~/.config/axe/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Work with calldata
    Calldata {
        #[command(subcommand)]
        command: CalldataCommand,
    },
    /// Frequently used EVM constants: addresses, gas costs, uint limits, and more
    Constants {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
        format: OutputFormat,

        #[command(subcommand)]
        kind: ConstantKind,
    },
}

#[derive(Debug, Subcommand)]
enum CalldataCommand {
    /// Decode calldata using a transaction, an ABI file or a contract address
    Decode(DecodeArgs),
    /// Compute the selector of a function signature
    Selector {
        /// e.g. "transfer(address,uint256)"
        signature: String,
    },
}

#[derive(Debug, clap::Args)]
struct DecodeArgs {
    /// Transaction hash
    #[arg(long)]
    tx: Option<String>,

    /// Contract ABI file, build artifact, or artifacts directory
    #[arg(long)]
    abi: Option<PathBuf>,

    /// Contract address
    #[arg(long)]
    address: Option<String>,

    /// Raw calldata (hex)
    #[arg(long)]
    calldata: Option<String>,

    /// Chain name (e.g. ethereum, base, op-sepolia)
    #[arg(long)]
    chain: String,

    /// Print a single JSON document
    #[arg(long)]
    json: bool,

    /// Bypass the local ABI cache
    #[arg(long)]
    no_cache: bool,

    /// Block explorer to fetch verified ABIs from (overrides the config file)
    #[arg(long, value_enum)]
    explorer: Option<ExplorerKind>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,axe={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = config::load(args.config.as_deref());
    debug!(explorer = ?config.explorer, rpc_endpoints = config.rpc.len(), "loaded config");

    match args.command {
        Command::Calldata {
            command: CalldataCommand::Decode(decode_args),
        } => decode(decode_args, &config).await,
        Command::Calldata {
            command: CalldataCommand::Selector { signature },
        } => {
            let result = calldata::selector(&signature)?;
            result.write_to(&mut io::stdout().lock())?;
            Ok(())
        }
        Command::Constants { format, kind } => {
            let tables = constants::tables(kind);
            export::write_tables(&mut io::stdout().lock(), &tables, format)
        }
    }
}

async fn decode(args: DecodeArgs, config: &Config) -> Result<()> {
    let (source, chain) = SourceSelectors {
        tx: args.tx,
        abi: args.abi,
        address: args.address,
        calldata: args.calldata,
    }
    .resolve(&args.chain)?;

    let input = match source {
        DataSource::AbiFile { path, calldata } => DecodeInput::from_abi_path(&path, calldata)?,
        DataSource::Address { address, calldata } => {
            let explorer = build_explorer(config, args.explorer, args.no_cache)?;
            DecodeInput::from_address(explorer.as_ref(), &chain, address, calldata).await?
        }
        DataSource::Transaction(hash) => {
            let url = config.rpc_url(&chain)?;
            let client = HttpChainClient::connect(&url, config.request_timeout())?;
            let explorer = build_explorer(config, args.explorer, args.no_cache)?;
            DecodeInput::from_transaction(&client, explorer.as_ref(), &chain, hash).await?
        }
    };

    let call = calldata::decode(&input)?;
    calldata::write_decoded(&mut io::stdout().lock(), &input, &call, args.json)
        .context("failed to write output")
}

fn build_explorer(
    config: &Config,
    explorer: Option<ExplorerKind>,
    no_cache: bool,
) -> Result<Box<dyn AbiSource>> {
    let timeout = config.request_timeout();
    let inner: Box<dyn AbiSource> = match explorer.unwrap_or(config.explorer) {
        ExplorerKind::Etherscan => Box::new(EtherscanClient::new(
            config.etherscan_api_key.clone(),
            timeout,
        )?),
        ExplorerKind::Sourcify => Box::new(SourcifyClient::new(timeout)?),
    };

    let cache = if no_cache || !config.cache_abis {
        None
    } else {
        open_cache()
    };
    Ok(Box::new(CachedAbiSource::new(inner, cache)))
}

fn open_cache() -> Option<AbiCache> {
    let path = config::abi_cache_path()?;
    match AbiCache::open(&path) {
        Ok(cache) => Some(cache),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ABI cache disabled");
            None
        }
    }
}
