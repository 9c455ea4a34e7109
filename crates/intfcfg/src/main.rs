//! intfcfg entry point.
//!
//! Reconciles the interfaces of a SONiC device with a desired interface
//! list and prints the run result as JSON on stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sonic_intfcfg::config::{load_interfaces, IntfCfgConfig, DEFAULT_CONFIG_PATH};
use sonic_intfcfg::{InterfaceList, OfflineClient, RunOptions, Runner, State};
use sonic_restcfg_common::http::HttpRestClient;

/// SONiC interface configuration reconciler
#[derive(Parser, Debug)]
#[command(name = "intfcfg")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Reconciliation state (merged, replaced, overridden, deleted)
    #[arg(short = 's', long, default_value = "merged")]
    state: State,

    /// Desired interfaces (YAML or JSON list)
    #[arg(short = 'd', long)]
    desired: Option<PathBuf>,

    /// Observed interfaces (YAML or JSON list); plan offline instead of
    /// reading the device
    #[arg(short = 'o', long)]
    observed: Option<PathBuf>,

    /// Compute and report without sending anything
    #[arg(long)]
    check: bool,

    /// Include a text diff of the configuration
    #[arg(long)]
    diff: bool,

    /// Log level, overriding the configuration file
    #[arg(short = 'l', long)]
    log_level: Option<String>,
}

/// Initialize tracing/logging. Logs go to stderr; stdout carries the result.
fn init_logging(level: &str, json: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

async fn run(args: Args) -> Result<()> {
    let config = IntfCfgConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.validate().context("validating configuration")?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, config.logging.json);

    info!("--- Starting intfcfg (state: {}) ---", args.state);

    let desired = match &args.desired {
        Some(path) => load_interfaces(path).context("loading desired interfaces")?,
        None => InterfaceList::default(),
    };

    let mut options = RunOptions::new(args.state);
    options.check_mode = args.check;
    options.diff = args.diff;

    let result = match &args.observed {
        Some(path) => {
            let observed = load_interfaces(path).context("loading observed interfaces")?;
            options.check_mode = true;
            info!("Planning offline against {}", path.display());
            Runner::new(&OfflineClient)
                .run_with_facts(&desired, observed, &options)
                .await?
        }
        None => {
            let client = HttpRestClient::new(config.to_transport())
                .context("creating device client")?;
            info!("Device: {}", config.to_transport().base_url());
            Runner::new(&client).run(&desired, &options).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    info!(changed = result.changed, "intfcfg finished");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("intfcfg: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
