use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jsonrpc_breaker::config::{load_config, ClientConfig};
use jsonrpc_breaker::observability::logging::init_logging;
use jsonrpc_breaker::{CallContext, CallOutcome, MemoryStore, RpcClient};

#[derive(Parser)]
#[command(name = "rpc-cli")]
#[command(about = "Issue JSON-RPC calls through the circuit breaker", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint URL.
    #[arg(short, long)]
    endpoint: String,

    /// Method name.
    #[arg(short, long)]
    method: String,

    /// Params as a JSON document.
    #[arg(short, long, default_value = "null")]
    params: String,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of calls to issue (breaker state carries across calls).
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: u32,

    /// Per-call deadline in milliseconds (capped by the configured timeout).
    #[arg(long)]
    deadline_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    init_logging(&config.observability)?;

    url::Url::parse(&cli.endpoint)?;
    let params: Value = serde_json::from_str(&cli.params)?;

    let client = RpcClient::new(config, Arc::new(MemoryStore::new()))?;

    for attempt in 1..=cli.repeat {
        let mut ctx = CallContext::new();
        if let Some(ms) = cli.deadline_ms {
            ctx = ctx.with_timeout(Duration::from_millis(ms));
        }

        match client.call(&ctx, &cli.endpoint, &cli.method, &params).await {
            Ok(CallOutcome::Response(response)) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Ok(CallOutcome::BreakerOpen) => {
                eprintln!("[{attempt}] circuit open, call short-circuited");
            }
            Err(e) => {
                eprintln!("[{attempt}] error ({}): {}", e.kind(), e);
            }
        }
    }

    Ok(())
}
