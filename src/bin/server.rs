//! Corpus Gateway Server Binary
//!
//! Starts the HTTP gateway in front of a remote Kernel.
//!
//! ## Usage
//!
//! ```bash
//! # Start server with config.toml / config.local.toml / env settings
//! corpus-gateway-server
//!
//! # Custom address and Kernel
//! corpus-gateway-server --host 0.0.0.0 --port 8080 --kernel-url http://kernel:18981
//! ```
//!
//! ## Tracing
//!
//! Level and format come from `[logging]`, overridden by
//! `CORPUS_GATEWAY_TRACE_LEVEL` and `CORPUS_GATEWAY_TRACE_JSON`. Output goes
//! to stderr unless `CORPUS_GATEWAY_TRACE_FILE` names a file.

use std::env;
use std::sync::Arc;
use std::sync::OnceLock;

use clap::Parser;

use corpus_gateway::config::LoggingConfig;
use corpus_gateway::protocol::rest;
use corpus_gateway::protocol::Handler;
use corpus_gateway::{Config, RemoteKernel};

static TRACE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "corpus-gateway-server", version, about = "Query gateway for a corpus Kernel")]
struct Args {
    /// Bind address (overrides [http].host)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides [http].port)
    #[arg(long)]
    port: Option<u16>,

    /// Config file to load instead of config.toml + config.local.toml
    #[arg(long)]
    config: Option<String>,

    /// Kernel service URL (overrides [kernel].url)
    #[arg(long)]
    kernel_url: Option<String>,
}

// The blocking Kernel client must be built and dropped outside the async
// runtime, so the runtime is created by hand.
fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    let (mut config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_tracing(&config.logging);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "using default configuration");
    }

    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(url) = args.kernel_url {
        config.kernel.url = url;
    }

    let kernel = RemoteKernel::new(&config.kernel.url, config.kernel.request_timeout()).map_err(|e| {
        tracing::error!(error = %e, "failed to create kernel client");
        Box::<dyn std::error::Error + Send + Sync>::from(e.to_string())
    })?;
    let handler = Arc::new(Handler::from_config(&config, Arc::new(kernel)));

    tracing::info!(
        kernel = %config.kernel.url,
        app = %config.gateway.app_name,
        timeout_secs = config.gateway.query_timeout_secs,
        "gateway initialized"
    );

    if !config.http.enabled {
        tracing::warn!("HTTP server disabled in configuration, exiting");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(rest::start_http_server(Arc::clone(&handler), &config.http));

    // Abandoned Kernel workers may still be running
    runtime.shutdown_background();
    result
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Environment variables take precedence over config file values
    let json = env::var("CORPUS_GATEWAY_TRACE_JSON")
        .ok()
        .map_or_else(|| logging_config.format == "json", |v| v != "0");

    let level = env::var("CORPUS_GATEWAY_TRACE_LEVEL")
        .ok()
        .unwrap_or_else(|| logging_config.level.clone());

    let (non_blocking, guard) = match env::var("CORPUS_GATEWAY_TRACE_FILE") {
        Ok(log_path) => {
            let file = match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
            {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("ERROR: Unable to open CORPUS_GATEWAY_TRACE_FILE '{log_path}': {e}");
                    return;
                }
            };
            tracing_appender::non_blocking(file)
        }
        Err(_) => tracing_appender::non_blocking(std::io::stderr()),
    };
    let _ = TRACE_GUARD.set(guard);

    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let base = || {
        tracing_subscriber::fmt()
            .with_env_filter(filter.clone())
            .with_ansi(false)
            .with_thread_names(true)
            .with_writer(non_blocking.clone())
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
    };

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if json {
        Box::new(base().json().finish())
    } else {
        Box::new(base().compact().finish())
    };

    let _ = tracing::subscriber::set_global_default(subscriber);
}
