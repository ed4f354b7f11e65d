use anyhow::{Context, Result};
use awsdash::aws::auth::resolve_credentials;
use awsdash::aws::client::AwsClient;
use awsdash::config::Config;
use awsdash::resource::probe_credentials;
use awsdash::web::{self, AppState, DashboardSettings};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Read-only web dashboard for AWS compute resources
#[derive(Parser, Debug)]
#[command(name = "awsdash", version, about, long_about = None)]
struct Args {
    /// Address to listen on (default 0.0.0.0:5001)
    #[arg(short, long)]
    bind: Option<String>,

    /// AWS region to query
    #[arg(short, long)]
    region: Option<String>,

    /// Log level; overrides RUST_LOG
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Also write logs to a file (default path when no value is given)
    #[arg(long, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn setup_logging(
    level: Option<LogLevel>,
    log_file: Option<PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_filter()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let Some(log_path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("awsdash").join("awsdash.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".awsdash").join("awsdash.log");
    }
    PathBuf::from("awsdash.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = args.log_file.map(|path| path.unwrap_or_else(get_log_path));
    let _log_guard = setup_logging(args.log_level, log_file)?;

    // CLI > environment > config file > default
    let mut config = Config::load();
    if let Some(region) = args.region {
        config.region = region;
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    tracing::debug!("{:?}", config);

    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind))?;

    let credentials = match resolve_credentials(&config.credential_sources()) {
        Some((credentials, origin)) => {
            tracing::info!("Using AWS credentials from {:?}", origin);
            Some(credentials)
        }
        None => {
            tracing::warn!("No AWS credentials configured");
            None
        }
    };

    let client = AwsClient::new(credentials, &config.region, config.endpoint_url.as_deref())?;
    tracing::info!("Using region: {}", config.region);

    let status = probe_credentials(&client, &config.region).await;

    let settings = DashboardSettings {
        region: config.region.clone(),
        environment: config.environment.clone(),
        access_key_configured: config.access_key_configured(),
        secret_key_configured: config.secret_key_configured(),
    };
    let state = AppState::new(Arc::new(client), settings, status);

    web::serve(addr, state).await
}
