//! Ads server: the REST backend the console talks to.

use ads_core::config::AppConfig;
use ads_management::ManagementServer;
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "ads-server")]
#[command(about = "REST backend for campaigns, ad sets, creatives and ads")]
#[command(version)]
struct Cli {
    /// Bind address (overrides config)
    #[arg(long, env = "ADS_CONSOLE__SERVER__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "ADS_CONSOLE__SERVER__PORT")]
    port: Option<u16>,

    /// Give every new user a sample campaign tree
    #[arg(long, default_value_t = false)]
    seed_demo_data: bool,

    /// Access token lifetime in hours (overrides config)
    #[arg(long)]
    token_ttl_hours: Option<i64>,

    /// Prometheus exporter port (overrides config)
    #[arg(long, env = "ADS_CONSOLE__SERVER__METRICS_PORT")]
    metrics_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ads_server=info,ads_management=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.seed_demo_data {
        config.server.seed_demo_data = true;
    }
    if let Some(hours) = cli.token_ttl_hours {
        anyhow::ensure!(hours > 0, "--token-ttl-hours must be positive");
        config.server.token_ttl_hours = hours;
    }
    if let Some(port) = cli.metrics_port {
        config.server.metrics_port = Some(port);
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        seed_demo_data = config.server.seed_demo_data,
        token_ttl_hours = config.server.token_ttl_hours,
        "Configuration loaded"
    );

    let server = ManagementServer::new(config.server);
    if let Err(e) = server.start_metrics() {
        error!(error = %e, "Failed to start metrics exporter");
    }

    server
        .start_http(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await
}
