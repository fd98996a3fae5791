use std::{path::PathBuf, str::FromStr, sync::Arc};

use anyhow::Context;
use clap::Parser;
use snackquest_execution::Store;
use snackquest_node::{router, AppState, Config};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args and load config
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("could not read config file {}", path.display()))?;
            serde_yaml::from_str::<Config>(&raw).context("could not parse config file")?
        }
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    // Create logger
    let log_level = Level::from_str(&config.log_level).context("invalid log level")?;
    tracing_subscriber::fmt().with_max_level(log_level).init();

    if config.uses_default_secrets() {
        warn!("running with development secrets; set session_secret and admin_password");
    }

    // Open storage and assemble the portal state
    let store = Store::open(&config.database_url)
        .await
        .context("failed to open database")?;
    let state = AppState::new(store, &config);
    let app = router(state);

    // Per-IP rate limiting across the whole surface, credential
    // endpoints included.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(5)
            .burst_size(50)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .context("invalid rate limit configuration")?,
    );
    let app = app.layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("axum server error")?;

    Ok(())
}
