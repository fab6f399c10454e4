use augur::config::Config;
use augur::sources::SimulatedFeed;
use augur::{app, build_panel, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting Augur server on {}:{}", config.host, config.port);
    info!(
        "Default asset {}, timeframes [{}], {} candles each",
        config.default_asset,
        config.timeframes.join(", "),
        config.candle_count
    );

    let panel = build_panel(&config);
    if panel.is_empty() {
        warn!("No advisors configured; advisory confidence will be 0");
    } else {
        info!("Advisors: {}", panel.ids().join(", "));
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, Arc::new(SimulatedFeed::new()), panel);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
