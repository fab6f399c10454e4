//! Augur - multi-timeframe candle signal analysis server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::Router;
use config::Config;
use services::advisors::{Advisor, AdvisorPanel, HeuristicAdvisor};
use sources::{CandleSource, ChatCompletionAdvisor};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use types::*;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub feed: Arc<dyn CandleSource>,
    pub panel: Arc<AdvisorPanel>,
}

impl AppState {
    pub fn new(config: Config, feed: Arc<dyn CandleSource>, panel: AdvisorPanel) -> Self {
        Self {
            config: Arc::new(config),
            feed,
            panel: Arc::new(panel),
        }
    }
}

/// Assemble the advisor panel described by the configuration.
///
/// In simulation mode every catalogued provider is stood in for by a
/// heuristic advisor under the same id; otherwise one chat-completion
/// advisor is registered per active provider.
pub fn build_panel(config: &Config) -> AdvisorPanel {
    let advisors: Vec<Arc<dyn Advisor>> = if config.simulate_advisors {
        config
            .providers
            .iter()
            .map(|p| Arc::new(HeuristicAdvisor::new(p.id.clone())) as Arc<dyn Advisor>)
            .collect()
    } else {
        config
            .active_providers()
            .map(|p| {
                info!("Advisor {} enabled ({})", p.id, p.model);
                Arc::new(ChatCompletionAdvisor::new(p)) as Arc<dyn Advisor>
            })
            .collect()
    };

    AdvisorPanel::new(advisors, Duration::from_millis(config.advisor_timeout_ms))
}

/// Build the HTTP application.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
