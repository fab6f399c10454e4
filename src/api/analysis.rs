//! Analysis API endpoint.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::services::advisors::AdvisoryContext;
use crate::services::signals::{evaluate_technical, finalize};
use crate::types::{TimeframeSeries, TradingSignal};
use crate::AppState;

/// Body of `POST /api/analyze`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub asset: Option<String>,
    /// Timeframes to fetch when `series` is absent.
    pub timeframes: Option<Vec<String>>,
    /// Caller-supplied candles, analysed as given.
    pub series: Option<Vec<TimeframeSeries>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub message: String,
    pub signal: TradingSignal,
}

/// Create the analysis router.
pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze_signal))
}

/// Run one full analysis: candles, technical stage, advisors, blend.
async fn analyze_signal(State(state): State<AppState>, body: Bytes) -> Result<Json<AnalysisResponse>> {
    // An empty body means "all defaults"
    let request: AnalyzeRequest = if body.iter().all(u8::is_ascii_whitespace) {
        AnalyzeRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let asset = match request.asset {
        Some(asset) if asset.trim().is_empty() => {
            return Err(AppError::BadRequest("asset must not be blank".to_string()));
        }
        Some(asset) => asset.trim().to_string(),
        None => state.config.default_asset.clone(),
    };

    let series = match request.series {
        Some(series) => series,
        None => {
            let timeframes = request
                .timeframes
                .unwrap_or_else(|| state.config.timeframes.clone());
            fetch_series(&state, &asset, &timeframes).await?
        }
    };

    let assessment = evaluate_technical(&series, &state.config.analysis)?;

    let context = AdvisoryContext::from_assessment(&asset, &assessment);
    let judgments = state.panel.collect(&context).await;

    let signal = finalize(&asset, assessment, judgments, &state.config.analysis);

    info!(
        asset = %signal.asset,
        recommendation = signal.recommendation.label(),
        final_confidence = signal.final_confidence,
        judgments = signal.judgments.len(),
        "Analysis completed"
    );

    Ok(Json(AnalysisResponse {
        success: true,
        message: "Analysis completed".to_string(),
        signal,
    }))
}

/// Fetch every requested timeframe concurrently. Failed timeframes are
/// dropped with a warning; losing all of them is an upstream error.
async fn fetch_series(
    state: &AppState,
    asset: &str,
    timeframes: &[String],
) -> Result<Vec<TimeframeSeries>> {
    if timeframes.is_empty() {
        return Err(AppError::BadRequest("no timeframes requested".to_string()));
    }

    let count = state.config.candle_count;
    let futures: Vec<_> = timeframes
        .iter()
        .map(|timeframe| async move {
            let result = state.feed.fetch_candles(asset, timeframe, count).await;
            (timeframe, result)
        })
        .collect();

    let mut series = Vec::with_capacity(timeframes.len());
    for (timeframe, result) in join_all(futures).await {
        match result {
            Ok(candles) => {
                debug!(
                    asset = asset,
                    timeframe = %timeframe,
                    candle_count = candles.len(),
                    "Loaded candles"
                );
                series.push(TimeframeSeries::new(timeframe.clone(), candles));
            }
            Err(e) => {
                warn!(
                    asset = asset,
                    timeframe = %timeframe,
                    source = state.feed.id(),
                    error = %e,
                    "Failed to load candles for timeframe"
                );
            }
        }
    }

    if series.is_empty() {
        return Err(AppError::ExternalApi(format!(
            "{} returned no candles for {}",
            state.feed.id(),
            asset
        )));
    }

    Ok(series)
}
