//! External collaborators: market data feeds and remote advisors.

pub mod chat_completion;
pub mod simulated;

pub use chat_completion::ChatCompletionAdvisor;
pub use simulated::{timeframe_seconds, SimulatedFeed};

use crate::types::Candle;
use async_trait::async_trait;

/// A supplier of ordered candles for an asset and timeframe.
#[async_trait]
pub trait CandleSource: Send + Sync {
    fn id(&self) -> &str;

    /// Fetch the most recent `count` candles, oldest first.
    async fn fetch_candles(
        &self,
        asset: &str,
        timeframe: &str,
        count: usize,
    ) -> anyhow::Result<Vec<Candle>>;
}
