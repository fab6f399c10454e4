use super::CandleSource;
use crate::services::signals::round_to;
use crate::types::Candle;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const BASE_PRICE: f64 = 1.1000;
/// Maximum close-to-open move per bar.
const MAX_CHANGE: f64 = 0.0020;
/// Maximum wick beyond the body on either side.
const MAX_WICK: f64 = 0.0010;
const PRICE_DECIMALS: i32 = 5;
const MIN_VOLUME: f64 = 1000.0;
const MAX_VOLUME: f64 = 5000.0;

/// Supported timeframe labels and their bar length in seconds.
const TIMEFRAME_SECONDS: &[(&str, i64)] = &[
    ("5s", 5),
    ("10s", 10),
    ("15s", 15),
    ("30s", 30),
    ("1m", 60),
    ("2m", 120),
    ("3m", 180),
    ("5m", 300),
    ("10m", 600),
    ("15m", 900),
    ("30m", 1800),
    ("1h", 3600),
    ("4h", 14_400),
    ("1d", 86_400),
];

/// Bar length for a timeframe label. Unknown labels are treated as 1m.
pub fn timeframe_seconds(timeframe: &str) -> i64 {
    TIMEFRAME_SECONDS
        .iter()
        .find(|(label, _)| *label == timeframe)
        .map(|(_, secs)| *secs)
        .unwrap_or(60)
}

/// Random-walk market feed for demos and tests.
///
/// Each bar opens at the previous close, moves by up to `MAX_CHANGE` and
/// grows wicks of up to `MAX_WICK`. The newest bar ends at the current time.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFeed {
    seed: Option<u64>,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reproducible feed: every fetch replays the same walk.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn generate(&self, timeframe: &str, count: usize) -> Vec<Candle> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let step = Duration::seconds(timeframe_seconds(timeframe));
        let now = Utc::now();
        let mut previous_close = BASE_PRICE;

        (0..count)
            .map(|i| {
                let open = previous_close;
                let close = open + rng.gen_range(-MAX_CHANGE..=MAX_CHANGE);
                let high = open.max(close) + rng.gen_range(0.0..=MAX_WICK);
                let low = open.min(close) - rng.gen_range(0.0..=MAX_WICK);

                let candle = Candle {
                    timestamp: now - step * (count - i) as i32,
                    open: round_to(open, PRICE_DECIMALS),
                    high: round_to(high, PRICE_DECIMALS),
                    low: round_to(low, PRICE_DECIMALS),
                    close: round_to(close, PRICE_DECIMALS),
                    volume: Some(rng.gen_range(MIN_VOLUME..MAX_VOLUME)),
                };
                previous_close = candle.close;
                candle
            })
            .collect()
    }
}

#[async_trait]
impl CandleSource for SimulatedFeed {
    fn id(&self) -> &str {
        "simulated"
    }

    async fn fetch_candles(
        &self,
        asset: &str,
        timeframe: &str,
        count: usize,
    ) -> anyhow::Result<Vec<Candle>> {
        debug!("Simulating {} {} candles for {}", count, timeframe, asset);
        Ok(self.generate(timeframe, count))
    }
}
