use std::collections::HashMap;
use std::env;

/// Default cross-timeframe weights, `label:weight` pairs.
pub const DEFAULT_TIMEFRAME_WEIGHTS: &str = "1m:0.1,5m:0.2,15m:0.3,30m:0.2,1h:0.2";

/// Known advisory providers: (id, env prefix, endpoint, model, temperature).
const PROVIDER_CATALOGUE: [(&str, &str, &str, &str, f64); 5] = [
    (
        "chatgpt",
        "OPENAI",
        "https://api.openai.com/v1/chat/completions",
        "gpt-4",
        0.2,
    ),
    (
        "deepseek",
        "DEEPSEEK",
        "https://api.deepseek.com/v1/chat/completions",
        "deepseek-chat",
        0.4,
    ),
    (
        "groq",
        "GROQ",
        "https://api.groq.com/openai/v1/chat/completions",
        "mixtral-8x7b-32768",
        0.4,
    ),
    (
        "grok",
        "GROK",
        "https://api.grok.com/v1/chat/completions",
        "grok-trading-expert",
        0.2,
    ),
    (
        "manus",
        "MANUS",
        "https://api.manus.ai/v1/chat/completions",
        "manus-expert",
        0.3,
    ),
];

/// Weights and thresholds consumed by the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Weight per timeframe label. Unknown labels weigh 0.
    pub timeframe_weights: HashMap<String, f64>,
    /// `final_score` must exceed this (in magnitude) to leave `hold`.
    pub signal_threshold: f64,
    /// Share of the technical confidence in the final blend.
    pub technical_weight: f64,
    /// Share of the advisory confidence in the final blend.
    pub advisory_weight: f64,
}

impl AnalysisConfig {
    /// Weight for a timeframe label, 0 when unrecognised.
    pub fn timeframe_weight(&self, timeframe: &str) -> f64 {
        self.timeframe_weights.get(timeframe).copied().unwrap_or(0.0)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeframe_weights: parse_timeframe_weights(DEFAULT_TIMEFRAME_WEIGHTS),
            signal_threshold: 0.1,
            technical_weight: 0.6,
            advisory_weight: 0.4,
        }
    }
}

/// Chat-completion provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub id: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f64,
    pub api_key: Option<String>,
    pub enabled: bool,
}

impl ProviderConfig {
    /// Enabled and carrying a non-blank API key.
    pub fn is_active(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_deref()
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Asset analysed when a request names none.
    pub default_asset: String,
    /// Timeframes fetched when a request supplies no candles.
    pub timeframes: Vec<String>,
    /// Candles fetched per timeframe.
    pub candle_count: usize,
    /// Per-advisor deadline (ms).
    pub advisor_timeout_ms: u64,
    /// Use the offline heuristic advisor instead of remote providers.
    pub simulate_advisors: bool,
    pub analysis: AnalysisConfig,
    pub providers: Vec<ProviderConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());
        let flag = |key: &str| lookup(key).map(|v| v == "true" || v == "1");

        let defaults = AnalysisConfig::default();

        let providers = PROVIDER_CATALOGUE
            .iter()
            .map(|(id, prefix, url, model, temperature)| ProviderConfig {
                id: id.to_string(),
                api_url: lookup(&format!("{}_URL", prefix)).unwrap_or_else(|| url.to_string()),
                model: lookup(&format!("{}_MODEL", prefix)).unwrap_or_else(|| model.to_string()),
                temperature: *temperature,
                api_key: lookup(&format!("{}_API_KEY", prefix)),
                enabled: flag(&format!("{}_ENABLED", prefix)).unwrap_or(false),
            })
            .collect();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            default_asset: lookup("DEFAULT_ASSET").unwrap_or_else(|| "EURUSD_OTC".to_string()),
            timeframes: lookup("TIMEFRAMES")
                .map(|s| parse_list(&s))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(|| {
                    ["1m", "5m", "15m", "30m", "1h"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
            candle_count: lookup("CANDLE_COUNT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            advisor_timeout_ms: lookup("ADVISOR_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(20_000),
            simulate_advisors: flag("SIMULATE_ADVISORS").unwrap_or(false),
            analysis: AnalysisConfig {
                timeframe_weights: lookup("TIMEFRAME_WEIGHTS")
                    .map(|s| parse_timeframe_weights(&s))
                    .filter(|weights| !weights.is_empty())
                    .unwrap_or(defaults.timeframe_weights),
                signal_threshold: parsed("SIGNAL_THRESHOLD").unwrap_or(defaults.signal_threshold),
                technical_weight: parsed("TECHNICAL_WEIGHT").unwrap_or(defaults.technical_weight),
                advisory_weight: parsed("ADVISORY_WEIGHT").unwrap_or(defaults.advisory_weight),
            },
            providers,
        }
    }

    /// Providers that are enabled and have an API key.
    pub fn active_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.is_active())
    }
}

impl Default for Config {
    /// Built-in defaults, ignoring the environment.
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `"1m:0.1,5m:0.2"` into a weight table. Malformed pairs are skipped.
pub fn parse_timeframe_weights(s: &str) -> HashMap<String, f64> {
    s.split(',')
        .filter_map(|pair| {
            let (label, weight) = pair.split_once(':')?;
            let weight: f64 = weight.trim().parse().ok()?;
            let label = label.trim();
            if label.is_empty() || !weight.is_finite() {
                return None;
            }
            Some((label.to_string(), weight))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.default_asset, "EURUSD_OTC");
        assert_eq!(config.timeframes, vec!["1m", "5m", "15m", "30m", "1h"]);
        assert_eq!(config.candle_count, 100);
        assert_eq!(config.advisor_timeout_ms, 20_000);
        assert!(!config.simulate_advisors);
        assert_eq!(config.active_providers().count(), 0);
    }

    #[test]
    fn test_default_analysis_weights() {
        let analysis = AnalysisConfig::default();
        assert_eq!(analysis.timeframe_weight("1m"), 0.1);
        assert_eq!(analysis.timeframe_weight("5m"), 0.2);
        assert_eq!(analysis.timeframe_weight("15m"), 0.3);
        assert_eq!(analysis.timeframe_weight("30m"), 0.2);
        assert_eq!(analysis.timeframe_weight("1h"), 0.2);
        assert_eq!(analysis.timeframe_weight("4h"), 0.0);
        assert_eq!(analysis.signal_threshold, 0.1);
        assert_eq!(analysis.technical_weight, 0.6);
        assert_eq!(analysis.advisory_weight, 0.4);
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("TIMEFRAMES", "1m, 4h"),
            ("SIMULATE_ADVISORS", "1"),
            ("SIGNAL_THRESHOLD", "0.25"),
            ("TIMEFRAME_WEIGHTS", "1m:0.5,4h:0.5"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeframes, vec!["1m", "4h"]);
        assert!(config.simulate_advisors);
        assert_eq!(config.analysis.signal_threshold, 0.25);
        assert_eq!(config.analysis.timeframe_weight("4h"), 0.5);
        assert_eq!(config.analysis.timeframe_weight("15m"), 0.0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("TECHNICAL_WEIGHT", "abc"),
            ("TIMEFRAME_WEIGHTS", "garbage"),
        ]));
        assert_eq!(config.port, 5000);
        assert_eq!(config.analysis.technical_weight, 0.6);
        assert_eq!(config.analysis.timeframe_weight("15m"), 0.3);
    }

    #[test]
    fn test_parse_timeframe_weights_skips_malformed() {
        let weights = parse_timeframe_weights("1m:0.1, 5m : 0.2 ,bad,:0.3,15m:x");
        assert_eq!(weights.len(), 2);
        assert_eq!(weights["1m"], 0.1);
        assert_eq!(weights["5m"], 0.2);
    }

    // =========================================================================
    // Providers
    // =========================================================================

    #[test]
    fn test_provider_catalogue() {
        let config = Config::default();
        let ids: Vec<&str> = config.providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["chatgpt", "deepseek", "groq", "grok", "manus"]);

        let groq = &config.providers[2];
        assert_eq!(groq.api_url, "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(groq.model, "mixtral-8x7b-32768");
        assert_eq!(groq.temperature, 0.4);
    }

    #[test]
    fn test_provider_requires_enabled_and_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_ENABLED", "true"),
            ("DEEPSEEK_ENABLED", "true"),
            ("DEEPSEEK_API_KEY", "   "),
            ("GROQ_API_KEY", "gsk-test"),
            ("MANUS_ENABLED", "true"),
            ("MANUS_MODEL", "manus-2"),
        ]));
        let active: Vec<&str> = config.active_providers().map(|p| p.id.as_str()).collect();
        assert_eq!(active, vec!["chatgpt"]);
        assert_eq!(config.providers[4].model, "manus-2");
    }
}
