//! §4.11 CostTracker — per-provider/per-model price table and usage ledger.

use std::collections::HashMap;

/// USD price per 1,000 tokens, input and output.
#[derive(Debug, Clone, Copy)]
pub struct Price {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl Price {
    pub const ZERO: Price = Price { input_per_1k: 0.0, output_per_1k: 0.0 };
}

#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub provider: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
}

/// Per-pipeline-run cost ledger (never shared across runs, per §5).
#[derive(Debug, Clone, Default)]
pub struct CostTracker {
    prices: HashMap<(String, String), Price>,
    custom_prices: HashMap<(String, String), Price>,
    records: Vec<UsageRecord>,
}

/// Local-provider models with no explicit price route to a zero price
/// unless a pattern matches a known commercial local-model reseller (none
/// ship by default).
const LOCAL_PROVIDER: &str = "local";

impl CostTracker {
    pub fn new() -> Self {
        let mut prices = HashMap::new();
        prices.insert(("openai".into(), "gpt-4o".into()), Price { input_per_1k: 0.0025, output_per_1k: 0.01 });
        prices.insert(("openai".into(), "gpt-4o-mini".into()), Price { input_per_1k: 0.00015, output_per_1k: 0.0006 });
        prices.insert(("anthropic".into(), "claude-opus-4".into()), Price { input_per_1k: 0.015, output_per_1k: 0.075 });
        prices.insert(("anthropic".into(), "claude-sonnet-4".into()), Price { input_per_1k: 0.003, output_per_1k: 0.015 });
        prices.insert(("google".into(), "gemini-1.5-pro".into()), Price { input_per_1k: 0.00125, output_per_1k: 0.005 });
        Self { prices, custom_prices: HashMap::new(), records: Vec::new() }
    }

    /// Installs a `custom_pricing` override (§4.11), taking priority over
    /// the built-in table for the same `(provider, model)` key.
    pub fn with_custom_pricing(mut self, provider: &str, model: &str, price: Price) -> Self {
        self.custom_prices.insert((provider.to_string(), model.to_string()), price);
        self
    }

    fn price_for(&self, provider: &str, model: &str) -> Price {
        if provider.eq_ignore_ascii_case(LOCAL_PROVIDER) {
            return self
                .custom_prices
                .get(&(provider.to_string(), model.to_string()))
                .copied()
                .unwrap_or(Price::ZERO);
        }
        self.custom_prices
            .get(&(provider.to_string(), model.to_string()))
            .or_else(|| self.prices.get(&(provider.to_string(), model.to_string())))
            .copied()
            .unwrap_or(Price::ZERO)
    }

    /// Appends a usage record, pricing it immediately against the table.
    pub fn track(&mut self, provider: &str, model: &str, input_tokens: u32, output_tokens: u32) {
        let price = self.price_for(provider, model);
        let cost_usd = (input_tokens as f64 / 1000.0) * price.input_per_1k
            + (output_tokens as f64 / 1000.0) * price.output_per_1k;
        self.records.push(UsageRecord {
            provider: provider.to_string(),
            model: model.to_string(),
            input_tokens,
            output_tokens,
            cost_usd,
        });
    }

    pub fn total(&self) -> f64 {
        self.records.iter().map(|r| r.cost_usd).sum()
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_provider_is_always_zero() {
        let mut tracker = CostTracker::new();
        tracker.track("local", "qwen2.5-coder", 1000, 500);
        assert_eq!(tracker.total(), 0.0);
    }

    #[test]
    fn track_multiplies_by_known_price() {
        let mut tracker = CostTracker::new();
        tracker.track("openai", "gpt-4o-mini", 1000, 1000);
        assert!((tracker.total() - (0.00015 + 0.0006)).abs() < 1e-9);
    }

    #[test]
    fn custom_pricing_overrides_table() {
        let mut tracker =
            CostTracker::new().with_custom_pricing("openai", "gpt-4o-mini", Price { input_per_1k: 1.0, output_per_1k: 1.0 });
        tracker.track("openai", "gpt-4o-mini", 1000, 0);
        assert_eq!(tracker.total(), 1.0);
    }

    #[test]
    fn unknown_model_defaults_to_zero() {
        let mut tracker = CostTracker::new();
        tracker.track("openai", "some-new-model", 1000, 1000);
        assert_eq!(tracker.total(), 0.0);
    }
}
