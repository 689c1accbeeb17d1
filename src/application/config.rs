use crate::domain::forecast::{ForecastHorizon, ForecastRequest, GrowthMode, SeasonalityMode};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_VALUE_PADDING_RATIO: f64 = 0.05;

/// Session configuration; the JS side may pass it as camelCase JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub api_base_url: String,
    pub horizon: ForecastHorizon,
    pub seasonality_mode: SeasonalityMode,
    pub growth: GrowthMode,
    /// Fraction of the visible value span added above and below the data
    #[serde(deserialize_with = "padding_ratio")]
    pub value_padding_ratio: f64,
}

fn sanitize_padding(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio >= 0.0 { ratio } else { DEFAULT_VALUE_PADDING_RATIO }
}

fn padding_ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(sanitize_padding(f64::deserialize(deserializer)?))
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            horizon: ForecastHorizon::default(),
            seasonality_mode: SeasonalityMode::default(),
            growth: GrowthMode::default(),
            value_padding_ratio: DEFAULT_VALUE_PADDING_RATIO,
        }
    }
}

impl ChartConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_horizon(mut self, horizon: ForecastHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_seasonality_mode(mut self, mode: SeasonalityMode) -> Self {
        self.seasonality_mode = mode;
        self
    }

    pub fn with_growth(mut self, growth: GrowthMode) -> Self {
        self.growth = growth;
        self
    }

    /// Negative or non-finite ratios are replaced by the default
    pub fn with_value_padding_ratio(mut self, ratio: f64) -> Self {
        self.value_padding_ratio = sanitize_padding(ratio);
        self
    }

    pub fn forecast_request(&self) -> ForecastRequest {
        ForecastRequest::new(self.horizon, self.seasonality_mode, self.growth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ChartConfig =
            serde_json::from_str(r#"{"horizon": 90, "seasonalityMode": "multiplicative"}"#).unwrap();
        assert_eq!(config.horizon.days(), 90);
        assert_eq!(config.seasonality_mode, SeasonalityMode::Multiplicative);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn out_of_range_horizon_is_rejected() {
        assert!(serde_json::from_str::<ChartConfig>(r#"{"horizon": 0}"#).is_err());
    }

    #[test]
    fn bad_padding_falls_back() {
        let config = ChartConfig::default().with_value_padding_ratio(-1.0);
        assert_eq!(config.value_padding_ratio, DEFAULT_VALUE_PADDING_RATIO);
    }

    #[test]
    fn bad_padding_from_json_falls_back() {
        let config: ChartConfig = serde_json::from_str(r#"{"valuePaddingRatio": -1.0}"#).unwrap();
        assert_eq!(config.value_padding_ratio, DEFAULT_VALUE_PADDING_RATIO);
        let config: ChartConfig = serde_json::from_str(r#"{"valuePaddingRatio": 0.25}"#).unwrap();
        assert_eq!(config.value_padding_ratio, 0.25);
    }
}
