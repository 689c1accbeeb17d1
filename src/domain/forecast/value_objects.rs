use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::errors::{DomainError, DomainResult};

/// Value Object - canonical time key, epoch milliseconds (UTC)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Constructor, Display,
    Serialize, Deserialize,
)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    pub fn from_millis(value: i64) -> Self {
        Self(value)
    }
}

/// Value Object - a date field as it arrives on the wire.
///
/// The forecasting service serializes pandas timestamps as ISO strings, but
/// epoch numbers show up too, so every shape is accepted here and resolved
/// by `TimeKeyNormalizer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateLike {
    Millis(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for DateLike {
    fn from(value: i64) -> Self {
        DateLike::Millis(value)
    }
}

impl From<&str> for DateLike {
    fn from(value: &str) -> Self {
        DateLike::Text(value.to_string())
    }
}

impl From<Timestamp> for DateLike {
    fn from(value: Timestamp) -> Self {
        DateLike::Millis(value.value())
    }
}

/// Value Object - anomaly severity label.
///
/// Parsing never fails: labels other than High/Medium/Low are kept in `Other`
/// and rendered with the default tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum SeverityLevel {
    #[display(fmt = "High")]
    High,
    #[display(fmt = "Medium")]
    Medium,
    #[display(fmt = "Low")]
    Low,
    #[strum(default)]
    #[display(fmt = "{}", _0)]
    Other(String),
}

impl SeverityLevel {
    pub fn parse(label: &str) -> Self {
        // infallible thanks to the `Other` default variant
        label.trim().parse().unwrap_or_else(|_| SeverityLevel::Other(label.to_string()))
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, SeverityLevel::Other(_))
    }
}

impl From<String> for SeverityLevel {
    fn from(value: String) -> Self {
        SeverityLevel::parse(&value)
    }
}

impl From<SeverityLevel> for String {
    fn from(value: SeverityLevel) -> Self {
        value.to_string()
    }
}

/// Value Object - Prophet seasonality mode accepted by the service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    #[default]
    Additive,
    Multiplicative,
}

/// Value Object - trend growth model accepted by the service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GrowthMode {
    #[default]
    Linear,
    Flat,
}

/// Value Object - forecast horizon in days, always within 1..=365
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    pub const MIN_DAYS: u32 = 1;
    pub const MAX_DAYS: u32 = 365;

    pub fn new(days: u32) -> DomainResult<Self> {
        if (Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) {
            Ok(Self(days))
        } else {
            Err(DomainError::InvalidHorizon(days))
        }
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self(30)
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = DomainError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(value: ForecastHorizon) -> Self {
        value.0
    }
}

/// Value Object - parameters sent along with a dataset upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub horizon: ForecastHorizon,
    pub seasonality_mode: SeasonalityMode,
    pub growth: GrowthMode,
}

impl ForecastRequest {
    pub fn new(horizon: ForecastHorizon, seasonality_mode: SeasonalityMode, growth: GrowthMode) -> Self {
        Self { horizon, seasonality_mode, growth }
    }

    /// Query string understood by both the forecast and report endpoints
    pub fn query_string(&self) -> String {
        format!(
            "days={}&seasonality_mode={}&growth={}",
            self.horizon.days(),
            self.seasonality_mode.as_ref(),
            self.growth.as_ref()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_is_case_insensitive_and_total() {
        assert_eq!(SeverityLevel::parse("high"), SeverityLevel::High);
        assert_eq!(SeverityLevel::parse(" MEDIUM "), SeverityLevel::Medium);
        assert_eq!(SeverityLevel::parse("Low"), SeverityLevel::Low);
        assert_eq!(SeverityLevel::parse("Extreme"), SeverityLevel::Other("Extreme".into()));
        assert!(!SeverityLevel::parse("").is_recognized());
    }

    #[test]
    fn horizon_bounds() {
        assert!(ForecastHorizon::new(0).is_err());
        assert_eq!(ForecastHorizon::new(365).map(|h| h.days()), Ok(365));
        assert_eq!(ForecastHorizon::new(366), Err(DomainError::InvalidHorizon(366)));
    }

    #[test]
    fn modes_use_service_spelling() {
        assert_eq!(SeasonalityMode::Multiplicative.as_ref(), "multiplicative");
        assert_eq!("flat".parse::<GrowthMode>(), Ok(GrowthMode::Flat));
    }

    #[test]
    fn default_request_query() {
        assert_eq!(
            ForecastRequest::default().query_string(),
            "days=30&seasonality_mode=additive&growth=linear"
        );
    }
}
