pub use super::value_objects::{DateLike, SeverityLevel, Timestamp};
use super::services::TimeKeyNormalizer;
use crate::domain::errors::DomainResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Forecast row as received, before its date field is normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub ds: DateLike,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl ForecastRecord {
    pub fn new(ds: impl Into<DateLike>, yhat: f64, yhat_lower: f64, yhat_upper: f64) -> Self {
        Self { ds: ds.into(), yhat, yhat_lower, yhat_upper }
    }

    pub fn normalize(&self) -> DomainResult<ForecastPoint> {
        let timestamp = TimeKeyNormalizer::normalize(&self.ds)?;
        Ok(ForecastPoint {
            timestamp,
            yhat: self.yhat,
            yhat_lower: self.yhat_lower,
            yhat_upper: self.yhat_upper,
        })
    }
}

/// Anomaly row as received, before its date field is normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub ds: DateLike,
    pub actual_value: f64,
    pub severity_level: Option<String>,
}

impl AnomalyRecord {
    pub fn new(ds: impl Into<DateLike>, actual_value: f64, severity_level: Option<&str>) -> Self {
        Self { ds: ds.into(), actual_value, severity_level: severity_level.map(str::to_string) }
    }

    pub fn normalize(&self) -> DomainResult<AnomalyPoint> {
        let timestamp = TimeKeyNormalizer::normalize(&self.ds)?;
        Ok(AnomalyPoint {
            timestamp,
            actual_value: self.actual_value,
            severity_level: self.severity_level.as_deref().map(SeverityLevel::parse),
        })
    }
}

/// Domain entity - one predicted value with its confidence band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub timestamp: Timestamp,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl ForecastPoint {
    pub fn new(timestamp: Timestamp, yhat: f64, yhat_lower: f64, yhat_upper: f64) -> Self {
        Self { timestamp, yhat, yhat_lower, yhat_upper }
    }
}

/// Domain entity - an observed value flagged by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyPoint {
    pub timestamp: Timestamp,
    pub actual_value: f64,
    pub severity_level: Option<SeverityLevel>,
}

impl AnomalyPoint {
    pub fn new(timestamp: Timestamp, actual_value: f64, severity_level: Option<SeverityLevel>) -> Self {
        Self { timestamp, actual_value, severity_level }
    }
}

/// Domain entity - forecast point joined with the anomaly sharing its timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedPoint {
    pub timestamp: Timestamp,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub anomaly_value: Option<f64>,
    pub severity_level: Option<SeverityLevel>,
}

impl AlignedPoint {
    pub fn from_forecast(point: &ForecastPoint, anomaly: Option<&AnomalyPoint>) -> Self {
        Self {
            timestamp: point.timestamp,
            yhat: point.yhat,
            yhat_lower: point.yhat_lower,
            yhat_upper: point.yhat_upper,
            anomaly_value: anomaly.map(|a| a.actual_value),
            severity_level: anomaly.and_then(|a| a.severity_level.clone()),
        }
    }

    pub fn is_anomaly(&self) -> bool {
        self.anomaly_value.is_some()
    }

    pub fn forecast(&self) -> ForecastPoint {
        ForecastPoint::new(self.timestamp, self.yhat, self.yhat_lower, self.yhat_upper)
    }
}

/// Domain entity - the immutable aligned sequence shared by viewport and renderer.
///
/// Sorted ascending by timestamp with unique timestamps. Cloning shares the
/// underlying buffer, so identity survives clones.
#[derive(Debug, Clone)]
pub struct AlignedSeries {
    points: Arc<[AlignedPoint]>,
}

impl AlignedSeries {
    pub(crate) fn from_sorted(points: Vec<AlignedPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { points: Arc::from(points) }
    }

    pub fn empty() -> Self {
        Self::from_sorted(Vec::new())
    }

    pub fn points(&self) -> &[AlignedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AlignedPoint> {
        self.points.get(index)
    }

    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.points.last().map(|p| p.timestamp)
    }

    pub fn anomaly_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_anomaly()).count()
    }

    /// Inclusive index slice; out-of-range bounds are clipped.
    pub fn slice(&self, start: usize, end: usize) -> &[AlignedPoint] {
        if self.points.is_empty() || start > end {
            return &[];
        }
        let end = end.min(self.points.len() - 1);
        if start > end {
            return &[];
        }
        &self.points[start..=end]
    }

    /// Binary search by timestamp, same contract as `slice::binary_search`
    pub fn position_of(&self, timestamp: Timestamp) -> Result<usize, usize> {
        self.points.binary_search_by_key(&timestamp, |p| p.timestamp)
    }

    /// Flatten back to forecast-only points
    pub fn to_forecast_points(&self) -> Vec<ForecastPoint> {
        self.points.iter().map(AlignedPoint::forecast).collect()
    }

    /// True when both handles share one buffer, i.e. come from the same alignment
    pub fn same_identity(&self, other: &AlignedSeries) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

impl PartialEq for AlignedSeries {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl Default for AlignedSeries {
    fn default() -> Self {
        Self::empty()
    }
}

/// Diagnostic counters produced by one alignment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    pub dropped_forecast: usize,
    pub dropped_anomalies: usize,
    pub duplicate_forecast: usize,
    pub duplicate_anomalies: usize,
    pub unmatched_anomalies: usize,
}

/// Error metrics reported by the service; carried through untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    #[serde(rename = "MAE", default)]
    pub mae: f64,
    #[serde(rename = "RMSE", default)]
    pub rmse: f64,
    #[serde(rename = "MAPE", default)]
    pub mape: f64,
}

/// Everything one forecast response carries, in domain terms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastPayload {
    pub forecast: Vec<ForecastRecord>,
    pub anomalies: Vec<AnomalyRecord>,
    pub metrics: ForecastMetrics,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub message: Option<String>,
    pub row_count: Option<u64>,
}
