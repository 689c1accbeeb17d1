use super::entities::{
    AlignedPoint, AlignedSeries, AlignmentReport, AnomalyPoint, AnomalyRecord, ForecastPoint,
    ForecastRecord,
};
use super::value_objects::{DateLike, Timestamp};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_warn};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Naive layouts tried after RFC 3339; naive values are taken as UTC
const NAIVE_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Converts date-like values into canonical epoch-millisecond keys
pub struct TimeKeyNormalizer;

impl TimeKeyNormalizer {
    pub fn normalize(value: &DateLike) -> DomainResult<Timestamp> {
        match value {
            DateLike::Millis(ms) => Ok(Timestamp::from_millis(*ms)),
            DateLike::Float(ms) => Self::from_float(*ms),
            DateLike::Text(text) => Self::parse_text(text),
        }
    }

    fn from_float(ms: f64) -> DomainResult<Timestamp> {
        // i64::MAX as f64 rounds up, so the bound is exclusive
        if ms.is_finite() && ms.abs() < i64::MAX as f64 {
            Ok(Timestamp::from_millis(ms.trunc() as i64))
        } else {
            Err(DomainError::InvalidTimestamp(ms.to_string()))
        }
    }

    fn parse_text(raw: &str) -> DomainResult<Timestamp> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(DomainError::InvalidTimestamp(raw.to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Timestamp::from_millis(dt.timestamp_millis()));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Timestamp::from_millis(naive.and_utc().timestamp_millis()));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Timestamp::from_millis(midnight.and_utc().timestamp_millis()));
            }
        }

        let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(ms) = text.parse::<i64>() {
                return Ok(Timestamp::from_millis(ms));
            }
        }

        Err(DomainError::InvalidTimestamp(raw.to_string()))
    }
}

/// Read-only timestamp index over the anomaly side of one alignment pass
struct AnomalyLookup<'a> {
    by_timestamp: HashMap<Timestamp, &'a AnomalyPoint>,
}

impl<'a> AnomalyLookup<'a> {
    /// Later anomalies overwrite earlier ones sharing a timestamp
    fn build(anomalies: &'a [AnomalyPoint]) -> Self {
        let by_timestamp = anomalies.iter().map(|a| (a.timestamp, a)).collect();
        Self { by_timestamp }
    }

    fn get(&self, timestamp: Timestamp) -> Option<&'a AnomalyPoint> {
        self.by_timestamp.get(&timestamp).copied()
    }

    fn len(&self) -> usize {
        self.by_timestamp.len()
    }
}

/// Joins a dense forecast with sparse anomalies on the timestamp key
pub struct TimeSeriesAligner;

impl TimeSeriesAligner {
    pub fn align(forecast: &[ForecastRecord], anomalies: &[AnomalyRecord]) -> AlignedSeries {
        Self::align_with_report(forecast, anomalies).0
    }

    /// Align raw records, dropping any whose date field cannot be normalized
    pub fn align_with_report(
        forecast: &[ForecastRecord],
        anomalies: &[AnomalyRecord],
    ) -> (AlignedSeries, AlignmentReport) {
        let mut report = AlignmentReport::default();

        let mut forecast_points = Vec::with_capacity(forecast.len());
        for record in forecast {
            match record.normalize() {
                Ok(point) => forecast_points.push(point),
                Err(err) => {
                    report.dropped_forecast += 1;
                    log_warn!(LogComponent::Domain("TimeSeriesAligner"), "Dropping forecast record: {}", err);
                }
            }
        }

        let mut anomaly_points = Vec::with_capacity(anomalies.len());
        for record in anomalies {
            match record.normalize() {
                Ok(point) => anomaly_points.push(point),
                Err(err) => {
                    report.dropped_anomalies += 1;
                    log_warn!(LogComponent::Domain("TimeSeriesAligner"), "Dropping anomaly record: {}", err);
                }
            }
        }

        let series = Self::merge(forecast_points, &anomaly_points, &mut report);
        log_debug!(
            LogComponent::Domain("TimeSeriesAligner"),
            "Aligned {} points ({} anomalies), report: {:?}",
            series.len(),
            series.anomaly_count(),
            report
        );
        (series, report)
    }

    /// Same algorithm for input whose timestamps are already normalized
    pub fn align_points(forecast: &[ForecastPoint], anomalies: &[AnomalyPoint]) -> AlignedSeries {
        let mut report = AlignmentReport::default();
        Self::merge(forecast.to_vec(), anomalies, &mut report)
    }

    fn merge(
        mut forecast: Vec<ForecastPoint>,
        anomalies: &[AnomalyPoint],
        report: &mut AlignmentReport,
    ) -> AlignedSeries {
        // stable sort + dedup keeps the first-seen point for a duplicated timestamp
        forecast.sort_by_key(|p| p.timestamp);
        let before_dedup = forecast.len();
        forecast.dedup_by_key(|p| p.timestamp);
        report.duplicate_forecast = before_dedup - forecast.len();

        let lookup = AnomalyLookup::build(anomalies);
        report.duplicate_anomalies = anomalies.len() - lookup.len();

        let mut matched = 0;
        let points: Vec<AlignedPoint> = forecast
            .iter()
            .map(|point| {
                let anomaly = lookup.get(point.timestamp);
                if anomaly.is_some() {
                    matched += 1;
                }
                AlignedPoint::from_forecast(point, anomaly)
            })
            .collect();
        report.unmatched_anomalies = lookup.len() - matched;

        AlignedSeries::from_sorted(points)
    }
}
