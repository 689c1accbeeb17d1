use forecast_chart_wasm::domain::forecast::{AnomalyPoint, ForecastPoint, TimeSeriesAligner, Timestamp};
use quickcheck_macros::quickcheck;
use std::collections::HashSet;

fn forecast_points(keys: &[i16]) -> Vec<ForecastPoint> {
    keys.iter()
        .map(|&k| ForecastPoint::new(Timestamp::from_millis(k as i64), k as f64, k as f64 - 1.0, k as f64 + 1.0))
        .collect()
}

fn anomaly_points(keys: &[i16]) -> Vec<AnomalyPoint> {
    keys.iter().map(|&k| AnomalyPoint::new(Timestamp::from_millis(k as i64), 0.5, None)).collect()
}

#[quickcheck]
fn never_longer_than_forecast(forecast: Vec<i16>, anomalies: Vec<i16>) -> bool {
    let series = TimeSeriesAligner::align_points(&forecast_points(&forecast), &anomaly_points(&anomalies));
    series.len() <= forecast.len()
}

#[quickcheck]
fn timestamps_are_the_deduplicated_forecast_keys(forecast: Vec<i16>, anomalies: Vec<i16>) -> bool {
    let series = TimeSeriesAligner::align_points(&forecast_points(&forecast), &anomaly_points(&anomalies));
    let mut expected: Vec<i64> = forecast.iter().map(|&k| k as i64).collect::<HashSet<_>>().into_iter().collect();
    expected.sort_unstable();
    let actual: Vec<i64> = series.points().iter().map(|p| p.timestamp.value()).collect();
    actual == expected
}

#[quickcheck]
fn anomaly_present_iff_key_matches(forecast: Vec<i16>, anomalies: Vec<i16>) -> bool {
    let series = TimeSeriesAligner::align_points(&forecast_points(&forecast), &anomaly_points(&anomalies));
    let anomaly_keys: HashSet<i64> = anomalies.iter().map(|&k| k as i64).collect();
    series
        .points()
        .iter()
        .all(|p| p.anomaly_value.is_some() == anomaly_keys.contains(&p.timestamp.value()))
}

#[quickcheck]
fn alignment_is_deterministic(forecast: Vec<i16>, anomalies: Vec<i16>) -> bool {
    let f = forecast_points(&forecast);
    let a = anomaly_points(&anomalies);
    TimeSeriesAligner::align_points(&f, &a) == TimeSeriesAligner::align_points(&f, &a)
}
