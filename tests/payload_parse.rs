use forecast_chart_wasm::domain::errors::AppError;
use forecast_chart_wasm::domain::forecast::{DateLike, TimeSeriesAligner};
use forecast_chart_wasm::infrastructure::dto::parse_forecast_response;

const RESPONSE: &str = r#"{
    "message": "Analysis complete. Forecasted 2 days.",
    "row_count": 120,
    "parameters": {"seasonality_mode": "additive", "growth": "linear"},
    "metrics": {"MAE": 1.25, "RMSE": 2.5, "MAPE": 4.0},
    "anomalies": [
        {"ds": "2024-01-02T00:00:00", "y": 31.0, "yhat": 20.0, "yhat_lower": 18.0,
         "yhat_upper": 22.0, "severity": 11.0, "severity_level": "High"}
    ],
    "insights": ["<b>Moderate Growth</b>: steady"],
    "recommendations": ["<b>Monitor Steady Growth</b>"],
    "data": [
        {"ds": "2024-01-01T00:00:00", "yhat": 19.0, "yhat_lower": 17.0, "yhat_upper": 21.0},
        {"ds": "2024-01-02T00:00:00", "yhat": 20.0, "yhat_lower": 18.0, "yhat_upper": 22.0},
        {"ds": "2024-01-03T00:00:00", "yhat": 21.0, "yhat_lower": 19.0, "yhat_upper": 23.0}
    ]
}"#;

#[test]
fn parses_service_response() {
    let payload = parse_forecast_response(RESPONSE).unwrap();
    assert_eq!(payload.forecast.len(), 3);
    assert_eq!(payload.anomalies.len(), 1);
    assert_eq!(payload.anomalies[0].actual_value, 31.0);
    assert_eq!(payload.anomalies[0].severity_level.as_deref(), Some("High"));
    assert_eq!(payload.metrics.mape, 4.0);
    assert_eq!(payload.row_count, Some(120));
    assert_eq!(payload.recommendations.len(), 1);

    let series = TimeSeriesAligner::align(&payload.forecast, &payload.anomalies);
    let flagged: Vec<bool> = series.points().iter().map(|p| p.is_anomaly()).collect();
    assert_eq!(flagged, vec![false, true, false]);
}

#[test]
fn accepts_camel_case_and_forecast_key() {
    let body = r#"{
        "forecast": [{"ds": 86400000, "yhat": 1.0, "yhat_lower": 0.0, "yhat_upper": 2.0}],
        "anomalies": [{"ds": 86400000, "actualValue": 5.0, "severityLevel": "low"}]
    }"#;
    let payload = parse_forecast_response(body).unwrap();
    assert_eq!(payload.forecast[0].ds, DateLike::Millis(86_400_000));
    assert_eq!(payload.anomalies[0].actual_value, 5.0);
    assert_eq!(payload.anomalies[0].severity_level.as_deref(), Some("low"));
}

#[test]
fn missing_sections_default_to_empty() {
    let payload = parse_forecast_response("{}").unwrap();
    assert!(payload.forecast.is_empty());
    assert!(payload.anomalies.is_empty());
    assert!(payload.insights.is_empty());
    assert_eq!(payload.message, None);
}

#[test]
fn malformed_rows_are_skipped() {
    let body = r#"{
        "data": [
            {"ds": "2024-01-01", "yhat": 1.0, "yhat_lower": 0.0, "yhat_upper": 2.0},
            {"ds": "2024-01-02"},
            42
        ],
        "anomalies": [{"ds": "2024-01-01", "y": "n/a"}],
        "insights": "not a list",
        "row_count": "many"
    }"#;
    let payload = parse_forecast_response(body).unwrap();
    assert_eq!(payload.forecast.len(), 1);
    assert!(payload.anomalies.is_empty());
    assert!(payload.insights.is_empty());
    assert_eq!(payload.row_count, None);
}

#[test]
fn severity_is_optional() {
    let body = r#"{"anomalies": [{"ds": "2024-01-01", "y": 3.0}]}"#;
    let payload = parse_forecast_response(body).unwrap();
    assert_eq!(payload.anomalies[0].severity_level, None);
}

#[test]
fn rejects_non_object_bodies() {
    for body in ["", "null", "[]", "\"data\"", "{\"data\": "] {
        assert!(matches!(parse_forecast_response(body), Err(AppError::Parse(_))), "{body:?}");
    }
}
