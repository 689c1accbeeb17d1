use forecast_chart_wasm::application::{ChartAssembler, ForecastChartService};
use forecast_chart_wasm::domain::chart::{ViewportController, VisibleDomain};
use forecast_chart_wasm::domain::forecast::{AnomalyRecord, ForecastRecord, TimeSeriesAligner};

fn forecast() -> Vec<ForecastRecord> {
    vec![
        ForecastRecord::new(1_000_i64, 10.0, 9.0, 11.0),
        ForecastRecord::new(2_000_i64, 11.0, 10.0, 12.0),
        ForecastRecord::new(3_000_i64, 12.0, 11.0, 13.0),
    ]
}

#[test]
fn visible_layers_snapshot() {
    let mut service = ForecastChartService::default();
    service.load_records(&forecast(), &[AnomalyRecord::new(2_000_i64, 20.0, Some("Medium"))]);
    service.select_range(1, 2).unwrap();

    let json = serde_json::to_string_pretty(&service.layers()).unwrap();
    insta::assert_snapshot!(json, @r###"
    {
      "domain": {
        "kind": "bounds",
        "min": 2000,
        "max": 3000
      },
      "valueDomain": {
        "min": 9.5,
        "max": 20.5
      },
      "trendLine": [
        {
          "timestamp": 2000,
          "value": 11.0
        },
        {
          "timestamp": 3000,
          "value": 12.0
        }
      ],
      "confidenceBand": [
        {
          "timestamp": 2000,
          "lower": 10.0,
          "upper": 12.0
        },
        {
          "timestamp": 3000,
          "lower": 11.0,
          "upper": 13.0
        }
      ],
      "markers": [
        {
          "timestamp": 2000,
          "value": 20.0,
          "severityLevel": "Medium",
          "tier": {
            "radius": 6.0,
            "colorToken": "warning"
          }
        }
      ]
    }
    "###);
}

#[test]
fn unlabeled_anomaly_gets_default_marker() {
    let series = TimeSeriesAligner::align(&forecast(), &[AnomalyRecord::new(3_000_i64, 1.0, None)]);
    let mut viewport = ViewportController::new();
    viewport.initialize(series.len());

    let layers = ChartAssembler::assemble(&series, &viewport, 0.05);
    assert_eq!(layers.trend_line.len(), 3);
    assert_eq!(layers.markers.len(), 1);
    assert_eq!(layers.markers[0].severity_level, None);
    assert_eq!(layers.markers[0].tier.radius, 8.0);
}

#[test]
fn empty_series_has_no_layers() {
    let series = TimeSeriesAligner::align(&[], &[]);
    let layers = ChartAssembler::assemble(&series, &ViewportController::new(), 0.05);
    assert!(layers.is_empty());
    assert_eq!(layers.domain, VisibleDomain::Auto);
    assert_eq!(layers.value_domain, None);
    assert!(layers.markers.is_empty());
}
