use crate::domain::chart::{RenderTier, SeverityClassifier, ValueDomain, ViewportController, VisibleDomain};
use crate::domain::forecast::{AlignedSeries, SeverityLevel, Timestamp};
use serde::Serialize;

/// One vertex of the forecast trend line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Confidence band sample (upper/lower bound pair)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandPoint {
    pub timestamp: Timestamp,
    pub lower: f64,
    pub upper: f64,
}

/// Severity-styled anomaly marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyMarker {
    pub timestamp: Timestamp,
    pub value: f64,
    pub severity_level: Option<SeverityLevel>,
    pub tier: RenderTier,
}

/// Drawable layers for the visible window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayers {
    pub domain: VisibleDomain,
    pub value_domain: Option<ValueDomain>,
    pub trend_line: Vec<TrendPoint>,
    pub confidence_band: Vec<BandPoint>,
    pub markers: Vec<AnomalyMarker>,
}

impl ChartLayers {
    pub fn is_empty(&self) -> bool {
        self.trend_line.is_empty()
    }
}

/// Turns the aligned series and the current viewport into drawable layers
pub struct ChartAssembler;

impl ChartAssembler {
    pub fn assemble(series: &AlignedSeries, viewport: &ViewportController, value_padding_ratio: f64) -> ChartLayers {
        let visible = viewport.visible_points(series);

        let trend_line = visible
            .iter()
            .map(|p| TrendPoint { timestamp: p.timestamp, value: p.yhat })
            .collect();
        let confidence_band = visible
            .iter()
            .map(|p| BandPoint { timestamp: p.timestamp, lower: p.yhat_lower, upper: p.yhat_upper })
            .collect();
        let markers = visible
            .iter()
            .filter_map(|p| {
                p.anomaly_value.map(|value| AnomalyMarker {
                    timestamp: p.timestamp,
                    value,
                    severity_level: p.severity_level.clone(),
                    tier: SeverityClassifier::classify(p.severity_level.as_ref()),
                })
            })
            .collect();

        ChartLayers {
            domain: viewport.domain(series),
            value_domain: viewport.value_domain(series, value_padding_ratio),
            trend_line,
            confidence_band,
            markers,
        }
    }
}
