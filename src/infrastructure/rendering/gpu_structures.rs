use crate::application::use_cases::ChartLayers;
use crate::domain::chart::{ValueDomain, VisibleDomain};
use crate::domain::forecast::Timestamp;
use bytemuck::{Pod, Zeroable};

/// Trend line vertex in clip space
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position_x: f32,
    pub position_y: f32,
}

/// Confidence band vertex; lower and upper edges alternate for a triangle strip
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BandVertex {
    pub position_x: f32,
    pub position_y: f32,
    /// 0.0 = lower edge, 1.0 = upper edge
    pub edge: f32,
    pub _padding: f32,
}

/// Attributes of a single anomaly marker for instanced drawing
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    pub x: f32,
    pub y: f32,
    /// Radius in CSS pixels
    pub radius: f32,
    pub _padding: f32,
    pub color: [f32; 4],
}

/// Vertex data for one frame of the visible window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartGeometry {
    pub trend: Vec<LineVertex>,
    pub band: Vec<BandVertex>,
    pub markers: Vec<MarkerInstance>,
}

/// Maps a time bound pair onto clip-space x; a single instant sits at 0
/// Offsets are taken in `i128` since the full `i64` range is a valid domain.
struct TimeScale {
    min: i128,
    span: f64,
}

impl TimeScale {
    fn new(domain: &VisibleDomain) -> Option<Self> {
        domain.bounds().map(|(min, max)| Self {
            min: i128::from(min.value()),
            span: (i128::from(max.value()) - i128::from(min.value())) as f64,
        })
    }

    fn to_clip(&self, timestamp: Timestamp) -> f32 {
        if self.span == 0.0 {
            return 0.0;
        }
        (((i128::from(timestamp.value()) - self.min) as f64 / self.span) * 2.0 - 1.0) as f32
    }
}

impl ChartGeometry {
    /// Project assembled layers into clip space; an `Auto` domain yields nothing
    pub fn from_layers(layers: &ChartLayers) -> Self {
        let (Some(x_scale), Some(y_scale)) = (TimeScale::new(&layers.domain), layers.value_domain) else {
            return Self::default();
        };
        Self::project(layers, &x_scale, &y_scale)
    }

    fn project(layers: &ChartLayers, x_scale: &TimeScale, y_scale: &ValueDomain) -> Self {
        let trend = layers
            .trend_line
            .iter()
            .map(|p| LineVertex { position_x: x_scale.to_clip(p.timestamp), position_y: y_scale.to_clip(p.value) })
            .collect();

        let band = layers
            .confidence_band
            .iter()
            .flat_map(|p| {
                let x = x_scale.to_clip(p.timestamp);
                [
                    BandVertex { position_x: x, position_y: y_scale.to_clip(p.lower), edge: 0.0, _padding: 0.0 },
                    BandVertex { position_x: x, position_y: y_scale.to_clip(p.upper), edge: 1.0, _padding: 0.0 },
                ]
            })
            .collect();

        let markers = layers
            .markers
            .iter()
            .map(|m| MarkerInstance {
                x: x_scale.to_clip(m.timestamp),
                y: y_scale.to_clip(m.value),
                radius: m.tier.radius,
                _padding: 0.0,
                color: m.tier.color_token.rgba().to_array(),
            })
            .collect();

        Self { trend, band, markers }
    }

    pub fn is_empty(&self) -> bool {
        self.trend.is_empty() && self.markers.is_empty()
    }

    pub fn trend_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.trend)
    }

    pub fn band_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.band)
    }

    pub fn marker_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::{AnomalyMarker, BandPoint, TrendPoint};
    use crate::domain::chart::SeverityClassifier;

    fn layers() -> ChartLayers {
        ChartLayers {
            domain: VisibleDomain::Bounds { min: Timestamp::from_millis(0), max: Timestamp::from_millis(100) },
            value_domain: Some(ValueDomain { min: 0.0, max: 10.0 }),
            trend_line: vec![
                TrendPoint { timestamp: Timestamp::from_millis(0), value: 0.0 },
                TrendPoint { timestamp: Timestamp::from_millis(100), value: 10.0 },
            ],
            confidence_band: vec![BandPoint { timestamp: Timestamp::from_millis(50), lower: 2.5, upper: 7.5 }],
            markers: vec![AnomalyMarker {
                timestamp: Timestamp::from_millis(50),
                value: 5.0,
                severity_level: None,
                tier: SeverityClassifier::DEFAULT,
            }],
        }
    }

    #[test]
    fn projects_into_clip_space() {
        let geometry = ChartGeometry::from_layers(&layers());
        assert_eq!(geometry.trend[0], LineVertex { position_x: -1.0, position_y: -1.0 });
        assert_eq!(geometry.trend[1], LineVertex { position_x: 1.0, position_y: 1.0 });
        assert_eq!(geometry.band.len(), 2);
        assert_eq!(geometry.band[0].position_y, -0.5);
        assert_eq!(geometry.band[1].position_y, 0.5);
        assert_eq!(geometry.markers[0].x, 0.0);
        assert_eq!(geometry.markers[0].radius, 8.0);
        assert_eq!(geometry.markers[0].color, SeverityClassifier::DEFAULT.color_token.rgba().to_array());
        assert_eq!(geometry.marker_bytes().len(), 32);
    }

    #[test]
    fn auto_domain_has_no_geometry() {
        let mut auto = layers();
        auto.domain = VisibleDomain::Auto;
        assert!(ChartGeometry::from_layers(&auto).is_empty());
    }

    #[test]
    fn full_i64_domain_projects_to_edges() {
        let mut wide = layers();
        wide.domain =
            VisibleDomain::Bounds { min: Timestamp::from_millis(i64::MIN), max: Timestamp::from_millis(i64::MAX) };
        wide.trend_line[0].timestamp = Timestamp::from_millis(i64::MIN);
        wide.trend_line[1].timestamp = Timestamp::from_millis(i64::MAX);
        let geometry = ChartGeometry::from_layers(&wide);
        assert_eq!(geometry.trend[0].position_x, -1.0);
        assert_eq!(geometry.trend[1].position_x, 1.0);
    }
}
