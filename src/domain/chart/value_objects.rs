use crate::domain::forecast::Timestamp;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - semantic color of an anomaly marker
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    #[display(fmt = "critical")]
    #[strum(serialize = "critical")]
    Critical,
    #[display(fmt = "warning")]
    #[strum(serialize = "warning")]
    Warning,
    #[display(fmt = "caution")]
    #[strum(serialize = "caution")]
    Caution,
}

impl ColorToken {
    /// Default palette used when uploading markers to the GPU
    pub fn rgba(&self) -> Color {
        match self {
            ColorToken::Critical => Color::from_hex(0xEF4444),
            ColorToken::Warning => Color::from_hex(0xF59E0B),
            ColorToken::Caution => Color::from_hex(0xEAB308),
        }
    }
}

/// Value Object - how an anomaly marker is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTier {
    pub radius: f32,
    pub color_token: ColorToken,
}

impl RenderTier {
    pub const fn new(radius: f32, color_token: ColorToken) -> Self {
        Self { radius, color_token }
    }
}

/// Value Object - selected index window into the aligned series (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub start_index: usize,
    pub end_index: usize,
}

impl ViewportState {
    pub fn full(len: usize) -> Option<Self> {
        len.checked_sub(1).map(|last| Self { start_index: 0, end_index: last })
    }

    pub fn visible_len(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Value Object - visible time domain handed to the renderer.
///
/// `Auto` is a sentinel meaning "fit the axis to whatever data exists"; it is
/// never an actual bound pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VisibleDomain {
    Auto,
    Bounds { min: Timestamp, max: Timestamp },
}

impl VisibleDomain {
    pub fn is_auto(&self) -> bool {
        matches!(self, VisibleDomain::Auto)
    }

    pub fn bounds(&self) -> Option<(Timestamp, Timestamp)> {
        match self {
            VisibleDomain::Auto => None,
            VisibleDomain::Bounds { min, max } => Some((*min, *max)),
        }
    }

    /// Saturates at `i64::MAX` for domains wider than an `i64` can hold
    pub fn span_ms(&self) -> Option<i64> {
        self.bounds().map(|(min, max)| max.value().saturating_sub(min.value()))
    }
}

/// Value Object - dependent value-axis bounds for the visible slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value into clip space [-1, 1]
    pub fn to_clip(&self, value: f64) -> f32 {
        if self.range() == 0.0 {
            return 0.0;
        }
        (((value - self.min) / self.range()) * 2.0 - 1.0) as f32
    }
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_of_empty_series_is_none() {
        assert_eq!(ViewportState::full(0), None);
        assert_eq!(ViewportState::full(3), Some(ViewportState { start_index: 0, end_index: 2 }));
    }

    #[test]
    fn auto_domain_has_no_bounds() {
        assert!(VisibleDomain::Auto.bounds().is_none());
        let bounds = VisibleDomain::Bounds { min: Timestamp::from_millis(5), max: Timestamp::from_millis(9) };
        assert_eq!(bounds.span_ms(), Some(4));
    }

    #[test]
    fn flat_value_domain_maps_to_center() {
        let domain = ValueDomain { min: 3.0, max: 3.0 };
        assert_eq!(domain.to_clip(3.0), 0.0);
    }

    #[test]
    fn span_of_full_i64_domain_saturates() {
        let wide =
            VisibleDomain::Bounds { min: Timestamp::from_millis(i64::MIN), max: Timestamp::from_millis(i64::MAX) };
        assert_eq!(wide.span_ms(), Some(i64::MAX));
    }
}
