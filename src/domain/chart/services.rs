use super::value_objects::{ColorToken, RenderTier};
use crate::domain::forecast::SeverityLevel;

pub const LARGE_MARKER_RADIUS: f32 = 8.0;
pub const MEDIUM_MARKER_RADIUS: f32 = 6.0;
pub const SMALL_MARKER_RADIUS: f32 = 4.0;

/// Maps anomaly severity labels to marker tiers.
///
/// Missing or unrecognized severity falls back to the `High` tier so an
/// anomaly is never hidden because its label was unexpected.
pub struct SeverityClassifier;

impl SeverityClassifier {
    pub const HIGH: RenderTier = RenderTier::new(LARGE_MARKER_RADIUS, ColorToken::Critical);
    pub const MEDIUM: RenderTier = RenderTier::new(MEDIUM_MARKER_RADIUS, ColorToken::Warning);
    pub const LOW: RenderTier = RenderTier::new(SMALL_MARKER_RADIUS, ColorToken::Caution);
    pub const DEFAULT: RenderTier = Self::HIGH;

    pub fn classify(severity: Option<&SeverityLevel>) -> RenderTier {
        match severity {
            Some(SeverityLevel::High) => Self::HIGH,
            Some(SeverityLevel::Medium) => Self::MEDIUM,
            Some(SeverityLevel::Low) => Self::LOW,
            Some(SeverityLevel::Other(_)) | None => Self::DEFAULT,
        }
    }

    pub fn classify_label(label: &str) -> RenderTier {
        Self::classify(Some(&SeverityLevel::parse(label)))
    }
}
