use super::value_objects::{ValueDomain, ViewportState, VisibleDomain};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::forecast::{AlignedPoint, AlignedSeries, Timestamp};
use crate::domain::logging::LogComponent;
use crate::log_debug;

/// Padding applied to a value axis whose visible slice is perfectly flat
const FLAT_VALUE_PADDING: f64 = 1.0;

/// Brush/viewport state machine over an aligned series.
///
/// Holds either a concrete inclusive index window or nothing at all ("auto"),
/// which is the only possible state for an empty series. Transitions are pure
/// functions of (state, event), so replaying the same selection is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportController {
    len: usize,
    state: Option<ViewportState>,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the full range of a freshly aligned series
    pub fn initialize(&mut self, len: usize) {
        self.len = len;
        self.state = ViewportState::full(len);
        log_debug!(LogComponent::Domain("Viewport"), "Initialized for {} points: {:?}", len, self.state);
    }

    pub fn reset(&mut self) {
        self.initialize(self.len);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn state(&self) -> Option<ViewportState> {
        self.state
    }

    pub fn is_auto(&self) -> bool {
        self.state.is_none()
    }

    pub fn is_full_range(&self) -> bool {
        self.state.is_some() && self.state == ViewportState::full(self.len)
    }

    /// Apply a user selection, clamping both ends into `[0, len-1]`.
    ///
    /// On `InvalidRange` the previous state is kept untouched.
    pub fn select_range(&mut self, new_start: i64, new_end: i64) -> DomainResult<ViewportState> {
        let Some(last) = self.len.checked_sub(1) else {
            return Err(DomainError::InvalidRange { start: new_start, end: new_end, len: 0 });
        };
        let last = last as i64;
        let start = new_start.clamp(0, last);
        let end = new_end.clamp(0, last);
        if start > end {
            return Err(DomainError::InvalidRange { start, end, len: self.len });
        }

        let next = ViewportState { start_index: start as usize, end_index: end as usize };
        if self.state != Some(next) {
            log_debug!(LogComponent::Domain("Viewport"), "Selection {:?} -> {:?}", self.state, next);
        }
        self.state = Some(next);
        Ok(next)
    }

    /// Select the index window covering `[from, to]` in time, inclusive
    pub fn select_time_range(
        &mut self,
        series: &AlignedSeries,
        from: Timestamp,
        to: Timestamp,
    ) -> DomainResult<ViewportState> {
        let points = series.points();
        let start = points.partition_point(|p| p.timestamp < from);
        let after_end = points.partition_point(|p| p.timestamp <= to);
        if from > to || after_end == 0 || start >= after_end {
            return Err(DomainError::InvalidRange {
                start: from.value(),
                end: to.value(),
                len: series.len(),
            });
        }
        self.select_range(start as i64, (after_end - 1) as i64)
    }

    /// Points inside the current window; empty when auto
    pub fn visible_points<'a>(&self, series: &'a AlignedSeries) -> &'a [AlignedPoint] {
        match self.state {
            Some(state) => series.slice(state.start_index, state.end_index),
            None => &[],
        }
    }

    /// Time bounds of the current window, or the `Auto` sentinel
    pub fn domain(&self, series: &AlignedSeries) -> VisibleDomain {
        let visible = self.visible_points(series);
        match (visible.first(), visible.last()) {
            (Some(first), Some(last)) => VisibleDomain::Bounds { min: first.timestamp, max: last.timestamp },
            _ => VisibleDomain::Auto,
        }
    }

    /// Dependent value-axis bounds: confidence band plus anomaly values of the
    /// visible slice, padded by `padding_ratio` of the span.
    pub fn value_domain(&self, series: &AlignedSeries, padding_ratio: f64) -> Option<ValueDomain> {
        let visible = self.visible_points(series);
        let (min, max) = visible.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            let mut lo = lo.min(p.yhat_lower).min(p.yhat);
            let mut hi = hi.max(p.yhat_upper).max(p.yhat);
            if let Some(value) = p.anomaly_value {
                lo = lo.min(value);
                hi = hi.max(value);
            }
            (lo, hi)
        });
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let span = max - min;
        let ratio = if padding_ratio.is_finite() { padding_ratio.max(0.0) } else { 0.0 };
        let padding = if span == 0.0 { FLAT_VALUE_PADDING } else { span * ratio };
        Some(ValueDomain { min: min - padding, max: max + padding })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_stays_auto() {
        let mut viewport = ViewportController::new();
        viewport.initialize(0);
        assert!(viewport.is_auto());
        assert!(viewport.select_range(0, 0).is_err());
        assert!(viewport.is_auto());
    }

    #[test]
    fn out_of_bounds_selection_collapses_to_edge() {
        let mut viewport = ViewportController::new();
        viewport.initialize(10);
        assert_eq!(
            viewport.select_range(20, 30),
            Ok(ViewportState { start_index: 9, end_index: 9 })
        );
        assert_eq!(viewport.select_range(-7, -2), Ok(ViewportState { start_index: 0, end_index: 0 }));
    }

    #[test]
    fn reset_restores_full_range() {
        let mut viewport = ViewportController::new();
        viewport.initialize(4);
        viewport.select_range(1, 2).unwrap();
        assert!(!viewport.is_full_range());
        viewport.reset();
        assert!(viewport.is_full_range());
    }

    #[test]
    fn negative_padding_never_inverts_value_axis() {
        use crate::domain::forecast::{ForecastRecord, TimeSeriesAligner};
        let series = TimeSeriesAligner::align(&[ForecastRecord::new(0_i64, 5.0, 0.0, 10.0)], &[]);
        let mut viewport = ViewportController::new();
        viewport.initialize(series.len());
        let domain = viewport.value_domain(&series, -1.0).unwrap();
        assert_eq!((domain.min, domain.max), (0.0, 10.0));
    }
}
