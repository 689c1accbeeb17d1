use forecast_chart_wasm::domain::chart::{ViewportController, ViewportState};
use forecast_chart_wasm::domain::errors::DomainError;
use forecast_chart_wasm::domain::forecast::{ForecastRecord, TimeSeriesAligner, Timestamp};
use quickcheck_macros::quickcheck;

fn viewport(len: usize) -> ViewportController {
    let mut viewport = ViewportController::new();
    viewport.initialize(len);
    viewport
}

fn state(start_index: usize, end_index: usize) -> ViewportState {
    ViewportState { start_index, end_index }
}

#[test]
fn starts_at_full_range() {
    let viewport = viewport(10);
    assert_eq!(viewport.state(), Some(state(0, 9)));
    assert!(viewport.is_full_range());
}

#[test]
fn negative_start_is_clamped() {
    let mut viewport = viewport(10);
    assert_eq!(viewport.select_range(-5, 2), Ok(state(0, 2)));
    assert_eq!(viewport.state(), Some(state(0, 2)));
}

#[test]
fn end_past_data_is_clamped() {
    let mut viewport = viewport(10);
    assert_eq!(viewport.select_range(7, 400), Ok(state(7, 9)));
}

#[test]
fn inverted_range_is_rejected_and_state_kept() {
    let mut viewport = viewport(10);
    viewport.select_range(2, 5).unwrap();
    assert!(matches!(viewport.select_range(3, 1), Err(DomainError::InvalidRange { .. })));
    assert_eq!(viewport.state(), Some(state(2, 5)));
}

#[test]
fn single_point_selection_is_allowed() {
    let mut viewport = viewport(10);
    assert_eq!(viewport.select_range(4, 4), Ok(state(4, 4)));
    assert_eq!(viewport.state().map(|s| s.visible_len()), Some(1));
}

#[test]
fn empty_series_rejects_everything() {
    let mut viewport = viewport(0);
    assert!(viewport.is_auto());
    assert!(viewport.select_range(0, 0).is_err());
    assert!(viewport.is_auto());
}

#[test]
fn replaying_a_selection_is_idempotent() {
    let mut viewport = viewport(10);
    viewport.select_range(1, 3).unwrap();
    let once = viewport.clone();
    viewport.select_range(1, 3).unwrap();
    assert_eq!(viewport, once);
}

#[test]
fn reset_returns_to_full_range() {
    let mut viewport = viewport(10);
    viewport.select_range(1, 3).unwrap();
    assert!(!viewport.is_full_range());
    viewport.reset();
    assert!(viewport.is_full_range());
}

#[test]
fn time_range_selects_covering_indices() {
    let records: Vec<_> = (0..5_i64).map(|i| ForecastRecord::new(i * 100, 1.0, 0.0, 2.0)).collect();
    let series = TimeSeriesAligner::align(&records, &[]);
    let mut viewport = viewport(series.len());

    let selected = viewport.select_time_range(&series, Timestamp::from_millis(150), Timestamp::from_millis(300));
    assert_eq!(selected, Ok(state(2, 3)));
    assert!(viewport
        .select_time_range(&series, Timestamp::from_millis(1_000), Timestamp::from_millis(2_000))
        .is_err());
    assert_eq!(viewport.state(), Some(state(2, 3)));
}

#[quickcheck]
fn any_accepted_selection_is_in_bounds(len: u8, start: i64, end: i64) -> bool {
    let len = len as usize;
    let mut viewport = viewport(len);
    match viewport.select_range(start, end) {
        Ok(s) => s.start_index <= s.end_index && s.end_index < len && viewport.state() == Some(s),
        Err(_) => viewport.state() == ViewportState::full(len),
    }
}
