use crate::{
    application::{
        config::ChartConfig,
        coordinator::{SelectionEvent, SelectionQueue},
        use_cases::{ChartAssembler, ChartLayers},
    },
    domain::{
        chart::{ValueDomain, ViewportController, ViewportState, VisibleDomain},
        errors::DomainResult,
        events::ChartEvent,
        forecast::{
            AlignedPoint, AlignedSeries, AlignmentReport, AnomalyRecord, DateLike, ForecastMetrics,
            ForecastPayload, ForecastRecord, TimeSeriesAligner, Timestamp,
        },
        logging::LogComponent,
    },
    log_debug, log_info, log_warn,
};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Application service owning one chart session: the aligned series, the
/// brush viewport over it and the service-provided annotations.
pub struct ForecastChartService {
    config: ChartConfig,
    series: AlignedSeries,
    fingerprint: Option<u64>,
    // raw records behind `fingerprint`
    input: (Vec<ForecastRecord>, Vec<AnomalyRecord>),
    report: AlignmentReport,
    viewport: ViewportController,
    pending: SelectionQueue,
    metrics: ForecastMetrics,
    insights: Vec<String>,
    recommendations: Vec<String>,
    message: Option<String>,
    outbox: Vec<ChartEvent>,
}

impl Default for ForecastChartService {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

impl ForecastChartService {
    pub fn new(config: ChartConfig) -> Self {
        let padding = config.value_padding_ratio;
        Self {
            config: config.with_value_padding_ratio(padding),
            series: AlignedSeries::empty(),
            fingerprint: None,
            input: (Vec::new(), Vec::new()),
            report: AlignmentReport::default(),
            viewport: ViewportController::new(),
            pending: SelectionQueue::new(),
            metrics: ForecastMetrics::default(),
            insights: Vec::new(),
            recommendations: Vec::new(),
            message: None,
            outbox: Vec::new(),
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ChartConfig) {
        let padding = config.value_padding_ratio;
        self.config = config.with_value_padding_ratio(padding);
    }

    /// Take the events produced since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<ChartEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Take over a full service response; returns whether the series was realigned
    pub fn load_payload(&mut self, payload: ForecastPayload) -> bool {
        let ForecastPayload { forecast, anomalies, metrics, insights, recommendations, message, row_count } =
            payload;
        if let Some(rows) = row_count {
            log_info!(LogComponent::Application("ForecastChartService"), "Service processed {} rows", rows);
        }
        self.metrics = metrics;
        self.insights = insights;
        self.recommendations = recommendations;
        self.message = message;
        self.load_records(&forecast, &anomalies)
    }

    /// Align new input. Identical input keeps the current series instance and
    /// the current viewport; anything else realigns and resets to full range.
    pub fn load_records(&mut self, forecast: &[ForecastRecord], anomalies: &[AnomalyRecord]) -> bool {
        let fingerprint = input_fingerprint(forecast, anomalies);
        if self.fingerprint == Some(fingerprint) && self.input.0 == forecast && self.input.1 == anomalies {
            log_debug!(LogComponent::Application("ForecastChartService"), "Input unchanged, reusing aligned series");
            return false;
        }

        let (series, report) = TimeSeriesAligner::align_with_report(forecast, anomalies);
        if report.dropped_forecast + report.dropped_anomalies > 0 {
            log_warn!(
                LogComponent::Application("ForecastChartService"),
                "Dropped {} forecast and {} anomaly records with unreadable dates",
                report.dropped_forecast,
                report.dropped_anomalies
            );
        }

        let old_state = self.viewport.state();
        self.series = series;
        self.fingerprint = Some(fingerprint);
        self.input = (forecast.to_vec(), anomalies.to_vec());
        self.report = report;
        self.pending.clear();
        self.viewport.initialize(self.series.len());

        log_info!(
            LogComponent::Application("ForecastChartService"),
            "Aligned {} points with {} anomalies",
            self.series.len(),
            self.series.anomaly_count()
        );
        self.outbox.push(ChartEvent::SeriesAligned {
            point_count: self.series.len(),
            anomaly_count: self.series.anomaly_count(),
            report,
        });
        self.publish_viewport_change(old_state, true);
        true
    }

    /// Apply one brush selection immediately
    pub fn select_range(&mut self, start: i64, end: i64) -> DomainResult<ViewportState> {
        let old_state = self.viewport.state();
        let result = self.viewport.select_range(start, end);
        match &result {
            Ok(_) => self.publish_viewport_change(old_state, false),
            Err(err) => self.reject_selection(start, end, err.to_string()),
        }
        result
    }

    pub fn select_time_range(&mut self, from: Timestamp, to: Timestamp) -> DomainResult<ViewportState> {
        let old_state = self.viewport.state();
        let result = self.viewport.select_time_range(&self.series, from, to);
        match &result {
            Ok(_) => self.publish_viewport_change(old_state, false),
            Err(err) => self.reject_selection(from.value(), to.value(), err.to_string()),
        }
        result
    }

    /// Buffer a selection until the next `flush_selections`
    pub fn queue_selection(&mut self, start: i64, end: i64) {
        self.pending.push(SelectionEvent::new(start, end));
    }

    pub fn pending_selections(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued selections in arrival order and publish at most one
    /// viewport change. Returns the resulting state.
    pub fn flush_selections(&mut self) -> Option<ViewportState> {
        let events = self.pending.drain();
        if events.is_empty() {
            return self.viewport.state();
        }

        let old_state = self.viewport.state();
        for SelectionEvent { start, end } in events {
            if let Err(err) = self.viewport.select_range(start, end) {
                self.reject_selection(start, end, err.to_string());
            }
        }
        self.publish_viewport_change(old_state, false);
        self.viewport.state()
    }

    pub fn reset_range(&mut self) {
        let old_state = self.viewport.state();
        self.pending.clear();
        self.viewport.reset();
        self.publish_viewport_change(old_state, false);
    }

    pub fn visible_domain(&self) -> VisibleDomain {
        self.viewport.domain(&self.series)
    }

    pub fn value_domain(&self) -> Option<ValueDomain> {
        self.viewport.value_domain(&self.series, self.config.value_padding_ratio)
    }

    pub fn visible_points(&self) -> &[AlignedPoint] {
        self.viewport.visible_points(&self.series)
    }

    pub fn layers(&self) -> ChartLayers {
        ChartAssembler::assemble(&self.series, &self.viewport, self.config.value_padding_ratio)
    }

    pub fn series(&self) -> &AlignedSeries {
        &self.series
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn report(&self) -> AlignmentReport {
        self.report
    }

    pub fn metrics(&self) -> ForecastMetrics {
        self.metrics
    }

    pub fn insights(&self) -> &[String] {
        &self.insights
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            point_count: self.series.len(),
            anomaly_count: self.series.anomaly_count(),
            visible_count: self.visible_points().len(),
            has_data: !self.series.is_empty(),
            is_full_range: self.viewport.is_full_range(),
            pending_selections: self.pending.len(),
        }
    }

    /// A fresh series always announces its viewport, since the domain moved
    /// even when the index window did not.
    fn publish_viewport_change(&mut self, old_state: Option<ViewportState>, series_changed: bool) {
        let new_state = self.viewport.state();
        if series_changed || old_state != new_state {
            let domain = self.visible_domain();
            self.outbox.push(ChartEvent::ViewportChanged {
                old_state,
                new_state,
                domain,
            });
        }
    }

    fn reject_selection(&mut self, start: i64, end: i64, reason: String) {
        log_debug!(LogComponent::Application("ForecastChartService"), "Selection rejected: {}", reason);
        self.outbox.push(ChartEvent::SelectionRejected { start, end, reason });
    }
}

/// Session summary for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub point_count: usize,
    pub anomaly_count: usize,
    pub visible_count: usize,
    pub has_data: bool,
    pub is_full_range: bool,
    pub pending_selections: usize,
}

fn hash_date(ds: &DateLike, state: &mut DefaultHasher) {
    match ds {
        DateLike::Millis(v) => (0u8, *v).hash(state),
        DateLike::Float(v) => (1u8, v.to_bits()).hash(state),
        DateLike::Text(v) => (2u8, v).hash(state),
    }
}

/// Content hash of the raw input. A match is confirmed against the stored
/// records before realignment is skipped.
fn input_fingerprint(forecast: &[ForecastRecord], anomalies: &[AnomalyRecord]) -> u64 {
    let mut state = DefaultHasher::new();
    forecast.len().hash(&mut state);
    for record in forecast {
        hash_date(&record.ds, &mut state);
        record.yhat.to_bits().hash(&mut state);
        record.yhat_lower.to_bits().hash(&mut state);
        record.yhat_upper.to_bits().hash(&mut state);
    }
    anomalies.len().hash(&mut state);
    for record in anomalies {
        hash_date(&record.ds, &mut state);
        record.actual_value.to_bits().hash(&mut state);
        record.severity_level.hash(&mut state);
    }
    state.finish()
}
