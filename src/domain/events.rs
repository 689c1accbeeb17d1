use crate::domain::chart::{ViewportState, VisibleDomain};
use crate::domain::forecast::AlignmentReport;
use std::fmt::Debug;
use std::rc::Rc;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
}

/// Events emitted by a chart session
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    SeriesAligned {
        point_count: usize,
        anomaly_count: usize,
        report: AlignmentReport,
    },
    ViewportChanged {
        old_state: Option<ViewportState>,
        new_state: Option<ViewportState>,
        domain: VisibleDomain,
    },
    SelectionRejected {
        start: i64,
        end: i64,
        reason: String,
    },
}

impl DomainEvent for ChartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ChartEvent::SeriesAligned { .. } => "SeriesAligned",
            ChartEvent::ViewportChanged { .. } => "ViewportChanged",
            ChartEvent::SelectionRejected { .. } => "SelectionRejected",
        }
    }
}

/// Event dispatcher for publishing events
pub trait EventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent);
}

/// Simple in-memory event dispatcher. Clones share the same handlers.
#[derive(Default, Clone)]
pub struct InMemoryEventDispatcher {
    chart_handlers: Vec<Rc<dyn Fn(&ChartEvent)>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_to_chart_events<F>(&mut self, handler: F)
    where
        F: Fn(&ChartEvent) + 'static,
    {
        self.chart_handlers.push(Rc::new(handler));
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent) {
        for handler in &self.chart_handlers {
            handler(&event);
        }
    }
}
