use crate::{
    application::chart_service::ForecastChartService,
    domain::events::{ChartEvent, EventDispatcher, InMemoryEventDispatcher},
};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Shared handle to one chart session.
///
/// Mutations go through [`ChartSession::update`]; the events they produce are
/// delivered once the session borrow has been released, so a handler may read
/// the session or start another update.
#[derive(Clone, Default)]
pub struct ChartSession {
    service: Rc<RefCell<ForecastChartService>>,
    dispatcher: Rc<RefCell<InMemoryEventDispatcher>>,
}

impl ChartSession {
    pub fn new(service: ForecastChartService) -> Self {
        Self { service: Rc::new(RefCell::new(service)), dispatcher: Rc::default() }
    }

    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&ChartEvent) + 'static,
    {
        self.dispatcher.borrow_mut().subscribe_to_chart_events(handler);
    }

    pub fn read(&self) -> Ref<'_, ForecastChartService> {
        self.service.borrow()
    }

    pub fn update<R>(&self, change: impl FnOnce(&mut ForecastChartService) -> R) -> R {
        let (result, events) = {
            let mut service = self.service.borrow_mut();
            let result = change(&mut service);
            (result, service.drain_events())
        };
        if !events.is_empty() {
            // snapshot, so a handler may subscribe without a borrow conflict
            let dispatcher = self.dispatcher.borrow().clone();
            for event in events {
                dispatcher.publish_chart_event(event);
            }
        }
        result
    }
}
