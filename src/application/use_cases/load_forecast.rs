use crate::domain::errors::{AppError, NetworkResult};
use crate::domain::forecast::{ForecastPayload, ForecastRepository, ForecastRequest};
use crate::domain::logging::LogComponent;
use crate::log_info;
use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use std::future::Future;

/// Keeps at most one fetch in flight: tracking a new one aborts the previous.
#[derive(Debug, Default)]
pub struct FetchTracker {
    current: Option<AbortHandle>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the current fetch and hand out the registration for the next one
    pub fn register(&mut self) -> AbortRegistration {
        self.cancel();
        let (handle, registration) = AbortHandle::new_pair();
        self.current = Some(handle);
        registration
    }

    /// Wrap `fut` so that a later `track` or `cancel` aborts it
    pub fn track<F: Future>(&mut self, fut: F) -> Abortable<F> {
        Abortable::new(fut, self.register())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            if !handle.is_aborted() {
                log_info!(LogComponent::Application("FetchTracker"), "Aborting in-flight forecast request");
                handle.abort();
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_aborted())
    }
}

/// Flatten an abortable fetch result into the application error space
pub fn settle<T>(result: Result<NetworkResult<T>, Aborted>) -> NetworkResult<T> {
    result.unwrap_or(Err(AppError::Aborted))
}

/// Fetches a forecast through a repository with last-request-wins semantics.
///
/// The returned futures own a clone of the repository, so the use case stays
/// free to start or cancel another fetch while one is pending.
pub struct LoadForecastUseCase<R: ForecastRepository + Clone> {
    repository: R,
    tracker: FetchTracker,
}

impl<R: ForecastRepository + Clone> LoadForecastUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self { repository, tracker: FetchTracker::new() }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Start a forecast fetch; any earlier fetch from this use case resolves to `Aborted`
    pub fn fetch_forecast(
        &mut self,
        dataset: R::Dataset,
        request: ForecastRequest,
    ) -> impl Future<Output = NetworkResult<ForecastPayload>> + use<R> {
        let registration = self.tracker.register();
        let repository = self.repository.clone();
        async move {
            let fetch = repository.fetch_forecast(&dataset, &request);
            settle(Abortable::new(fetch, registration).await)
        }
    }

    pub fn fetch_report(
        &mut self,
        dataset: R::Dataset,
        request: ForecastRequest,
    ) -> impl Future<Output = NetworkResult<Vec<u8>>> + use<R> {
        let registration = self.tracker.register();
        let repository = self.repository.clone();
        async move {
            let fetch = repository.fetch_report(&dataset, &request);
            settle(Abortable::new(fetch, registration).await)
        }
    }

    pub fn cancel(&mut self) {
        self.tracker.cancel();
    }

    pub fn has_pending(&self) -> bool {
        self.tracker.has_pending()
    }
}
