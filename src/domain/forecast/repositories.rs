use super::entities::ForecastPayload;
use super::value_objects::ForecastRequest;
use crate::domain::errors::NetworkResult;
use std::future::Future;

/// Source of forecast payloads (the external forecasting service)
pub trait ForecastRepository {
    /// Whatever the source needs to identify the uploaded dataset
    type Dataset;

    fn fetch_forecast(
        &self,
        dataset: &Self::Dataset,
        request: &ForecastRequest,
    ) -> impl Future<Output = NetworkResult<ForecastPayload>>;

    /// Binary report artifact for the same inputs; never parsed here
    fn fetch_report(
        &self,
        dataset: &Self::Dataset,
        request: &ForecastRequest,
    ) -> impl Future<Output = NetworkResult<Vec<u8>>>;
}
