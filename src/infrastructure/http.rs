use crate::application::config::DEFAULT_API_BASE_URL;
use crate::domain::{
    errors::{AppError, NetworkResult},
    forecast::{ForecastPayload, ForecastRepository, ForecastRequest},
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::dto::parse_forecast_response;
use gloo_net::http::{Request, Response};
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

/// A CSV dataset picked by the user, ready for multipart upload
#[derive(Debug, Clone)]
pub struct NamedDataset {
    pub blob: Blob,
    pub file_name: String,
}

impl NamedDataset {
    pub fn new(blob: Blob, file_name: impl Into<String>) -> Self {
        Self { blob, file_name: file_name.into() }
    }

    fn form_data(&self) -> NetworkResult<FormData> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", &self.blob, &self.file_name)
            .map_err(js_error)?;
        Ok(form)
    }
}

/// HTTP client for the forecasting service
#[derive(Debug, Clone)]
pub struct ForecastApiClient {
    base_url: String,
}

impl Default for ForecastApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ForecastApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn forecast_url(&self, request: &ForecastRequest) -> String {
        format!("{}/forecast?{}", self.base_url, request.query_string())
    }

    pub fn report_url(&self, request: &ForecastRequest) -> String {
        format!("{}/report?{}", self.base_url, request.query_string())
    }

    /// Upload the dataset and parse the forecast response
    pub async fn get_forecast(
        &self,
        dataset: &NamedDataset,
        request: &ForecastRequest,
    ) -> NetworkResult<ForecastPayload> {
        let url = self.forecast_url(request);
        get_logger().info(
            LogComponent::Infrastructure("ForecastApiClient"),
            &format!("Requesting {}-day forecast for {}", request.horizon, dataset.file_name),
        );

        let response = Self::post(&url, dataset).await?;
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;
        let payload = parse_forecast_response(&body)?;

        get_logger().info(
            LogComponent::Infrastructure("ForecastApiClient"),
            &format!(
                "Received {} forecast rows and {} anomalies",
                payload.forecast.len(),
                payload.anomalies.len()
            ),
        );
        Ok(payload)
    }

    /// Download the PDF report for the same inputs as raw bytes
    pub async fn get_report(&self, dataset: &NamedDataset, request: &ForecastRequest) -> NetworkResult<Vec<u8>> {
        let url = self.report_url(request);
        let response = Self::post(&url, dataset).await?;
        let bytes = response
            .binary()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read report: {}", e)))?;
        get_logger().info(
            LogComponent::Infrastructure("ForecastApiClient"),
            &format!("Downloaded report ({} bytes)", bytes.len()),
        );
        Ok(bytes)
    }

    async fn post(url: &str, dataset: &NamedDataset) -> NetworkResult<Response> {
        let response = Request::post(url)
            .body(dataset.form_data()?)
            .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))?;

        if !response.ok() {
            return Err(AppError::Network(format!(
                "HTTP error: {} - {}",
                response.status(),
                response.status_text()
            )));
        }
        Ok(response)
    }
}

impl ForecastRepository for ForecastApiClient {
    type Dataset = NamedDataset;

    async fn fetch_forecast(&self, dataset: &NamedDataset, request: &ForecastRequest) -> NetworkResult<ForecastPayload> {
        self.get_forecast(dataset, request).await
    }

    async fn fetch_report(&self, dataset: &NamedDataset, request: &ForecastRequest) -> NetworkResult<Vec<u8>> {
        self.get_report(dataset, request).await
    }
}

fn js_error(value: JsValue) -> AppError {
    AppError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::{ForecastHorizon, GrowthMode, SeasonalityMode};

    #[test]
    fn urls_carry_request_parameters() {
        let client = ForecastApiClient::new("http://api.local/");
        let request = ForecastRequest::new(
            ForecastHorizon::new(90).unwrap(),
            SeasonalityMode::Multiplicative,
            GrowthMode::Flat,
        );
        assert_eq!(
            client.forecast_url(&request),
            "http://api.local/forecast?days=90&seasonality_mode=multiplicative&growth=flat"
        );
        assert!(client.report_url(&request).starts_with("http://api.local/report?days=90"));
    }
}
