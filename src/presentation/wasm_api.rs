use gloo::utils::format::JsValueSerdeExt;
use js_sys::{Function, Promise, Uint8Array};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Blob, File};

use crate::application::{ChartConfig, ChartSession, ForecastChartService, LoadForecastUseCase};
use crate::domain::{
    errors::AppError,
    events::DomainEvent,
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::{dto::parse_forecast_response, ForecastApiClient, NamedDataset};
use crate::infrastructure::rendering::ChartGeometry;

type SharedLoader = Rc<RefCell<LoadForecastUseCase<ForecastApiClient>>>;

/// JavaScript handle to one forecast chart session.
///
/// Thin bridge: parsing, alignment and viewport logic live in the
/// application layer; this type only converts to and from JS values.
#[wasm_bindgen]
pub struct ForecastChartApi {
    session: ChartSession,
    loader: SharedLoader,
}

impl Default for ForecastChartApi {
    fn default() -> Self {
        Self::with_config(ChartConfig::default())
    }
}

impl ForecastChartApi {
    fn with_config(config: ChartConfig) -> Self {
        let client = ForecastApiClient::new(config.api_base_url.clone());
        Self {
            session: ChartSession::new(ForecastChartService::new(config)),
            loader: Rc::new(RefCell::new(LoadForecastUseCase::new(client))),
        }
    }

    fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
        serde_json::to_string(value).map_err(|e| to_js_error(AppError::from(e)))
    }
}

#[wasm_bindgen]
impl ForecastChartApi {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration with camelCase JSON; missing keys keep defaults
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(&self, json: &str) -> Result<(), JsValue> {
        let config: ChartConfig = serde_json::from_str(json).map_err(|e| to_js_error(AppError::from(e)))?;
        self.loader.borrow_mut().cancel();
        *self.loader.borrow_mut() = LoadForecastUseCase::new(ForecastApiClient::new(config.api_base_url.clone()));
        self.session.update(|service| service.set_config(config));
        Ok(())
    }

    /// Load a forecast response body; resolves to whether the series was realigned
    #[wasm_bindgen(js_name = loadForecastJson)]
    pub fn load_forecast_json(&self, json: &str) -> Result<bool, JsValue> {
        let payload = parse_forecast_response(json).map_err(to_js_error)?;
        Ok(self.session.update(|service| service.load_payload(payload)))
    }

    /// Upload a dataset to the forecasting service and load the result.
    ///
    /// Starting another fetch rejects this one's promise with an abort error.
    #[wasm_bindgen(js_name = fetchForecast)]
    pub fn fetch_forecast(&self, file: File) -> Promise {
        let request = self.session.read().config().forecast_request();
        let dataset = NamedDataset::new(Blob::from(file.clone()), file.name());
        let fetch = self.loader.borrow_mut().fetch_forecast(dataset, request);
        let session = self.session.clone();

        future_to_promise(async move {
            let payload = fetch.await.map_err(to_js_error)?;
            let realigned = session.update(|service| service.load_payload(payload));
            Ok(JsValue::from_bool(realigned))
        })
    }

    /// Download the PDF report for a dataset; resolves to a `Uint8Array`
    #[wasm_bindgen(js_name = fetchReport)]
    pub fn fetch_report(&self, file: File) -> Promise {
        let request = self.session.read().config().forecast_request();
        let dataset = NamedDataset::new(Blob::from(file.clone()), file.name());
        let fetch = self.loader.borrow_mut().fetch_report(dataset, request);

        future_to_promise(async move {
            let bytes = fetch.await.map_err(to_js_error)?;
            Ok(Uint8Array::from(bytes.as_slice()).into())
        })
    }

    #[wasm_bindgen(js_name = cancelFetch)]
    pub fn cancel_fetch(&self) {
        self.loader.borrow_mut().cancel();
    }

    /// Apply a brush selection; out-of-range ends are clamped, inverted ranges ignored
    #[wasm_bindgen(js_name = selectRange)]
    pub fn select_range(&self, start: f64, end: f64) -> bool {
        self.session.update(|service| service.select_range(start as i64, end as i64).is_ok())
    }

    /// Buffer a brush event until `flushSelections`
    #[wasm_bindgen(js_name = queueSelection)]
    pub fn queue_selection(&self, start: f64, end: f64) {
        self.session.update(|service| service.queue_selection(start as i64, end as i64));
    }

    #[wasm_bindgen(js_name = flushSelections)]
    pub fn flush_selections(&self) -> Result<String, JsValue> {
        let state = self.session.update(|service| service.flush_selections());
        Self::to_json(&state)
    }

    #[wasm_bindgen(js_name = resetRange)]
    pub fn reset_range(&self) {
        self.session.update(|service| service.reset_range());
    }

    #[wasm_bindgen(js_name = visibleDomainJson)]
    pub fn visible_domain_json(&self) -> Result<String, JsValue> {
        Self::to_json(&self.session.read().visible_domain())
    }

    #[wasm_bindgen(js_name = valueDomainJson)]
    pub fn value_domain_json(&self) -> Result<String, JsValue> {
        Self::to_json(&self.session.read().value_domain())
    }

    #[wasm_bindgen(js_name = visibleLayersJson)]
    pub fn visible_layers_json(&self) -> Result<String, JsValue> {
        Self::to_json(&self.session.read().layers())
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.session.read().series().len()
    }

    #[wasm_bindgen(js_name = anomalyCount)]
    pub fn anomaly_count(&self) -> usize {
        self.session.read().series().anomaly_count()
    }

    /// Session summary as a plain JS object
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        JsValue::from_serde(&self.session.read().stats()).map_err(|e| to_js_error(AppError::from(e)))
    }

    /// Metrics, insights and recommendations from the last loaded response
    pub fn annotations(&self) -> Result<JsValue, JsValue> {
        let service = self.session.read();
        let annotations = Annotations {
            metrics: service.metrics(),
            insights: service.insights(),
            recommendations: service.recommendations(),
            message: service.message(),
        };
        JsValue::from_serde(&annotations).map_err(|e| to_js_error(AppError::from(e)))
    }

    /// Clip-space trend line vertices (`[x, y]` f32 pairs)
    #[wasm_bindgen(js_name = trendBuffer)]
    pub fn trend_buffer(&self) -> Vec<u8> {
        self.geometry().trend_bytes().to_vec()
    }

    /// Confidence band triangle strip (`[x, y, edge, pad]` f32 quads)
    #[wasm_bindgen(js_name = bandBuffer)]
    pub fn band_buffer(&self) -> Vec<u8> {
        self.geometry().band_bytes().to_vec()
    }

    /// Marker instances (`[x, y, radius, pad, r, g, b, a]` f32 octets)
    #[wasm_bindgen(js_name = markerBuffer)]
    pub fn marker_buffer(&self) -> Vec<u8> {
        self.geometry().marker_bytes().to_vec()
    }

    /// Register a callback receiving the type name of every chart event.
    ///
    /// Callbacks run after the change is applied and may query this object.
    #[wasm_bindgen(js_name = onChartEvent)]
    pub fn on_chart_event(&self, callback: Function) {
        self.session.subscribe(move |event| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(event.event_type())) {
                get_logger().warn(
                    LogComponent::Presentation("ForecastChartApi"),
                    &format!("Chart event callback failed: {:?}", err),
                );
            }
        });
    }
}

impl ForecastChartApi {
    fn geometry(&self) -> ChartGeometry {
        ChartGeometry::from_layers(&self.session.read().layers())
    }
}

#[derive(Serialize)]
struct Annotations<'a> {
    metrics: crate::domain::forecast::ForecastMetrics,
    insights: &'a [String],
    recommendations: &'a [String],
    message: Option<&'a str>,
}

fn to_js_error(err: AppError) -> JsValue {
    get_logger().error(LogComponent::Presentation("ForecastChartApi"), &err.to_string());
    JsValue::from_str(&err.to_string())
}
