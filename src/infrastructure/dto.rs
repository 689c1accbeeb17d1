use crate::domain::{
    errors::{AppError, NetworkResult},
    forecast::{AnomalyRecord, DateLike, ForecastMetrics, ForecastPayload, ForecastRecord, GrowthMode, SeasonalityMode},
    logging::LogComponent,
};
use crate::log_warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One row of the `data` array
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRowDto {
    pub ds: DateLike,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl From<ForecastRowDto> for ForecastRecord {
    fn from(row: ForecastRowDto) -> Self {
        ForecastRecord { ds: row.ds, yhat: row.yhat, yhat_lower: row.yhat_lower, yhat_upper: row.yhat_upper }
    }
}

/// One row of the `anomalies` array; the expected-value columns are optional
#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyRowDto {
    pub ds: DateLike,
    #[serde(alias = "actual_value", alias = "actualValue")]
    pub y: f64,
    #[serde(default, alias = "severityLevel")]
    pub severity_level: Option<String>,
    #[serde(default)]
    pub yhat: Option<f64>,
    #[serde(default)]
    pub severity: Option<f64>,
}

impl From<AnomalyRowDto> for AnomalyRecord {
    fn from(row: AnomalyRowDto) -> Self {
        AnomalyRecord { ds: row.ds, actual_value: row.y, severity_level: row.severity_level }
    }
}

/// Metrics as sent; NaN metrics arrive as `null`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MetricsDto {
    #[serde(rename = "MAE", default)]
    pub mae: Option<f64>,
    #[serde(rename = "RMSE", default)]
    pub rmse: Option<f64>,
    #[serde(rename = "MAPE", default)]
    pub mape: Option<f64>,
}

impl From<MetricsDto> for ForecastMetrics {
    fn from(dto: MetricsDto) -> Self {
        ForecastMetrics {
            mae: dto.mae.unwrap_or_default(),
            rmse: dto.rmse.unwrap_or_default(),
            mape: dto.mape.unwrap_or_default(),
        }
    }
}

/// Echo of the model parameters the service used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParametersDto {
    #[serde(default)]
    pub seasonality_mode: Option<SeasonalityMode>,
    #[serde(default)]
    pub growth: Option<GrowthMode>,
}

/// Body of `POST /forecast`.
///
/// Every field is optional and every array is parsed element by element, so a
/// single malformed row costs that row only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponseDto {
    #[serde(default, alias = "forecast", deserialize_with = "lenient_vec")]
    pub data: Vec<ForecastRowDto>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub anomalies: Vec<AnomalyRowDto>,
    #[serde(default, deserialize_with = "lenient")]
    pub metrics: MetricsDto,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub insights: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub row_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub parameters: ParametersDto,
}

impl ForecastResponseDto {
    pub fn into_payload(self) -> ForecastPayload {
        ForecastPayload {
            forecast: self.data.into_iter().map(ForecastRecord::from).collect(),
            anomalies: self.anomalies.into_iter().map(AnomalyRecord::from).collect(),
            metrics: self.metrics.into(),
            insights: self.insights,
            recommendations: self.recommendations,
            message: self.message,
            row_count: self.row_count,
        }
    }
}

/// Parse a response body. Only a body that is not a JSON object fails.
pub fn parse_forecast_response(body: &str) -> NetworkResult<ForecastPayload> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(AppError::Parse(format!("expected a JSON object, got {}", json_kind(&value))));
    }
    let dto: ForecastResponseDto = serde_json::from_value(value)?;
    Ok(dto.into_payload())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Any value that does not fit `T` becomes `T::default()`
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Keep the elements that parse as `T`; `null` or a non-array is an empty list
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let total = items.len();
    let parsed: Vec<T> = items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect();
    if parsed.len() < total {
        log_warn!(
            LogComponent::Infrastructure("ForecastResponseDto"),
            "Skipped {} malformed of {} {}",
            total - parsed.len(),
            total,
            std::any::type_name::<T>().rsplit("::").next().unwrap_or("rows")
        );
    }
    Ok(parsed)
}
