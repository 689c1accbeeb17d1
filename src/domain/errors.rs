use derive_more::Display;

/// Errors raised by the pure domain services.
///
/// None of these reach the user: the aligner drops records that fail with
/// `InvalidTimestamp` and the chart session ignores selections that fail with
/// `InvalidRange`.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum DomainError {
    #[display(fmt = "Invalid timestamp: {}", _0)]
    InvalidTimestamp(String),
    #[display(fmt = "Invalid range: start {} > end {} (len {})", start, end, len)]
    InvalidRange { start: i64, end: i64, len: usize },
    #[display(fmt = "Invalid forecast horizon: {} days (expected 1..=365)", _0)]
    InvalidHorizon(u32),
}

impl std::error::Error for DomainError {}

/// Simplified error system for the layers around the domain.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AppError {
    #[display(fmt = "Domain Error: {}", _0)]
    Domain(DomainError),
    #[display(fmt = "Network Error: {}", _0)]
    Network(String),
    #[display(fmt = "Parse Error: {}", _0)]
    Parse(String),
    #[display(fmt = "Request aborted")]
    Aborted,
}

impl std::error::Error for AppError {}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        AppError::Domain(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Parse(error.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type NetworkResult<T> = Result<T, AppError>;
