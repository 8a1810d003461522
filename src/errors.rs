use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("INVALID_RANGE: century range [{low}, {high}] has low > high")]
    InvalidRange { low: i32, high: i32 },
    #[error("DUPLICATE_POPULATION_SAMPLE: century {century} has more than one population value")]
    DuplicatePopulationSample { century: i32 },
    #[error("INVALID_POPULATION_SAMPLE: century {century} has non-finite population {value}")]
    InvalidPopulationSample { century: i32, value: f64 },
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
    #[error("IO_FAILURE: {0}")]
    Io(String),
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
