use almanac_recur::Violations;
use thiserror::Error;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RecurError(#[from] almanac_recur::RecurError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Validation error: {0}")]
    ValidationError(Violations),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
