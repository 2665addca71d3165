//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use readalong_common::{domain_status, AppError};
use readalong_core::DomainError;
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Application error (auth, config, etc.)
    #[error(transparent)]
    App(#[from] AppError),

    /// The service context was built without a required port
    #[error("Service context is missing {0}")]
    MissingDependency(&'static str),
}

impl ServiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::MissingDependency(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::MissingDependency(_) => "CONFIG_ERROR",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::MissingDependency(name) => {
                AppError::Config(format!("service context is missing {name}"))
            }
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
