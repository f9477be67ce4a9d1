use service_core::error::AppError;
use thiserror::Error;

use crate::models::{Role, UnknownVariant};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Este usuario no está registrado como {}", .0.label())]
    RoleMismatch(Role),

    #[error("Solo se permite el registro de propietarios")]
    ForbiddenSelfRegistration,

    #[error("El email ya está registrado")]
    EmailTaken,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("El pago ya fue procesado")]
    AlreadyProcessed,

    #[error("Pago no encontrado o ya procesado")]
    NotFoundOrAlreadyProcessed,
}

impl From<UnknownVariant> for ServiceError {
    fn from(err: UnknownVariant) -> Self {
        ServiceError::Internal(anyhow::Error::new(err))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Database(e) => AppError::from(e),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::Validation(_) | ServiceError::EmailTaken => {
                AppError::BadRequest(anyhow::anyhow!(message))
            }
            ServiceError::InvalidCredentials => AppError::Unauthorized(anyhow::anyhow!(message)),
            ServiceError::RoleMismatch(_)
            | ServiceError::ForbiddenSelfRegistration
            | ServiceError::Forbidden(_) => AppError::Forbidden(anyhow::anyhow!(message)),
            ServiceError::NotFound(_) | ServiceError::NotFoundOrAlreadyProcessed => {
                AppError::NotFound(anyhow::anyhow!(message))
            }
            ServiceError::AlreadyProcessed => AppError::Conflict(anyhow::anyhow!(message)),
        }
    }
}
