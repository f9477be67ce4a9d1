use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::{Validate, ValidationError};

use crate::models::check_amount;

/// JSON body extractor that runs `validator` rules before the handler sees the value.
///
/// Both malformed JSON and rule violations answer 400.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("JSON inválido: {}", e.body_text())))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Optional JSON body: an empty body yields `None`, anything else must parse
/// and validate like [`ValidatedJson`].
pub struct OptionalJson<T>(pub Option<T>);

#[axum::async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Cuerpo inválido: {}", e.body_text())))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(None));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("JSON inválido: {}", e.body_text())))?;

        value.validate()?;

        Ok(OptionalJson(Some(value)))
    }
}

/// Amounts must be strictly positive and fit a `NUMERIC(12, 2)` column.
pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    check_amount(*value).map_err(|msg| {
        let mut err = ValidationError::new("positive_amount");
        err.message = Some(msg.into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount(&Decimal::new(1, 2)).is_ok());
        assert!(positive_amount(&Decimal::ZERO).is_err());
        assert!(positive_amount(&Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_amount_must_fit_money_column() {
        assert!(positive_amount(&Decimal::new(1250, 2)).is_ok());
        // Trailing zeros do not count as extra precision.
        assert!(positive_amount(&Decimal::new(12500, 3)).is_ok());
        assert!(positive_amount(&Decimal::new(1, 3)).is_err());
        assert!(positive_amount(&Decimal::new(12345, 3)).is_err());

        assert!(positive_amount(&Decimal::new(999_999_999_999, 2)).is_ok());
        assert!(positive_amount(&Decimal::from(10_000_000_000_i64)).is_err());
    }
}
