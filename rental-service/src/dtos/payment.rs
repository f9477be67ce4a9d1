use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Payment, PaymentMethod, PaymentStatistics, PaymentStatus};
use crate::services::PaymentRequest;
use crate::utils::validation::positive_amount;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    pub id_contrato: Option<i64>,
    pub id_inquilino: Option<i64>,

    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = String, example = "850.00")]
    pub monto: Decimal,

    #[validate(length(max = 200, message = "Concepto demasiado largo"))]
    #[schema(example = "Renta de marzo")]
    pub concepto: Option<String>,

    /// Defaults to today.
    pub fecha_vencimiento: Option<NaiveDate>,
}

impl From<CreatePaymentRequest> for PaymentRequest {
    fn from(req: CreatePaymentRequest) -> Self {
        Self {
            contract_id: req.id_contrato,
            tenant_id: req.id_inquilino,
            amount: req.monto,
            concept: req.concepto,
            due_date: req.fecha_vencimiento,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentRequest {
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = Option<String>, example = "900.00")]
    pub monto: Option<Decimal>,
    pub estado_pago: Option<PaymentStatus>,
    pub metodo_pago: Option<PaymentMethod>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct MarkPaidRequest {
    /// Cash when omitted.
    pub metodo_pago: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TenantPayRequest {
    pub metodo_pago: PaymentMethod,
}

/// Client view of a payment. `estado_pago` reports pending payments past their due date as overdue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub id_inquilino: Option<i64>,
    pub id_contrato: Option<i64>,
    pub concepto: String,
    #[schema(value_type = String, example = "850.00")]
    pub monto: Decimal,
    pub fecha_vencimiento: NaiveDate,
    pub fecha_pago: Option<DateTime<Utc>>,
    pub estado_pago: PaymentStatus,
    pub metodo_pago: Option<PaymentMethod>,
    pub vencido: bool,
    pub fecha_creacion: DateTime<Utc>,
}

impl PaymentResponse {
    pub fn new(payment: &Payment, today: NaiveDate) -> Self {
        let estado_pago = payment.effective_status(today);
        Self {
            id: payment.id,
            id_inquilino: payment.tenant_id,
            id_contrato: payment.contract_id,
            concepto: payment.concept.clone(),
            monto: payment.amount,
            fecha_vencimiento: payment.due_date,
            fecha_pago: payment.paid_date,
            estado_pago,
            metodo_pago: payment.method,
            vencido: estado_pago == PaymentStatus::Overdue,
            fecha_creacion: payment.created_utc,
        }
    }

    pub fn list(payments: &[Payment], today: NaiveDate) -> Vec<Self> {
        payments.iter().map(|p| Self::new(p, today)).collect()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentEnvelope {
    pub mensaje: String,
    pub pago: PaymentResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentListResponse {
    pub pagos: Vec<PaymentResponse>,
    pub estadisticas: PaymentStatistics,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantPaymentListResponse {
    pub pagos: Vec<PaymentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn payment(status: PaymentStatus, due: NaiveDate) -> Payment {
        let now = Utc::now();
        Payment {
            id: 7,
            owner_id: 1,
            tenant_id: Some(2),
            contract_id: None,
            concept: "Renta".into(),
            amount: Decimal::new(85000, 2),
            due_date: due,
            paid_date: None,
            status,
            method: None,
            deleted_utc: None,
            created_utc: now,
            updated_utc: now,
        }
    }

    #[test]
    fn test_past_due_pending_reports_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let late = PaymentResponse::new(
            &payment(PaymentStatus::Pending, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            today,
        );
        assert_eq!(late.estado_pago, PaymentStatus::Overdue);
        assert!(late.vencido);

        let due_today = PaymentResponse::new(&payment(PaymentStatus::Pending, today), today);
        assert_eq!(due_today.estado_pago, PaymentStatus::Pending);
        assert!(!due_today.vencido);
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let json = serde_json::to_value(PaymentResponse::new(
            &payment(PaymentStatus::Paid, today),
            today,
        ))
        .unwrap();
        assert_eq!(json["monto"], "850.00");
        assert_eq!(json["estado_pago"], "paid");
    }

    #[test]
    fn test_create_request_rejects_non_positive_amount() {
        let req: CreatePaymentRequest =
            serde_json::from_value(serde_json::json!({"id_inquilino": 1, "monto": "0"})).unwrap();
        assert!(req.validate().is_err());

        let req: CreatePaymentRequest =
            serde_json::from_value(serde_json::json!({"id_inquilino": 1, "monto": 12.5})).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_spanish_method_aliases() {
        let req: TenantPayRequest =
            serde_json::from_value(serde_json::json!({"metodo_pago": "transferencia"})).unwrap();
        assert_eq!(req.metodo_pago, PaymentMethod::BankTransfer);
    }
}
