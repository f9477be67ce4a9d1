use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;

use crate::dtos::payment::{
    CreatePaymentRequest, MarkPaidRequest, PaymentEnvelope, PaymentListResponse, PaymentResponse,
    TenantPayRequest, TenantPaymentListResponse, UpdatePaymentRequest,
};
use crate::dtos::MessageResponse;
use crate::middleware::AuthUser;
use crate::models::PaymentChanges;
use crate::utils::{OptionalJson, ValidatedJson};
use crate::AppState;

fn envelope(mensaje: &str, payment: &crate::models::Payment) -> Json<PaymentEnvelope> {
    Json(PaymentEnvelope {
        mensaje: mensaje.to_string(),
        pago: PaymentResponse::new(payment, Utc::now().date_naive()),
    })
}

/// Active payments of the calling owner with statistics
#[utoipa::path(
    get,
    path = "/pagos",
    responses(
        (status = 200, description = "Payments and statistics", body = PaymentListResponse),
        (status = 403, description = "Owners only", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PaymentListResponse>, AppError> {
    let (payments, estadisticas) = state.payment_service.list(user.id).await?;
    Ok(Json(PaymentListResponse {
        pagos: PaymentResponse::list(&payments, Utc::now().date_naive()),
        estadisticas,
    }))
}

/// Create a pending payment for a contract or tenant
#[utoipa::path(
    post,
    path = "/pagos",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment created", body = PaymentEnvelope),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Contract or tenant not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentEnvelope>), AppError> {
    let payment = state.payment_service.create(user.id, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        envelope("Pago creado exitosamente", &payment),
    ))
}

/// Edit amount, status or method of an owned payment
#[utoipa::path(
    put,
    path = "/pagos/{id}",
    params(("id" = i64, Path, description = "Payment id")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated", body = PaymentEnvelope),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn update_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePaymentRequest>,
) -> Result<Json<PaymentEnvelope>, AppError> {
    let changes = PaymentChanges {
        amount: req.monto,
        status: req.estado_pago,
        method: req.metodo_pago,
    };
    let payment = state.payment_service.update(user.id, id, changes).await?;
    Ok(envelope("Pago actualizado exitosamente", &payment))
}

/// Mark a pending or overdue payment as paid
#[utoipa::path(
    patch,
    path = "/pagos/{id}/marcar-pagado",
    params(("id" = i64, Path, description = "Payment id")),
    request_body = MarkPaidRequest,
    responses(
        (status = 200, description = "Payment marked as paid", body = PaymentEnvelope),
        (status = 400, description = "Unknown payment method", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 409, description = "Payment already paid", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn mark_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    OptionalJson(body): OptionalJson<MarkPaidRequest>,
) -> Result<Json<PaymentEnvelope>, AppError> {
    let method = body.and_then(|req| req.metodo_pago);
    let payment = state.payment_service.mark_paid(user.id, id, method).await?;
    Ok(envelope("Pago marcado como pagado", &payment))
}

/// Soft-delete an owned payment
#[utoipa::path(
    delete,
    path = "/pagos/{id}",
    params(("id" = i64, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment deleted", body = MessageResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.payment_service.soft_delete(user.id, id).await?;
    Ok(Json(MessageResponse::new("Pago eliminado exitosamente")))
}

/// Active payments of the calling tenant
#[utoipa::path(
    get,
    path = "/tenant/payments",
    responses(
        (status = 200, description = "Own payments", body = TenantPaymentListResponse),
        (status = 404, description = "No tenant profile", body = ErrorResponse)
    ),
    tag = "Tenant",
    security(("bearer_auth" = []))
)]
pub async fn tenant_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TenantPaymentListResponse>, AppError> {
    let payments = state.payment_service.tenant_payments(user.id).await?;
    Ok(Json(TenantPaymentListResponse {
        pagos: PaymentResponse::list(&payments, Utc::now().date_naive()),
    }))
}

/// Pay one of the calling tenant's pending payments
#[utoipa::path(
    patch,
    path = "/tenant/payments/{id}/pay",
    params(("id" = i64, Path, description = "Payment id")),
    request_body = TenantPayRequest,
    responses(
        (status = 200, description = "Payment recorded", body = PaymentEnvelope),
        (status = 404, description = "Payment not found or already processed", body = ErrorResponse)
    ),
    tag = "Tenant",
    security(("bearer_auth" = []))
)]
pub async fn tenant_pay(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<TenantPayRequest>,
) -> Result<Json<PaymentEnvelope>, AppError> {
    let payment = state
        .payment_service
        .tenant_mark_paid(user.id, id, req.metodo_pago)
        .await?;
    Ok(envelope("Pago registrado exitosamente", &payment))
}
