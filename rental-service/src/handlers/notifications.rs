use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::notification::{
    MarkAllReadResponse, NotificationEnvelope, NotificationListResponse, NotificationQuery,
    SendNotificationRequest,
};
use crate::middleware::AuthUser;
use crate::utils::ValidatedJson;
use crate::AppState;

/// Own notifications, newest first, with the unread count
#[utoipa::path(
    get,
    path = "/notificaciones",
    params(NotificationQuery),
    responses((status = 200, description = "Notifications", body = NotificationListResponse)),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationListResponse>, AppError> {
    let (notifications, unread) = state
        .notification_service
        .list(user.id, query.incluir_archivadas)
        .await?;
    Ok(Json(NotificationListResponse {
        notificaciones: notifications.into_iter().map(Into::into).collect(),
        no_leidas: unread,
    }))
}

/// Send a notification to one of the calling owner's tenants
#[utoipa::path(
    post,
    path = "/notificaciones",
    request_body = SendNotificationRequest,
    responses(
        (status = 201, description = "Notification sent", body = NotificationEnvelope),
        (status = 404, description = "Recipient is not one of your tenants", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<SendNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationEnvelope>), AppError> {
    let notification = state
        .notification_service
        .send_to_tenant(
            user.id,
            req.id_usuario,
            req.titulo,
            req.mensaje,
            req.tipo.unwrap_or_default(),
            req.prioridad.unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(NotificationEnvelope {
            notificacion: notification.into(),
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/notificaciones/{id}/leer",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification read", body = NotificationEnvelope),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<NotificationEnvelope>, AppError> {
    let notification = state.notification_service.mark_read(user.id, id).await?;
    Ok(Json(NotificationEnvelope {
        notificacion: notification.into(),
    }))
}

#[utoipa::path(
    patch,
    path = "/notificaciones/leer-todas",
    responses((status = 200, description = "Unread notifications marked read", body = MarkAllReadResponse)),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated = state.notification_service.mark_all_read(user.id).await?;
    Ok(Json(MarkAllReadResponse {
        mensaje: "Notificaciones marcadas como leídas".to_string(),
        actualizadas: updated,
    }))
}

#[utoipa::path(
    patch,
    path = "/notificaciones/{id}/archivar",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification archived", body = NotificationEnvelope),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn archive(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<NotificationEnvelope>, AppError> {
    let notification = state.notification_service.archive(user.id, id).await?;
    Ok(Json(NotificationEnvelope {
        notificacion: notification.into(),
    }))
}
