use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::incident::{
    IncidentEnvelope, IncidentListResponse, ReportIncidentRequest, UpdateIncidentRequest,
};
use crate::middleware::AuthUser;
use crate::models::Incident;
use crate::utils::ValidatedJson;
use crate::AppState;

fn list_body(incidents: Vec<Incident>) -> Json<IncidentListResponse> {
    Json(IncidentListResponse {
        incidencias: incidents.into_iter().map(Into::into).collect(),
    })
}

/// Incidents reported by the calling owner's tenants
#[utoipa::path(
    get,
    path = "/incidencias",
    responses(
        (status = 200, description = "Incidents", body = IncidentListResponse),
        (status = 403, description = "Owners only", body = ErrorResponse)
    ),
    tag = "Incidents",
    security(("bearer_auth" = []))
)]
pub async fn list_owner_incidents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<IncidentListResponse>, AppError> {
    let incidents = state.incident_service.list_for_owner(user.id).await?;
    Ok(list_body(incidents))
}

/// Change status, priority or provider of an incident
#[utoipa::path(
    patch,
    path = "/incidencias/{id}",
    params(("id" = i64, Path, description = "Incident id")),
    request_body = UpdateIncidentRequest,
    responses(
        (status = 200, description = "Incident updated", body = IncidentEnvelope),
        (status = 404, description = "Incident not found", body = ErrorResponse)
    ),
    tag = "Incidents",
    security(("bearer_auth" = []))
)]
pub async fn update_incident(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateIncidentRequest>,
) -> Result<Json<IncidentEnvelope>, AppError> {
    let incident = state
        .incident_service
        .update(user.id, id, req.into())
        .await?;
    Ok(Json(IncidentEnvelope {
        incidencia: incident.into(),
    }))
}

/// Incidents of the calling tenant
#[utoipa::path(
    get,
    path = "/tenant/incidents",
    responses(
        (status = 200, description = "Own incidents", body = IncidentListResponse),
        (status = 404, description = "No tenant profile", body = ErrorResponse)
    ),
    tag = "Tenant",
    security(("bearer_auth" = []))
)]
pub async fn list_tenant_incidents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<IncidentListResponse>, AppError> {
    let incidents = state.incident_service.list_for_tenant(user.id).await?;
    Ok(list_body(incidents))
}

/// Report a maintenance incident
#[utoipa::path(
    post,
    path = "/tenant/incidents",
    request_body = ReportIncidentRequest,
    responses(
        (status = 201, description = "Incident reported", body = IncidentEnvelope),
        (status = 400, description = "Description too short", body = ErrorResponse),
        (status = 404, description = "No tenant profile", body = ErrorResponse)
    ),
    tag = "Tenant",
    security(("bearer_auth" = []))
)]
pub async fn report_incident(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<ReportIncidentRequest>,
) -> Result<(StatusCode, Json<IncidentEnvelope>), AppError> {
    let incident = state
        .incident_service
        .report(user.id, req.descripcion, req.prioridad)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(IncidentEnvelope {
            incidencia: incident.into(),
        }),
    ))
}
