use axum::{extract::State, Json};
use chrono::Utc;
use service_core::error::AppError;

use crate::dtos::tenant::{
    ProfileResponse, ProfileUpdatedResponse, TenantDashboardData, TenantDashboardResponse,
    UpdateProfileRequest,
};
use crate::middleware::AuthUser;
use crate::utils::ValidatedJson;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/tenant/dashboard",
    responses(
        (status = 200, description = "Tenant landing data", body = TenantDashboardResponse),
        (status = 404, description = "No tenant profile", body = ErrorResponse)
    ),
    tag = "Tenant",
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TenantDashboardResponse>, AppError> {
    let dashboard = state.tenant_service.dashboard(user.id).await?;
    Ok(Json(TenantDashboardResponse {
        data: TenantDashboardData::new(dashboard, Utc::now().date_naive()),
    }))
}

#[utoipa::path(
    get,
    path = "/tenant/profile",
    responses(
        (status = 200, description = "Own profile", body = ProfileResponse),
        (status = 404, description = "No tenant profile", body = ErrorResponse)
    ),
    tag = "Tenant",
    security(("bearer_auth" = []))
)]
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.tenant_service.profile(user.id).await?;
    Ok(Json(ProfileResponse {
        perfil: profile.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/tenant/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdatedResponse),
        (status = 400, description = "Validation error or email taken", body = ErrorResponse),
        (status = 404, description = "No tenant profile", body = ErrorResponse)
    ),
    tag = "Tenant",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileUpdatedResponse>, AppError> {
    let profile = state
        .tenant_service
        .update_profile(user.id, req.into())
        .await?;
    Ok(Json(ProfileUpdatedResponse {
        mensaje: "Perfil actualizado exitosamente".to_string(),
        perfil: profile.into(),
    }))
}
