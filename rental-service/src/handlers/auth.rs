use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;

use crate::dtos::auth::{
    AuthResponse, CreateTenantRequest, DashboardResponse, LoginRequest, MeResponse,
    RegisterRequest, TenantCreatedResponse, TenantListResponse, UserResponse,
};
use crate::middleware::AuthUser;
use crate::models::Role;
use crate::services::{Dashboard, NewTenantAccount};
use crate::utils::{Password, ValidatedJson};
use crate::AppState;

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account has a different role", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let password = Password::new(req.password);
    let (user, token) = state
        .auth_service
        .login(&req.email, &password, req.rol_esperado)
        .await?;

    Ok(Json(AuthResponse {
        mensaje: "Inicio de sesión exitoso".to_string(),
        usuario: UserResponse::from(&user),
        token,
    }))
}

/// Self-register an owner account
#[utoipa::path(
    post,
    path = "/auth/registro",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Owner registered", body = AuthResponse),
        (status = 400, description = "Validation error or email taken", body = ErrorResponse),
        (status = 403, description = "Only owners may self-register", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let password = Password::new(req.password);
    let (user, token) = state
        .auth_service
        .register(
            req.nombre.trim().to_string(),
            &req.email,
            &password,
            req.rol.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            mensaje: "Usuario registrado exitosamente".to_string(),
            usuario: UserResponse::from(&user),
            token,
        }),
    ))
}

/// Create a tenant account linked to the calling owner
#[utoipa::path(
    post,
    path = "/auth/crear-inquilino",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = TenantCreatedResponse),
        (status = 400, description = "Validation error or email taken", body = ErrorResponse),
        (status = 403, description = "Owners only", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantCreatedResponse>), AppError> {
    let tenant = state
        .auth_service
        .create_tenant(
            user.id,
            NewTenantAccount {
                name: req.nombre.trim().to_string(),
                email: req.email,
                password: Password::new(req.password),
                phone: req.telefono,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TenantCreatedResponse {
            mensaje: "Inquilino creado exitosamente".to_string(),
            inquilino: tenant.into(),
        }),
    ))
}

/// Role-dependent landing data
#[utoipa::path(
    get,
    path = "/auth/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let body = match state.auth_service.dashboard(user.id, user.role).await? {
        Dashboard::Owner { total_tenants } => DashboardResponse::Owner {
            rol: Role::Owner,
            total_inquilinos: total_tenants,
        },
        Dashboard::Tenant => DashboardResponse::Tenant {
            rol: Role::Tenant,
            mensaje: format!("Bienvenido, {}", user.name),
        },
    };
    Ok(Json(body))
}

/// The authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        usuario: UserResponse {
            id: user.id,
            nombre: user.name,
            email: user.email,
            rol: user.role,
        },
    })
}

/// Tenants of the calling owner
#[utoipa::path(
    get,
    path = "/inquilinos",
    responses(
        (status = 200, description = "Tenants", body = TenantListResponse),
        (status = 403, description = "Owners only", body = ErrorResponse)
    ),
    tag = "Tenants",
    security(("bearer_auth" = []))
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TenantListResponse>, AppError> {
    let tenants = state.auth_service.list_tenants(user.id).await?;
    Ok(Json(TenantListResponse {
        inquilinos: tenants.into_iter().map(Into::into).collect(),
    }))
}
