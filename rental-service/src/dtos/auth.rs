use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Role, TenantSummary, User};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Email inválido"))]
    #[schema(example = "olga@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    #[schema(example = "secreto123")]
    pub password: String,

    /// Role the client expects this account to have.
    #[serde(rename = "rolEsperado", default)]
    #[schema(example = "owner")]
    pub rol_esperado: Option<Role>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres"))]
    #[schema(example = "Olga Pérez")]
    pub nombre: String,

    #[validate(email(message = "Email inválido"))]
    #[schema(example = "olga@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    #[schema(example = "secreto123", min_length = 6)]
    pub password: String,

    /// Only `owner` (or `propietario`) is accepted.
    #[serde(default)]
    pub rol: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantRequest {
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres"))]
    #[schema(example = "Tomás Ruiz")]
    pub nombre: String,

    #[validate(email(message = "Email inválido"))]
    #[schema(example = "tomas@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,

    #[validate(length(max = 32, message = "Teléfono demasiado largo"))]
    #[schema(example = "+34 600 000 000")]
    pub telefono: Option<String>,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub rol: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            nombre: user.name.clone(),
            email: user.email.clone(),
            rol: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub mensaje: String,
    pub usuario: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub usuario: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
    pub id: i64,
    pub id_usuario: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub fecha_registro: DateTime<Utc>,
}

impl From<TenantSummary> for TenantResponse {
    fn from(tenant: TenantSummary) -> Self {
        Self {
            id: tenant.id,
            id_usuario: tenant.user_id,
            nombre: tenant.name,
            email: tenant.email,
            telefono: tenant.phone,
            fecha_registro: tenant.created_utc,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantCreatedResponse {
    pub mensaje: String,
    pub inquilino: TenantResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantListResponse {
    pub inquilinos: Vec<TenantResponse>,
}

/// Role-dependent dashboard payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DashboardResponse {
    Owner { rol: Role, total_inquilinos: i64 },
    Tenant { rol: Role, mensaje: String },
}
