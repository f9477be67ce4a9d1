use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dtos::auth::TenantResponse;
use crate::dtos::contract::ContractResponse;
use crate::dtos::payment::PaymentResponse;
use crate::models::ProfileChanges;
use crate::services::TenantDashboard;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres"))]
    pub nombre: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(length(max = 32, message = "Teléfono demasiado largo"))]
    pub telefono: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.nombre.map(|n| n.trim().to_string()),
            email: req.email,
            phone: req.telefono,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub perfil: TenantResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    pub mensaje: String,
    pub perfil: TenantResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantDashboardData {
    pub perfil: TenantResponse,
    pub contrato_activo: Option<ContractResponse>,
    pub pagos_pendientes: Vec<PaymentResponse>,
    pub incidencias_abiertas: i64,
    pub notificaciones_no_leidas: i64,
}

impl TenantDashboardData {
    pub fn new(dashboard: TenantDashboard, today: chrono::NaiveDate) -> Self {
        Self {
            perfil: dashboard.profile.into(),
            contrato_activo: dashboard.active_contract.map(Into::into),
            pagos_pendientes: PaymentResponse::list(&dashboard.pending_payments, today),
            incidencias_abiertas: dashboard.open_incidents,
            notificaciones_no_leidas: dashboard.unread_notifications,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantDashboardResponse {
    pub data: TenantDashboardData,
}
