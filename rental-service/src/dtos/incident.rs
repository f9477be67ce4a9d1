use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Incident, IncidentChanges, IncidentStatus, Priority};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportIncidentRequest {
    #[validate(length(min = 10, max = 2000, message = "La descripción debe tener al menos 10 caracteres"))]
    #[schema(example = "Gotea el grifo de la cocina")]
    pub descripcion: String,

    /// Medium when omitted.
    pub prioridad: Option<Priority>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentRequest {
    pub estado: Option<IncidentStatus>,
    pub prioridad: Option<Priority>,
    pub id_proveedor: Option<i64>,
}

impl From<UpdateIncidentRequest> for IncidentChanges {
    fn from(req: UpdateIncidentRequest) -> Self {
        Self {
            status: req.estado,
            priority: req.prioridad,
            provider_id: req.id_proveedor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncidentResponse {
    pub id: i64,
    pub id_inquilino: i64,
    pub descripcion: String,
    pub estado: IncidentStatus,
    pub prioridad: Priority,
    pub id_proveedor: Option<i64>,
    pub fecha_resolucion: Option<DateTime<Utc>>,
    pub fecha_reporte: DateTime<Utc>,
}

impl From<Incident> for IncidentResponse {
    fn from(incident: Incident) -> Self {
        Self {
            id: incident.id,
            id_inquilino: incident.tenant_id,
            descripcion: incident.description,
            estado: incident.status,
            prioridad: incident.priority,
            id_proveedor: incident.provider_id,
            fecha_resolucion: incident.resolved_utc,
            fecha_reporte: incident.created_utc,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncidentEnvelope {
    pub incidencia: IncidentResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncidentListResponse {
    pub incidencias: Vec<IncidentResponse>,
}
