use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Notification, NotificationStatus, NotificationType, Priority};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    /// User id of the receiving tenant.
    pub id_usuario: i64,

    #[validate(length(min = 1, max = 200, message = "El título es obligatorio"))]
    pub titulo: String,

    #[validate(length(min = 1, max = 2000, message = "El mensaje es obligatorio"))]
    pub mensaje: String,

    pub tipo: Option<NotificationType>,
    pub prioridad: Option<Priority>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    /// Include archived notifications in the listing.
    #[serde(default)]
    pub incluir_archivadas: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub titulo: String,
    pub mensaje: String,
    pub tipo: NotificationType,
    pub prioridad: Priority,
    pub estado: NotificationStatus,
    pub fecha_lectura: Option<DateTime<Utc>>,
    pub fecha_creacion: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            titulo: n.title,
            mensaje: n.message,
            tipo: n.notification_type,
            prioridad: n.priority,
            estado: n.status,
            fecha_lectura: n.read_utc,
            fecha_creacion: n.created_utc,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationEnvelope {
    pub notificacion: NotificationResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationListResponse {
    pub notificaciones: Vec<NotificationResponse>,
    pub no_leidas: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub mensaje: String,
    pub actualizadas: u64,
}
