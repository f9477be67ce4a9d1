use chrono::Utc;
use std::sync::Arc;

use crate::models::{
    incident::MIN_DESCRIPTION_LEN, Incident, IncidentChanges, IncidentStatus, NewIncident,
    NewNotification, NotificationType, Priority,
};
use crate::services::{metrics, NotificationService, ServiceError, Store};

#[derive(Clone)]
pub struct IncidentService {
    store: Arc<dyn Store>,
    notifications: NotificationService,
}

fn status_label(status: IncidentStatus) -> &'static str {
    match status {
        IncidentStatus::Open => "abierta",
        IncidentStatus::Assigned => "asignada",
        IncidentStatus::Resolved => "resuelta",
    }
}

impl IncidentService {
    pub fn new(store: Arc<dyn Store>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Tenant reports an incident; their owner is notified.
    pub async fn report(
        &self,
        user_id: i64,
        description: String,
        priority: Option<Priority>,
    ) -> Result<Incident, ServiceError> {
        let description = description.trim().to_string();
        if description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(ServiceError::Validation(format!(
                "La descripción debe tener al menos {} caracteres",
                MIN_DESCRIPTION_LEN
            )));
        }

        let tenant = self
            .store
            .find_tenant_by_user(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?;

        let incident = self
            .store
            .insert_incident(NewIncident {
                tenant_id: tenant.id,
                description,
                priority: priority.unwrap_or_default(),
            })
            .await?;

        metrics::record_incident("reported");
        tracing::info!(incident_id = incident.id, tenant_id = tenant.id, priority = incident.priority.as_str(), "Incident reported");

        self.notifications
            .notify(NewNotification {
                recipient_id: tenant.owner_id,
                title: "Nueva incidencia".to_string(),
                message: incident.description.clone(),
                notification_type: NotificationType::IncidentUpdate,
                priority: incident.priority,
            })
            .await;

        Ok(incident)
    }

    pub async fn list_for_tenant(&self, user_id: i64) -> Result<Vec<Incident>, ServiceError> {
        let tenant = self
            .store
            .find_tenant_by_user(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?;
        self.store.list_tenant_incidents(tenant.id).await
    }

    pub async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Incident>, ServiceError> {
        self.store.list_owner_incidents(owner_id).await
    }

    /// Owner updates status, priority or provider. A status change notifies the tenant.
    pub async fn update(
        &self,
        owner_id: i64,
        incident_id: i64,
        changes: IncidentChanges,
    ) -> Result<Incident, ServiceError> {
        let status_change = changes.status;

        let incident = self
            .store
            .update_incident(owner_id, incident_id, changes, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound("Incidencia no encontrada"))?;

        if incident.status == IncidentStatus::Resolved {
            metrics::record_incident("resolved");
        } else {
            metrics::record_incident("updated");
        }
        tracing::info!(incident_id, owner_id, status = incident.status.as_str(), "Incident updated");

        if let Some(status) = status_change {
            if let Some(tenant) = self.store.find_tenant_by_id(incident.tenant_id).await? {
                self.notifications
                    .notify(NewNotification {
                        recipient_id: tenant.user_id,
                        title: "Actualización de incidencia".to_string(),
                        message: format!(
                            "Su incidencia #{} ahora está {}",
                            incident.id,
                            status_label(status)
                        ),
                        notification_type: NotificationType::IncidentUpdate,
                        priority: incident.priority,
                    })
                    .await;
            }
        }

        Ok(incident)
    }
}
