use chrono::Utc;
use std::sync::Arc;

use crate::models::{Contract, Payment, PaymentStatus, ProfileChanges, TenantSummary};
use crate::services::{ServiceError, Store};

/// Everything a tenant sees on their landing page.
#[derive(Debug, Clone)]
pub struct TenantDashboard {
    pub profile: TenantSummary,
    pub active_contract: Option<Contract>,
    pub pending_payments: Vec<Payment>,
    pub open_incidents: i64,
    pub unread_notifications: i64,
}

#[derive(Clone)]
pub struct TenantService {
    store: Arc<dyn Store>,
}

impl TenantService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn profile(&self, user_id: i64) -> Result<TenantSummary, ServiceError> {
        self.store
            .tenant_summary_by_user(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<TenantSummary, ServiceError> {
        if changes.is_empty() {
            return self.profile(user_id).await;
        }

        if let Some(email) = &changes.email {
            if let Some(existing) = self.store.find_user_by_email(email).await? {
                if existing.id != user_id {
                    return Err(ServiceError::EmailTaken);
                }
            }
        }

        let profile = self
            .store
            .update_profile(user_id, changes)
            .await?
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?;

        tracing::info!(user_id, tenant_id = profile.id, "Tenant profile updated");
        Ok(profile)
    }

    pub async fn dashboard(&self, user_id: i64) -> Result<TenantDashboard, ServiceError> {
        let profile = self.profile(user_id).await?;
        let today = Utc::now().date_naive();

        let active_contract = self.store.active_contract(profile.id).await?;
        let pending_payments = self
            .store
            .list_tenant_payments(profile.id)
            .await?
            .into_iter()
            .filter(|p| p.effective_status(today) != PaymentStatus::Paid)
            .collect();
        let open_incidents = self.store.count_open_incidents(profile.id).await?;
        let unread_notifications = self.store.count_unread(user_id).await?;

        Ok(TenantDashboard {
            profile,
            active_contract,
            pending_payments,
            open_incidents,
            unread_notifications,
        })
    }
}
