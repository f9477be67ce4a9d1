use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::models::{
    check_amount, Contract, NewContract, NewNotification, NotificationType, Priority,
};
use crate::services::{NotificationService, ServiceError, Store};

#[derive(Debug, Clone)]
pub struct ContractRequest {
    pub tenant_id: i64,
    pub property_label: String,
    pub monthly_rent: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ContractService {
    store: Arc<dyn Store>,
    notifications: NotificationService,
}

impl ContractService {
    pub fn new(store: Arc<dyn Store>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub async fn create(
        &self,
        owner_id: i64,
        request: ContractRequest,
    ) -> Result<Contract, ServiceError> {
        check_amount(request.monthly_rent)
            .map_err(|msg| ServiceError::Validation(msg.to_string()))?;
        if request.end_date.is_some_and(|end| end < request.start_date) {
            return Err(ServiceError::Validation(
                "La fecha de fin no puede ser anterior a la de inicio".to_string(),
            ));
        }

        let tenant = self
            .store
            .find_tenant_by_id(request.tenant_id)
            .await?
            .filter(|t| t.owner_id == owner_id)
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?;

        let contract = self
            .store
            .insert_contract(NewContract {
                owner_id,
                tenant_id: tenant.id,
                property_label: request.property_label,
                monthly_rent: request.monthly_rent,
                start_date: request.start_date,
                end_date: request.end_date,
            })
            .await?;

        tracing::info!(contract_id = contract.id, owner_id, tenant_id = tenant.id, "Contract created");

        self.notifications
            .notify(NewNotification {
                recipient_id: tenant.user_id,
                title: "Nuevo contrato".to_string(),
                message: format!("Se registró su contrato para {}", contract.property_label),
                notification_type: NotificationType::Contract,
                priority: Priority::Medium,
            })
            .await;

        Ok(contract)
    }

    pub async fn list(&self, owner_id: i64) -> Result<Vec<Contract>, ServiceError> {
        self.store.list_contracts(owner_id).await
    }
}
