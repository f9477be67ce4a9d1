//! Payment lifecycle: pending -> paid, with overdue derived from the due date.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::models::{
    check_amount, payment::DEFAULT_CONCEPT, MarkPaidOutcome, NewNotification, NewPayment,
    NotificationType, Payment, PaymentChanges, PaymentMethod, PaymentStatistics, Priority,
};
use crate::services::{metrics, NotificationService, ServiceError, Store};

/// Owner input for a new payment. One of `contract_id` / `tenant_id` is required.
#[derive(Debug, Clone, Default)]
pub struct PaymentRequest {
    pub contract_id: Option<i64>,
    pub tenant_id: Option<i64>,
    pub amount: Decimal,
    pub concept: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn Store>,
    notifications: NotificationService,
}

fn ensure_amount(amount: Decimal) -> Result<(), ServiceError> {
    check_amount(amount).map_err(|msg| ServiceError::Validation(msg.to_string()))
}

impl PaymentService {
    pub fn new(store: Arc<dyn Store>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub async fn create(
        &self,
        owner_id: i64,
        request: PaymentRequest,
    ) -> Result<Payment, ServiceError> {
        ensure_amount(request.amount)?;

        let tenant_id = match (request.contract_id, request.tenant_id) {
            (None, None) => {
                return Err(ServiceError::Validation(
                    "Se requiere id_contrato o id_inquilino".to_string(),
                ))
            }
            (Some(contract_id), tenant_id) => {
                let contract = self
                    .store
                    .find_contract(owner_id, contract_id)
                    .await?
                    .ok_or(ServiceError::NotFound("Contrato no encontrado"))?;
                if tenant_id.is_some_and(|t| t != contract.tenant_id) {
                    return Err(ServiceError::Validation(
                        "El inquilino no corresponde al contrato".to_string(),
                    ));
                }
                contract.tenant_id
            }
            (None, Some(tenant_id)) => {
                self.store
                    .find_tenant_by_id(tenant_id)
                    .await?
                    .filter(|t| t.owner_id == owner_id)
                    .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?
                    .id
            }
        };

        let concept = request
            .concept
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CONCEPT.to_string());

        let payment = self
            .store
            .insert_payment(NewPayment {
                owner_id,
                tenant_id: Some(tenant_id),
                contract_id: request.contract_id,
                concept,
                amount: request.amount,
                due_date: request.due_date.unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        metrics::record_payment("created");
        tracing::info!(payment_id = payment.id, owner_id, tenant_id, amount = %payment.amount, "Payment created");
        Ok(payment)
    }

    /// Active payments of an owner with their statistics.
    pub async fn list(
        &self,
        owner_id: i64,
    ) -> Result<(Vec<Payment>, PaymentStatistics), ServiceError> {
        let payments = self.store.list_payments(owner_id).await?;
        let stats = PaymentStatistics::compute(&payments, Utc::now());
        Ok((payments, stats))
    }

    pub async fn update(
        &self,
        owner_id: i64,
        payment_id: i64,
        changes: PaymentChanges,
    ) -> Result<Payment, ServiceError> {
        if let Some(amount) = changes.amount {
            ensure_amount(amount)?;
        }

        let payment = self
            .store
            .update_payment(owner_id, payment_id, changes, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound("Pago no encontrado"))?;

        metrics::record_payment("updated");
        tracing::info!(payment_id, owner_id, status = %payment.status, "Payment updated");
        Ok(payment)
    }

    /// Owner marks a pending or overdue payment as paid. Cash unless stated otherwise.
    pub async fn mark_paid(
        &self,
        owner_id: i64,
        payment_id: i64,
        method: Option<PaymentMethod>,
    ) -> Result<Payment, ServiceError> {
        let method = method.unwrap_or(PaymentMethod::Cash);

        match self
            .store
            .mark_paid(owner_id, payment_id, method, Utc::now())
            .await?
        {
            MarkPaidOutcome::Paid(payment) => {
                metrics::record_payment("paid");
                tracing::info!(payment_id, owner_id, method = %method, "Payment marked as paid");
                Ok(payment)
            }
            MarkPaidOutcome::AlreadyPaid => Err(ServiceError::AlreadyProcessed),
            MarkPaidOutcome::Missing => Err(ServiceError::NotFound("Pago no encontrado")),
        }
    }

    pub async fn soft_delete(&self, owner_id: i64, payment_id: i64) -> Result<(), ServiceError> {
        if !self
            .store
            .soft_delete_payment(owner_id, payment_id, Utc::now())
            .await?
        {
            return Err(ServiceError::NotFound("Pago no encontrado"));
        }

        metrics::record_payment("deleted");
        tracing::info!(payment_id, owner_id, "Payment deleted");
        Ok(())
    }

    /// Active payments of the calling tenant.
    pub async fn tenant_payments(&self, user_id: i64) -> Result<Vec<Payment>, ServiceError> {
        let tenant = self
            .store
            .find_tenant_by_user(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?;
        self.store.list_tenant_payments(tenant.id).await
    }

    /// Tenant pays one of their own pending payments. The owner is notified.
    pub async fn tenant_mark_paid(
        &self,
        user_id: i64,
        payment_id: i64,
        method: PaymentMethod,
    ) -> Result<Payment, ServiceError> {
        let tenant = self
            .store
            .find_tenant_by_user(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?;

        let payment = self
            .store
            .tenant_mark_paid(tenant.id, payment_id, method, Utc::now())
            .await?
            .ok_or(ServiceError::NotFoundOrAlreadyProcessed)?;

        metrics::record_payment("tenant_paid");
        tracing::info!(payment_id, tenant_id = tenant.id, method = %method, "Payment paid by tenant");

        self.notifications
            .notify(NewNotification {
                recipient_id: payment.owner_id,
                title: "Pago recibido".to_string(),
                message: format!(
                    "Se registró el pago \"{}\" por {}",
                    payment.concept, payment.amount
                ),
                notification_type: NotificationType::PaymentReceived,
                priority: Priority::Medium,
            })
            .await;

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, PaymentStatus, Role};
    use crate::services::store::{NotificationStore, UserStore};
    use crate::services::MemoryStore;

    struct Fixture {
        payments: PaymentService,
        store: Arc<MemoryStore>,
        owner_id: i64,
        tenant_id: i64,
        tenant_user_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let owner = store
            .insert_user(NewUser {
                name: "Olga".into(),
                email: "olga@example.com".into(),
                password_hash: "x".into(),
                role: Role::Owner,
            })
            .await
            .unwrap();
        let tenant = store
            .insert_tenant_account(
                NewUser {
                    name: "Tomás".into(),
                    email: "tomas@example.com".into(),
                    password_hash: "x".into(),
                    role: Role::Tenant,
                },
                owner.id,
                None,
            )
            .await
            .unwrap();

        let dyn_store: Arc<dyn Store> = store.clone();
        Fixture {
            payments: PaymentService::new(
                dyn_store.clone(),
                NotificationService::new(dyn_store),
            ),
            store,
            owner_id: owner.id,
            tenant_id: tenant.id,
            tenant_user_id: tenant.user_id,
        }
    }

    fn rent(tenant_id: i64, amount: i64) -> PaymentRequest {
        PaymentRequest {
            tenant_id: Some(tenant_id),
            amount: Decimal::from(amount),
            concept: Some("Rent".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_mark_paid() {
        let f = fixture().await;
        let payment = f.payments.create(f.owner_id, rent(f.tenant_id, 500)).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.paid_date.is_none());
        assert_eq!(payment.due_date, Utc::now().date_naive());

        let paid = f.payments.mark_paid(f.owner_id, payment.id, None).await.unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);
        assert!(paid.paid_date.is_some());
        assert_eq!(paid.method, Some(PaymentMethod::Cash));

        let again = f.payments.mark_paid(f.owner_id, payment.id, None).await;
        assert!(matches!(again, Err(ServiceError::AlreadyProcessed)));
    }

    #[tokio::test]
    async fn test_create_validations() {
        let f = fixture().await;

        let zero = f.payments.create(f.owner_id, rent(f.tenant_id, 0)).await;
        assert!(matches!(zero, Err(ServiceError::Validation(_))));

        let no_reference = f
            .payments
            .create(
                f.owner_id,
                PaymentRequest {
                    amount: Decimal::from(10),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(no_reference, Err(ServiceError::Validation(_))));

        let foreign_tenant = f.payments.create(f.owner_id + 99, rent(f.tenant_id, 10)).await;
        assert!(matches!(foreign_tenant, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_default_concept() {
        let f = fixture().await;
        let mut request = rent(f.tenant_id, 100);
        request.concept = Some("   ".into());
        let payment = f.payments.create(f.owner_id, request).await.unwrap();
        assert_eq!(payment.concept, DEFAULT_CONCEPT);
    }

    #[tokio::test]
    async fn test_tenant_payment_notifies_owner() {
        let f = fixture().await;
        let payment = f.payments.create(f.owner_id, rent(f.tenant_id, 500)).await.unwrap();

        let paid = f
            .payments
            .tenant_mark_paid(f.tenant_user_id, payment.id, PaymentMethod::BankTransfer)
            .await
            .unwrap();
        assert_eq!(paid.method, Some(PaymentMethod::BankTransfer));

        let inbox = f.store.list_notifications(f.owner_id, false).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::PaymentReceived);

        let twice = f
            .payments
            .tenant_mark_paid(f.tenant_user_id, payment.id, PaymentMethod::Cash)
            .await;
        assert!(matches!(twice, Err(ServiceError::NotFoundOrAlreadyProcessed)));
    }

    #[tokio::test]
    async fn test_update_rejects_non_positive_amount() {
        let f = fixture().await;
        let payment = f.payments.create(f.owner_id, rent(f.tenant_id, 500)).await.unwrap();

        let result = f
            .payments
            .update(
                f.owner_id,
                payment.id,
                PaymentChanges {
                    amount: Some(Decimal::from(-1)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
