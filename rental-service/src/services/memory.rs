//! In-memory store with the same observable semantics as the PostgreSQL store.
//!
//! Each operation takes the lock exactly once, so conditional transitions are
//! check-and-set just like the single `UPDATE ... WHERE` statements in SQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};

use crate::models::{
    lifecycle::stamp_on_entry, user::normalize_email, Contract, Incident, IncidentChanges,
    IncidentStatus, MarkPaidOutcome, NewContract, NewIncident, NewNotification, NewPayment,
    NewUser, Notification, NotificationStatus, Payment, PaymentChanges, PaymentMethod,
    PaymentStatus, ProfileChanges, Tenant, TenantSummary, User,
};
use crate::services::store::{
    ContractStore, HealthCheck, IncidentStore, NotificationStore, PaymentStore, TenantStore,
    UserStore,
};
use crate::services::ServiceError;

#[derive(Default)]
struct Tables {
    sequence: i64,
    users: Vec<User>,
    tenants: Vec<Tenant>,
    contracts: Vec<Contract>,
    payments: Vec<Payment>,
    incidents: Vec<Incident>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn email_in_use(&self, email: &str, except_user: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except_user)
    }

    fn summary(&self, tenant: &Tenant) -> Option<TenantSummary> {
        self.users
            .iter()
            .find(|u| u.id == tenant.user_id)
            .map(|user| TenantSummary {
                id: tenant.id,
                user_id: user.id,
                owner_id: tenant.owner_id,
                name: user.name.clone(),
                email: user.email.clone(),
                phone: tenant.phone.clone(),
                created_utc: tenant.created_utc,
            })
    }

    fn active_payment_mut(&mut self, payment_id: i64) -> Option<&mut Payment> {
        self.payments
            .iter_mut()
            .find(|p| p.id == payment_id && !p.is_deleted())
    }

    fn tenant_owned_by(&self, tenant_id: i64, owner_id: i64) -> bool {
        self.tenants
            .iter()
            .any(|t| t.id == tenant_id && t.owner_id == owner_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, ServiceError> {
        self.tables
            .lock()
            .map_err(|_| ServiceError::Internal(anyhow::anyhow!("memory store lock poisoned")))
    }
}

fn newest_first<T, F: Fn(&T) -> i64>(items: &mut [T], id: F) {
    items.sort_by_key(|item| std::cmp::Reverse(id(item)));
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let email = normalize_email(email);
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, ServiceError> {
        let mut tables = self.lock()?;
        let email = normalize_email(&user.email);
        if tables.email_in_use(&email, None) {
            return Err(ServiceError::EmailTaken);
        }

        let record = User {
            id: tables.next_id(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            role: user.role,
            created_utc: Utc::now(),
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn insert_tenant_account(
        &self,
        user: NewUser,
        owner_id: i64,
        phone: Option<String>,
    ) -> Result<TenantSummary, ServiceError> {
        let mut tables = self.lock()?;
        let email = normalize_email(&user.email);
        if tables.email_in_use(&email, None) {
            return Err(ServiceError::EmailTaken);
        }

        let now = Utc::now();
        let user_record = User {
            id: tables.next_id(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            role: user.role,
            created_utc: now,
        };
        let tenant = Tenant {
            id: tables.next_id(),
            user_id: user_record.id,
            owner_id,
            phone,
            created_utc: now,
        };

        tables.users.push(user_record);
        tables.tenants.push(tenant.clone());
        tables
            .summary(&tenant)
            .ok_or_else(|| ServiceError::Internal(anyhow::anyhow!("tenant user vanished")))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<TenantSummary>, ServiceError> {
        let mut tables = self.lock()?;

        let Some(tenant_idx) = tables.tenants.iter().position(|t| t.user_id == user_id) else {
            return Ok(None);
        };
        let Some(user_idx) = tables.users.iter().position(|u| u.id == user_id) else {
            return Ok(None);
        };

        let new_email = changes.email.as_deref().map(normalize_email);
        if let Some(email) = &new_email {
            if tables.email_in_use(email, Some(user_id)) {
                return Err(ServiceError::EmailTaken);
            }
        }

        let user = &mut tables.users[user_idx];
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = new_email {
            user.email = email;
        }
        if let Some(phone) = changes.phone {
            tables.tenants[tenant_idx].phone = Some(phone);
        }

        let tenant = tables.tenants[tenant_idx].clone();
        Ok(tables.summary(&tenant))
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn find_tenant_by_user(&self, user_id: i64) -> Result<Option<Tenant>, ServiceError> {
        let tables = self.lock()?;
        Ok(tables.tenants.iter().find(|t| t.user_id == user_id).cloned())
    }

    async fn find_tenant_by_id(&self, tenant_id: i64) -> Result<Option<Tenant>, ServiceError> {
        let tables = self.lock()?;
        Ok(tables.tenants.iter().find(|t| t.id == tenant_id).cloned())
    }

    async fn tenant_summary_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<TenantSummary>, ServiceError> {
        let tables = self.lock()?;
        Ok(tables
            .tenants
            .iter()
            .find(|t| t.user_id == user_id)
            .and_then(|t| tables.summary(t)))
    }

    async fn list_tenants(&self, owner_id: i64) -> Result<Vec<TenantSummary>, ServiceError> {
        let tables = self.lock()?;
        let mut tenants: Vec<TenantSummary> = tables
            .tenants
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .filter_map(|t| tables.summary(t))
            .collect();
        newest_first(&mut tenants, |t| t.id);
        Ok(tenants)
    }

    async fn count_tenants(&self, owner_id: i64) -> Result<i64, ServiceError> {
        let tables = self.lock()?;
        Ok(tables.tenants.iter().filter(|t| t.owner_id == owner_id).count() as i64)
    }
}

#[async_trait]
impl ContractStore for MemoryStore {
    async fn insert_contract(&self, contract: NewContract) -> Result<Contract, ServiceError> {
        let mut tables = self.lock()?;
        let record = Contract {
            id: tables.next_id(),
            owner_id: contract.owner_id,
            tenant_id: contract.tenant_id,
            property_label: contract.property_label,
            monthly_rent: contract.monthly_rent,
            start_date: contract.start_date,
            end_date: contract.end_date,
            active: true,
            created_utc: Utc::now(),
        };
        tables.contracts.push(record.clone());
        Ok(record)
    }

    async fn find_contract(
        &self,
        owner_id: i64,
        contract_id: i64,
    ) -> Result<Option<Contract>, ServiceError> {
        let tables = self.lock()?;
        Ok(tables
            .contracts
            .iter()
            .find(|c| c.id == contract_id && c.owner_id == owner_id)
            .cloned())
    }

    async fn list_contracts(&self, owner_id: i64) -> Result<Vec<Contract>, ServiceError> {
        let tables = self.lock()?;
        let mut contracts: Vec<Contract> = tables
            .contracts
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut contracts, |c| c.id);
        Ok(contracts)
    }

    async fn active_contract(&self, tenant_id: i64) -> Result<Option<Contract>, ServiceError> {
        let tables = self.lock()?;
        Ok(tables
            .contracts
            .iter()
            .filter(|c| c.tenant_id == tenant_id && c.active)
            .max_by_key(|c| c.id)
            .cloned())
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, ServiceError> {
        let mut tables = self.lock()?;
        let now = Utc::now();
        let record = Payment {
            id: tables.next_id(),
            owner_id: payment.owner_id,
            tenant_id: payment.tenant_id,
            contract_id: payment.contract_id,
            concept: payment.concept,
            amount: payment.amount,
            due_date: payment.due_date,
            paid_date: None,
            status: PaymentStatus::Pending,
            method: None,
            deleted_utc: None,
            created_utc: now,
            updated_utc: now,
        };
        tables.payments.push(record.clone());
        Ok(record)
    }

    async fn find_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
    ) -> Result<Option<Payment>, ServiceError> {
        let tables = self.lock()?;
        Ok(tables
            .payments
            .iter()
            .find(|p| p.id == payment_id && p.owner_id == owner_id && !p.is_deleted())
            .cloned())
    }

    async fn list_payments(&self, owner_id: i64) -> Result<Vec<Payment>, ServiceError> {
        let tables = self.lock()?;
        let mut payments: Vec<Payment> = tables
            .payments
            .iter()
            .filter(|p| p.owner_id == owner_id && !p.is_deleted())
            .cloned()
            .collect();
        newest_first(&mut payments, |p| p.id);
        Ok(payments)
    }

    async fn list_tenant_payments(&self, tenant_id: i64) -> Result<Vec<Payment>, ServiceError> {
        let tables = self.lock()?;
        let mut payments: Vec<Payment> = tables
            .payments
            .iter()
            .filter(|p| p.tenant_id == Some(tenant_id) && !p.is_deleted())
            .cloned()
            .collect();
        newest_first(&mut payments, |p| p.id);
        Ok(payments)
    }

    async fn update_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
        changes: PaymentChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Payment>, ServiceError> {
        let mut tables = self.lock()?;
        let Some(payment) = tables
            .active_payment_mut(payment_id)
            .filter(|p| p.owner_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(amount) = changes.amount {
            payment.amount = amount;
        }
        if let Some(status) = changes.status {
            payment.status = status;
        }
        if let Some(method) = changes.method {
            payment.method = Some(method);
        }
        payment.paid_date = stamp_on_entry(
            payment.paid_date,
            payment.status == PaymentStatus::Paid,
            now,
        );
        payment.updated_utc = now;

        Ok(Some(payment.clone()))
    }

    async fn mark_paid(
        &self,
        owner_id: i64,
        payment_id: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<MarkPaidOutcome, ServiceError> {
        let mut tables = self.lock()?;
        let Some(payment) = tables
            .active_payment_mut(payment_id)
            .filter(|p| p.owner_id == owner_id)
        else {
            return Ok(MarkPaidOutcome::Missing);
        };

        if payment.status == PaymentStatus::Paid {
            return Ok(MarkPaidOutcome::AlreadyPaid);
        }

        payment.status = PaymentStatus::Paid;
        payment.method = Some(method);
        payment.paid_date = stamp_on_entry(payment.paid_date, true, now);
        payment.updated_utc = now;

        Ok(MarkPaidOutcome::Paid(payment.clone()))
    }

    async fn tenant_mark_paid(
        &self,
        tenant_id: i64,
        payment_id: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Option<Payment>, ServiceError> {
        let mut tables = self.lock()?;
        let Some(payment) = tables.active_payment_mut(payment_id).filter(|p| {
            p.tenant_id == Some(tenant_id) && p.status == PaymentStatus::Pending
        }) else {
            return Ok(None);
        };

        payment.status = PaymentStatus::Paid;
        payment.method = Some(method);
        payment.paid_date = stamp_on_entry(payment.paid_date, true, now);
        payment.updated_utc = now;

        Ok(Some(payment.clone()))
    }

    async fn soft_delete_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let mut tables = self.lock()?;
        match tables
            .active_payment_mut(payment_id)
            .filter(|p| p.owner_id == owner_id)
        {
            Some(payment) => {
                payment.deleted_utc = Some(now);
                payment.updated_utc = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl IncidentStore for MemoryStore {
    async fn insert_incident(&self, incident: NewIncident) -> Result<Incident, ServiceError> {
        let mut tables = self.lock()?;
        let now = Utc::now();
        let record = Incident {
            id: tables.next_id(),
            tenant_id: incident.tenant_id,
            description: incident.description,
            status: IncidentStatus::Open,
            priority: incident.priority,
            provider_id: None,
            resolved_utc: None,
            created_utc: now,
            updated_utc: now,
        };
        tables.incidents.push(record.clone());
        Ok(record)
    }

    async fn list_tenant_incidents(&self, tenant_id: i64) -> Result<Vec<Incident>, ServiceError> {
        let tables = self.lock()?;
        let mut incidents: Vec<Incident> = tables
            .incidents
            .iter()
            .filter(|i| i.tenant_id == tenant_id)
            .cloned()
            .collect();
        newest_first(&mut incidents, |i| i.id);
        Ok(incidents)
    }

    async fn list_owner_incidents(&self, owner_id: i64) -> Result<Vec<Incident>, ServiceError> {
        let tables = self.lock()?;
        let mut incidents: Vec<Incident> = tables
            .incidents
            .iter()
            .filter(|i| tables.tenant_owned_by(i.tenant_id, owner_id))
            .cloned()
            .collect();
        newest_first(&mut incidents, |i| i.id);
        Ok(incidents)
    }

    async fn update_incident(
        &self,
        owner_id: i64,
        incident_id: i64,
        changes: IncidentChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Incident>, ServiceError> {
        let mut tables = self.lock()?;
        let Some(idx) = tables.incidents.iter().position(|i| i.id == incident_id) else {
            return Ok(None);
        };
        if !tables.tenant_owned_by(tables.incidents[idx].tenant_id, owner_id) {
            return Ok(None);
        }

        let incident = &mut tables.incidents[idx];
        if let Some(status) = changes.status {
            incident.status = status;
        }
        if let Some(priority) = changes.priority {
            incident.priority = priority;
        }
        if let Some(provider_id) = changes.provider_id {
            incident.provider_id = Some(provider_id);
        }
        incident.resolved_utc = stamp_on_entry(
            incident.resolved_utc,
            incident.status == IncidentStatus::Resolved,
            now,
        );
        incident.updated_utc = now;

        Ok(Some(incident.clone()))
    }

    async fn count_open_incidents(&self, tenant_id: i64) -> Result<i64, ServiceError> {
        let tables = self.lock()?;
        Ok(tables
            .incidents
            .iter()
            .filter(|i| i.tenant_id == tenant_id && i.status != IncidentStatus::Resolved)
            .count() as i64)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, ServiceError> {
        let mut tables = self.lock()?;
        let record = Notification {
            id: tables.next_id(),
            recipient_id: notification.recipient_id,
            title: notification.title,
            message: notification.message,
            notification_type: notification.notification_type,
            priority: notification.priority,
            status: NotificationStatus::Unread,
            read_utc: None,
            created_utc: Utc::now(),
        };
        tables.notifications.push(record.clone());
        Ok(record)
    }

    async fn list_notifications(
        &self,
        recipient_id: i64,
        include_archived: bool,
    ) -> Result<Vec<Notification>, ServiceError> {
        let tables = self.lock()?;
        let mut notifications: Vec<Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .filter(|n| include_archived || n.status != NotificationStatus::Archived)
            .cloned()
            .collect();
        newest_first(&mut notifications, |n| n.id);
        Ok(notifications)
    }

    async fn count_unread(&self, recipient_id: i64) -> Result<i64, ServiceError> {
        let tables = self.lock()?;
        Ok(tables
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && n.status == NotificationStatus::Unread)
            .count() as i64)
    }

    async fn mark_notification_read(
        &self,
        recipient_id: i64,
        notification_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Notification>, ServiceError> {
        let mut tables = self.lock()?;
        let Some(notification) = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.recipient_id == recipient_id)
        else {
            return Ok(None);
        };

        if notification.status == NotificationStatus::Unread {
            notification.status = NotificationStatus::Read;
        }
        notification.read_utc = stamp_on_entry(notification.read_utc, true, now);

        Ok(Some(notification.clone()))
    }

    async fn mark_all_notifications_read(
        &self,
        recipient_id: i64,
        now: DateTime<Utc>,
    ) -> Result<u64, ServiceError> {
        let mut tables = self.lock()?;
        let mut updated = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && n.status == NotificationStatus::Unread)
        {
            notification.status = NotificationStatus::Read;
            notification.read_utc = stamp_on_entry(notification.read_utc, true, now);
            updated += 1;
        }
        Ok(updated)
    }

    async fn archive_notification(
        &self,
        recipient_id: i64,
        notification_id: i64,
    ) -> Result<Option<Notification>, ServiceError> {
        let mut tables = self.lock()?;
        Ok(tables
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.recipient_id == recipient_id)
            .map(|notification| {
                notification.status = NotificationStatus::Archived;
                notification.clone()
            }))
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), ServiceError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Role, UnknownVariant};
    use chrono::Duration;
    use rust_decimal::Decimal;

    async fn owner_with_tenant(store: &MemoryStore) -> (User, TenantSummary) {
        let owner = store
            .insert_user(NewUser {
                name: "Olga".into(),
                email: "olga@example.com".into(),
                password_hash: "hash".into(),
                role: Role::Owner,
            })
            .await
            .unwrap();
        let tenant = store
            .insert_tenant_account(
                NewUser {
                    name: "Tomás".into(),
                    email: "tomas@example.com".into(),
                    password_hash: "hash".into(),
                    role: Role::Tenant,
                },
                owner.id,
                None,
            )
            .await
            .unwrap();
        (owner, tenant)
    }

    async fn pending_payment(store: &MemoryStore, owner_id: i64, tenant_id: i64) -> Payment {
        store
            .insert_payment(NewPayment {
                owner_id,
                tenant_id: Some(tenant_id),
                contract_id: None,
                concept: "Renta".into(),
                amount: Decimal::from(500),
                due_date: Utc::now().date_naive(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_emails_are_unique_case_insensitively() {
        let store = MemoryStore::new();
        owner_with_tenant(&store).await;

        let duplicate = store
            .insert_user(NewUser {
                name: "Otra".into(),
                email: "OLGA@example.com".into(),
                password_hash: "hash".into(),
                role: Role::Owner,
            })
            .await;
        assert!(matches!(duplicate, Err(ServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_paid_date_survives_later_updates() {
        let store = MemoryStore::new();
        let (owner, tenant) = owner_with_tenant(&store).await;
        let payment = pending_payment(&store, owner.id, tenant.id).await;

        let first = Utc::now();
        let outcome = store
            .mark_paid(owner.id, payment.id, PaymentMethod::Cash, first)
            .await
            .unwrap();
        assert!(matches!(outcome, MarkPaidOutcome::Paid(_)));

        let later = first + Duration::days(2);
        let updated = store
            .update_payment(
                owner.id,
                payment.id,
                PaymentChanges {
                    status: Some(PaymentStatus::Pending),
                    ..Default::default()
                },
                later,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.paid_date, Some(first));

        let again = store
            .update_payment(
                owner.id,
                payment.id,
                PaymentChanges {
                    status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
                later,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.paid_date, Some(first));
    }

    #[tokio::test]
    async fn test_resolution_time_survives_reopening() {
        let store = MemoryStore::new();
        let (owner, tenant) = owner_with_tenant(&store).await;
        let incident = store
            .insert_incident(NewIncident {
                tenant_id: tenant.id,
                description: "Persiana rota en el salón".into(),
                priority: Priority::Low,
            })
            .await
            .unwrap();

        let status = |status| IncidentChanges {
            status: Some(status),
            ..Default::default()
        };
        let first = Utc::now();
        let resolved = store
            .update_incident(owner.id, incident.id, status(IncidentStatus::Resolved), first)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.resolved_utc, Some(first));

        let later = first + Duration::days(3);
        let reopened = store
            .update_incident(owner.id, incident.id, status(IncidentStatus::Assigned), later)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reopened.resolved_utc, Some(first));

        let again = store
            .update_incident(owner.id, incident.id, status(IncidentStatus::Resolved), later)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.resolved_utc, Some(first));
    }

    #[tokio::test]
    async fn test_mark_paid_distinguishes_missing_and_processed() {
        let store = MemoryStore::new();
        let (owner, tenant) = owner_with_tenant(&store).await;
        let payment = pending_payment(&store, owner.id, tenant.id).await;
        let now = Utc::now();

        store
            .mark_paid(owner.id, payment.id, PaymentMethod::Cash, now)
            .await
            .unwrap();
        let second = store
            .mark_paid(owner.id, payment.id, PaymentMethod::Cash, now)
            .await
            .unwrap();
        assert!(matches!(second, MarkPaidOutcome::AlreadyPaid));

        let other_owner = store
            .mark_paid(owner.id + 100, payment.id, PaymentMethod::Cash, now)
            .await
            .unwrap();
        assert!(matches!(other_owner, MarkPaidOutcome::Missing));
    }

    #[tokio::test]
    async fn test_deleted_payments_are_invisible() {
        let store = MemoryStore::new();
        let (owner, tenant) = owner_with_tenant(&store).await;
        let payment = pending_payment(&store, owner.id, tenant.id).await;

        assert!(store
            .soft_delete_payment(owner.id, payment.id, Utc::now())
            .await
            .unwrap());
        assert!(!store
            .soft_delete_payment(owner.id, payment.id, Utc::now())
            .await
            .unwrap());
        assert!(store.list_payments(owner.id).await.unwrap().is_empty());
        assert!(store.find_payment(owner.id, payment.id).await.unwrap().is_none());
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = UnknownVariant("refunded".into());
        assert_eq!(err.to_string(), "unknown stored value: refunded");
    }
}
