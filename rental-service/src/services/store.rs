//! Persistence seams. `PgStore` backs production; `MemoryStore` backs tests and demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    Contract, Incident, IncidentChanges, MarkPaidOutcome, NewContract, NewIncident,
    NewNotification, NewPayment, NewUser, Notification, Payment, PaymentChanges, PaymentMethod,
    ProfileChanges, Tenant, TenantSummary, User,
};
use crate::services::ServiceError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, ServiceError>;

    async fn insert_user(&self, user: NewUser) -> Result<User, ServiceError>;

    /// Insert a tenant user and its profile linked to `owner_id`, atomically.
    async fn insert_tenant_account(
        &self,
        user: NewUser,
        owner_id: i64,
        phone: Option<String>,
    ) -> Result<TenantSummary, ServiceError>;

    /// Update name/email on the user and phone on the tenant profile, atomically.
    async fn update_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<TenantSummary>, ServiceError>;
}

#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn find_tenant_by_user(&self, user_id: i64) -> Result<Option<Tenant>, ServiceError>;

    async fn find_tenant_by_id(&self, tenant_id: i64) -> Result<Option<Tenant>, ServiceError>;

    /// Profile joined with the user record.
    async fn tenant_summary_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<TenantSummary>, ServiceError>;

    async fn list_tenants(&self, owner_id: i64) -> Result<Vec<TenantSummary>, ServiceError>;

    async fn count_tenants(&self, owner_id: i64) -> Result<i64, ServiceError>;
}

#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn insert_contract(&self, contract: NewContract) -> Result<Contract, ServiceError>;

    async fn find_contract(
        &self,
        owner_id: i64,
        contract_id: i64,
    ) -> Result<Option<Contract>, ServiceError>;

    async fn list_contracts(&self, owner_id: i64) -> Result<Vec<Contract>, ServiceError>;

    /// Most recent active contract of a tenant profile.
    async fn active_contract(&self, tenant_id: i64) -> Result<Option<Contract>, ServiceError>;
}

/// Every query here ignores soft-deleted payments.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, ServiceError>;

    async fn find_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
    ) -> Result<Option<Payment>, ServiceError>;

    async fn list_payments(&self, owner_id: i64) -> Result<Vec<Payment>, ServiceError>;

    async fn list_tenant_payments(&self, tenant_id: i64) -> Result<Vec<Payment>, ServiceError>;

    /// Apply a partial update. Entering `paid` stamps the paid date once.
    async fn update_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
        changes: PaymentChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Payment>, ServiceError>;

    /// Conditional transition pending|overdue -> paid in one step.
    async fn mark_paid(
        &self,
        owner_id: i64,
        payment_id: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<MarkPaidOutcome, ServiceError>;

    /// Conditional transition pending -> paid restricted to one tenant's payments.
    async fn tenant_mark_paid(
        &self,
        tenant_id: i64,
        payment_id: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Option<Payment>, ServiceError>;

    /// Returns false when the payment is missing or already deleted.
    async fn soft_delete_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn insert_incident(&self, incident: NewIncident) -> Result<Incident, ServiceError>;

    async fn list_tenant_incidents(&self, tenant_id: i64) -> Result<Vec<Incident>, ServiceError>;

    /// Incidents of every tenant profile owned by `owner_id`.
    async fn list_owner_incidents(&self, owner_id: i64) -> Result<Vec<Incident>, ServiceError>;

    /// Owner-scoped partial update. Entering `resolved` stamps the resolution time once.
    async fn update_incident(
        &self,
        owner_id: i64,
        incident_id: i64,
        changes: IncidentChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Incident>, ServiceError>;

    /// Incidents not yet resolved.
    async fn count_open_incidents(&self, tenant_id: i64) -> Result<i64, ServiceError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, ServiceError>;

    async fn list_notifications(
        &self,
        recipient_id: i64,
        include_archived: bool,
    ) -> Result<Vec<Notification>, ServiceError>;

    async fn count_unread(&self, recipient_id: i64) -> Result<i64, ServiceError>;

    async fn mark_notification_read(
        &self,
        recipient_id: i64,
        notification_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Notification>, ServiceError>;

    /// Returns how many unread notifications became read.
    async fn mark_all_notifications_read(
        &self,
        recipient_id: i64,
        now: DateTime<Utc>,
    ) -> Result<u64, ServiceError>;

    async fn archive_notification(
        &self,
        recipient_id: i64,
        notification_id: i64,
    ) -> Result<Option<Notification>, ServiceError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// Everything the API needs from persistence.
pub trait Store:
    UserStore + TenantStore + ContractStore + PaymentStore + IncidentStore + NotificationStore + HealthCheck
{
}

impl<T> Store for T where
    T: UserStore
        + TenantStore
        + ContractStore
        + PaymentStore
        + IncidentStore
        + NotificationStore
        + HealthCheck
{
}
