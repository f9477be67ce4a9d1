//! PostgreSQL store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use std::time::Duration;
use tracing::{info, instrument};

use crate::models::{
    user::normalize_email, Contract, Incident, IncidentChanges, MarkPaidOutcome, NewContract,
    NewIncident, NewNotification, NewPayment, NewUser, Notification, Payment, PaymentChanges,
    PaymentMethod, PaymentStatus, ProfileChanges, Tenant, TenantSummary, UnknownVariant, User,
};
use crate::services::store::{
    ContractStore, HealthCheck, IncidentStore, NotificationStore, PaymentStore, TenantStore,
    UserStore,
};
use crate::services::ServiceError;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_utc";
const TENANT_COLUMNS: &str = "id, user_id, owner_id, phone, created_utc";
const TENANT_SUMMARY_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.owner_id, u.name, u.email, t.phone, t.created_utc
    FROM tenants t
    JOIN users u ON u.id = t.user_id
"#;
const CONTRACT_COLUMNS: &str =
    "id, owner_id, tenant_id, property_label, monthly_rent, start_date, end_date, active, created_utc";
const PAYMENT_COLUMNS: &str = "id, owner_id, tenant_id, contract_id, concept, amount, due_date, \
     paid_date, status, method, deleted_utc, created_utc, updated_utc";
const INCIDENT_COLUMNS: &str = "id, tenant_id, description, status, priority, provider_id, \
     resolved_utc, created_utc, updated_utc";
const NOTIFICATION_COLUMNS: &str = "id, recipient_id, title, message, notification_type, \
     priority, status, read_utc, created_utc";

// Rows carry enum columns as text; conversion into the domain types happens in TryFrom.

#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_utc: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UnknownVariant;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.try_into()?,
            created_utc: row.created_utc,
        })
    }
}

#[derive(FromRow)]
struct PaymentRow {
    id: i64,
    owner_id: i64,
    tenant_id: Option<i64>,
    contract_id: Option<i64>,
    concept: String,
    amount: Decimal,
    due_date: NaiveDate,
    paid_date: Option<DateTime<Utc>>,
    status: String,
    method: Option<String>,
    deleted_utc: Option<DateTime<Utc>>,
    created_utc: DateTime<Utc>,
    updated_utc: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = UnknownVariant;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            owner_id: row.owner_id,
            tenant_id: row.tenant_id,
            contract_id: row.contract_id,
            concept: row.concept,
            amount: row.amount,
            due_date: row.due_date,
            paid_date: row.paid_date,
            status: row.status.try_into()?,
            method: row.method.map(PaymentMethod::try_from).transpose()?,
            deleted_utc: row.deleted_utc,
            created_utc: row.created_utc,
            updated_utc: row.updated_utc,
        })
    }
}

#[derive(FromRow)]
struct IncidentRow {
    id: i64,
    tenant_id: i64,
    description: String,
    status: String,
    priority: String,
    provider_id: Option<i64>,
    resolved_utc: Option<DateTime<Utc>>,
    created_utc: DateTime<Utc>,
    updated_utc: DateTime<Utc>,
}

impl TryFrom<IncidentRow> for Incident {
    type Error = UnknownVariant;

    fn try_from(row: IncidentRow) -> Result<Self, Self::Error> {
        Ok(Incident {
            id: row.id,
            tenant_id: row.tenant_id,
            description: row.description,
            status: row.status.try_into()?,
            priority: row.priority.try_into()?,
            provider_id: row.provider_id,
            resolved_utc: row.resolved_utc,
            created_utc: row.created_utc,
            updated_utc: row.updated_utc,
        })
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: i64,
    recipient_id: i64,
    title: String,
    message: String,
    notification_type: String,
    priority: String,
    status: String,
    read_utc: Option<DateTime<Utc>>,
    created_utc: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = UnknownVariant;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            recipient_id: row.recipient_id,
            title: row.title,
            message: row.message,
            notification_type: row.notification_type.try_into()?,
            priority: row.priority.try_into()?,
            status: row.status.try_into()?,
            read_utc: row.read_utc,
            created_utc: row.created_utc,
        })
    }
}

fn convert<R, T>(row: R) -> Result<T, ServiceError>
where
    T: TryFrom<R, Error = UnknownVariant>,
{
    T::try_from(row).map_err(ServiceError::from)
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, ServiceError>
where
    T: TryFrom<R, Error = UnknownVariant>,
{
    rows.into_iter().map(convert).collect()
}

/// Connection pool wrapper implementing every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[instrument(skip(database_url), fields(service = "rental-service"))]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    #[instrument(skip(self, email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }

    #[instrument(skip(self, user), fields(role = %user.role))]
    async fn insert_user(&self, user: NewUser) -> Result<User, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(normalize_email(&user.email))
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        convert(row)
    }

    #[instrument(skip(self, user, phone))]
    async fn insert_tenant_account(
        &self,
        user: NewUser,
        owner_id: i64,
        phone: Option<String>,
    ) -> Result<TenantSummary, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let user_row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(normalize_email(&user.email))
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "INSERT INTO tenants (user_id, owner_id, phone) VALUES ($1, $2, $3) \
             RETURNING {TENANT_COLUMNS}"
        ))
        .bind(user_row.id)
        .bind(owner_id)
        .bind(&phone)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(tenant_id = tenant.id, user_id = user_row.id, "Tenant account created");

        Ok(TenantSummary {
            id: tenant.id,
            user_id: user_row.id,
            owner_id: tenant.owner_id,
            name: user_row.name,
            email: user_row.email,
            phone: tenant.phone,
            created_utc: tenant.created_utc,
        })
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<TenantSummary>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let tenant_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM tenants WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(tenant_id) = tenant_id else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email) WHERE id = $1",
        )
        .bind(user_id)
        .bind(&changes.name)
        .bind(changes.email.as_deref().map(normalize_email))
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE tenants SET phone = COALESCE($2, phone) WHERE id = $1")
            .bind(tenant_id)
            .bind(&changes.phone)
            .execute(&mut *tx)
            .await?;

        let summary = sqlx::query_as::<_, TenantSummary>(&format!(
            "{TENANT_SUMMARY_SELECT} WHERE t.id = $1"
        ))
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(summary)
    }
}

#[async_trait]
impl TenantStore for PgStore {
    async fn find_tenant_by_user(&self, user_id: i64) -> Result<Option<Tenant>, ServiceError> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }

    async fn find_tenant_by_id(&self, tenant_id: i64) -> Result<Option<Tenant>, ServiceError> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"
        ))
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }

    async fn tenant_summary_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<TenantSummary>, ServiceError> {
        let summary = sqlx::query_as::<_, TenantSummary>(&format!(
            "{TENANT_SUMMARY_SELECT} WHERE t.user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn list_tenants(&self, owner_id: i64) -> Result<Vec<TenantSummary>, ServiceError> {
        let tenants = sqlx::query_as::<_, TenantSummary>(&format!(
            "{TENANT_SUMMARY_SELECT} WHERE t.owner_id = $1 ORDER BY t.created_utc DESC, t.id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }

    async fn count_tenants(&self, owner_id: i64) -> Result<i64, ServiceError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ContractStore for PgStore {
    #[instrument(skip(self, contract), fields(owner_id = contract.owner_id, tenant_id = contract.tenant_id))]
    async fn insert_contract(&self, contract: NewContract) -> Result<Contract, ServiceError> {
        let record = sqlx::query_as::<_, Contract>(&format!(
            "INSERT INTO contracts (owner_id, tenant_id, property_label, monthly_rent, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CONTRACT_COLUMNS}"
        ))
        .bind(contract.owner_id)
        .bind(contract.tenant_id)
        .bind(&contract.property_label)
        .bind(contract.monthly_rent)
        .bind(contract.start_date)
        .bind(contract.end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_contract(
        &self,
        owner_id: i64,
        contract_id: i64,
    ) -> Result<Option<Contract>, ServiceError> {
        let contract = sqlx::query_as::<_, Contract>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = $1 AND owner_id = $2"
        ))
        .bind(contract_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(contract)
    }

    async fn list_contracts(&self, owner_id: i64) -> Result<Vec<Contract>, ServiceError> {
        let contracts = sqlx::query_as::<_, Contract>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE owner_id = $1 \
             ORDER BY created_utc DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(contracts)
    }

    async fn active_contract(&self, tenant_id: i64) -> Result<Option<Contract>, ServiceError> {
        let contract = sqlx::query_as::<_, Contract>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE tenant_id = $1 AND active \
             ORDER BY start_date DESC, id DESC LIMIT 1"
        ))
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(contract)
    }
}

#[async_trait]
impl PaymentStore for PgStore {
    #[instrument(skip(self, payment), fields(owner_id = payment.owner_id))]
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, ServiceError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "INSERT INTO payments (owner_id, tenant_id, contract_id, concept, amount, due_date, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 'pending') RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(payment.owner_id)
        .bind(payment.tenant_id)
        .bind(payment.contract_id)
        .bind(&payment.concept)
        .bind(payment.amount)
        .bind(payment.due_date)
        .fetch_one(&self.pool)
        .await?;

        convert(row)
    }

    async fn find_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
    ) -> Result<Option<Payment>, ServiceError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE id = $1 AND owner_id = $2 AND deleted_utc IS NULL"
        ))
        .bind(payment_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }

    #[instrument(skip(self))]
    async fn list_payments(&self, owner_id: i64) -> Result<Vec<Payment>, ServiceError> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE owner_id = $1 AND deleted_utc IS NULL \
             ORDER BY due_date DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn list_tenant_payments(&self, tenant_id: i64) -> Result<Vec<Payment>, ServiceError> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE tenant_id = $1 AND deleted_utc IS NULL \
             ORDER BY due_date DESC, id DESC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    #[instrument(skip(self, changes))]
    async fn update_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
        changes: PaymentChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Payment>, ServiceError> {
        // paid_date is only ever filled, never cleared or moved.
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            UPDATE payments
            SET amount = COALESCE($3, amount),
                status = COALESCE($4::varchar, status),
                method = COALESCE($5::varchar, method),
                paid_date = CASE
                    WHEN COALESCE($4::varchar, status) = 'paid' THEN COALESCE(paid_date, $6)
                    ELSE paid_date
                END,
                updated_utc = $6
            WHERE id = $1 AND owner_id = $2 AND deleted_utc IS NULL
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment_id)
        .bind(owner_id)
        .bind(changes.amount)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.method.map(|m| m.as_str()))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }

    #[instrument(skip(self))]
    async fn mark_paid(
        &self,
        owner_id: i64,
        payment_id: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<MarkPaidOutcome, ServiceError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            UPDATE payments
            SET status = 'paid',
                method = $3,
                paid_date = COALESCE(paid_date, $4),
                updated_utc = $4
            WHERE id = $1 AND owner_id = $2 AND deleted_utc IS NULL
              AND status IN ('pending', 'overdue')
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment_id)
        .bind(owner_id)
        .bind(method.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(MarkPaidOutcome::Paid(convert(row)?));
        }

        // Nothing transitioned: tell "already paid" apart from "no such payment".
        let status: Option<String> = sqlx::query_scalar(
            "SELECT status FROM payments WHERE id = $1 AND owner_id = $2 AND deleted_utc IS NULL",
        )
        .bind(payment_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match status {
            Some(status) if status == PaymentStatus::Paid.as_str() => MarkPaidOutcome::AlreadyPaid,
            _ => MarkPaidOutcome::Missing,
        })
    }

    #[instrument(skip(self))]
    async fn tenant_mark_paid(
        &self,
        tenant_id: i64,
        payment_id: i64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Option<Payment>, ServiceError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            UPDATE payments
            SET status = 'paid',
                method = $3,
                paid_date = COALESCE(paid_date, $4),
                updated_utc = $4
            WHERE id = $1 AND tenant_id = $2 AND deleted_utc IS NULL
              AND status = 'pending'
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment_id)
        .bind(tenant_id)
        .bind(method.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }

    #[instrument(skip(self))]
    async fn soft_delete_payment(
        &self,
        owner_id: i64,
        payment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let result = sqlx::query(
            "UPDATE payments SET deleted_utc = $3, updated_utc = $3 \
             WHERE id = $1 AND owner_id = $2 AND deleted_utc IS NULL",
        )
        .bind(payment_id)
        .bind(owner_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl IncidentStore for PgStore {
    #[instrument(skip(self, incident), fields(tenant_id = incident.tenant_id))]
    async fn insert_incident(&self, incident: NewIncident) -> Result<Incident, ServiceError> {
        let row = sqlx::query_as::<_, IncidentRow>(&format!(
            "INSERT INTO incidents (tenant_id, description, priority, status) \
             VALUES ($1, $2, $3, 'open') RETURNING {INCIDENT_COLUMNS}"
        ))
        .bind(incident.tenant_id)
        .bind(&incident.description)
        .bind(incident.priority.as_str())
        .fetch_one(&self.pool)
        .await?;

        convert(row)
    }

    async fn list_tenant_incidents(&self, tenant_id: i64) -> Result<Vec<Incident>, ServiceError> {
        let rows = sqlx::query_as::<_, IncidentRow>(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE tenant_id = $1 \
             ORDER BY created_utc DESC, id DESC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn list_owner_incidents(&self, owner_id: i64) -> Result<Vec<Incident>, ServiceError> {
        let rows = sqlx::query_as::<_, IncidentRow>(
            r#"
            SELECT i.id, i.tenant_id, i.description, i.status, i.priority, i.provider_id,
                   i.resolved_utc, i.created_utc, i.updated_utc
            FROM incidents i
            JOIN tenants t ON t.id = i.tenant_id
            WHERE t.owner_id = $1
            ORDER BY i.created_utc DESC, i.id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    #[instrument(skip(self, changes))]
    async fn update_incident(
        &self,
        owner_id: i64,
        incident_id: i64,
        changes: IncidentChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Incident>, ServiceError> {
        let row = sqlx::query_as::<_, IncidentRow>(
            r#"
            UPDATE incidents AS i
            SET status = COALESCE($3::varchar, i.status),
                priority = COALESCE($4::varchar, i.priority),
                provider_id = COALESCE($5, i.provider_id),
                resolved_utc = CASE
                    WHEN COALESCE($3::varchar, i.status) = 'resolved' THEN COALESCE(i.resolved_utc, $6)
                    ELSE i.resolved_utc
                END,
                updated_utc = $6
            FROM tenants t
            WHERE i.id = $1 AND t.id = i.tenant_id AND t.owner_id = $2
            RETURNING i.id, i.tenant_id, i.description, i.status, i.priority, i.provider_id,
                      i.resolved_utc, i.created_utc, i.updated_utc
            "#,
        )
        .bind(incident_id)
        .bind(owner_id)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.priority.map(|p| p.as_str()))
        .bind(changes.provider_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }

    async fn count_open_incidents(&self, tenant_id: i64) -> Result<i64, ServiceError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM incidents WHERE tenant_id = $1 AND status <> 'resolved'",
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    #[instrument(skip(self, notification), fields(recipient_id = notification.recipient_id))]
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, ServiceError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "INSERT INTO notifications (recipient_id, title, message, notification_type, priority, status) \
             VALUES ($1, $2, $3, $4, $5, 'unread') RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(notification.recipient_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.notification_type.as_str())
        .bind(notification.priority.as_str())
        .fetch_one(&self.pool)
        .await?;

        convert(row)
    }

    async fn list_notifications(
        &self,
        recipient_id: i64,
        include_archived: bool,
    ) -> Result<Vec<Notification>, ServiceError> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE recipient_id = $1 AND ($2 OR status <> 'archived') \
             ORDER BY created_utc DESC, id DESC"
        ))
        .bind(recipient_id)
        .bind(include_archived)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn count_unread(&self, recipient_id: i64) -> Result<i64, ServiceError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND status = 'unread'",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn mark_notification_read(
        &self,
        recipient_id: i64,
        notification_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Notification>, ServiceError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            UPDATE notifications
            SET status = CASE WHEN status = 'unread' THEN 'read' ELSE status END,
                read_utc = COALESCE(read_utc, $3)
            WHERE id = $1 AND recipient_id = $2
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(notification_id)
        .bind(recipient_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }

    async fn mark_all_notifications_read(
        &self,
        recipient_id: i64,
        now: DateTime<Utc>,
    ) -> Result<u64, ServiceError> {
        let result = sqlx::query(
            "UPDATE notifications SET status = 'read', read_utc = COALESCE(read_utc, $2) \
             WHERE recipient_id = $1 AND status = 'unread'",
        )
        .bind(recipient_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn archive_notification(
        &self,
        recipient_id: i64,
        notification_id: i64,
    ) -> Result<Option<Notification>, ServiceError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "UPDATE notifications SET status = 'archived' \
             WHERE id = $1 AND recipient_id = $2 RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(notification_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(convert).transpose()
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
