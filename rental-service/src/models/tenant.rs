use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Tenant profile. Exactly one per tenant user, owned by the owner who created it.
#[derive(Debug, Clone, FromRow)]
pub struct Tenant {
    pub id: i64,
    pub user_id: i64,
    pub owner_id: i64,
    pub phone: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Tenant profile joined with its user record, for listings and profile reads.
#[derive(Debug, Clone, FromRow)]
pub struct TenantSummary {
    pub id: i64,
    pub user_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_utc: DateTime<Utc>,
}
