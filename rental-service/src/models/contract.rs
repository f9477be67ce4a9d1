use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Lease between an owner and one of their tenants.
#[derive(Debug, Clone, FromRow)]
pub struct Contract {
    pub id: i64,
    pub owner_id: i64,
    pub tenant_id: i64,
    pub property_label: String,
    pub monthly_rent: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContract {
    pub owner_id: i64,
    pub tenant_id: i64,
    pub property_label: String,
    pub monthly_rent: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
