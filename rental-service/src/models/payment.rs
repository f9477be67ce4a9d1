//! Payment records and the status vocabulary of the payment lifecycle.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UnknownVariant;

/// Concept used when an owner creates a payment without one.
pub const DEFAULT_CONCEPT: &str = "Pago de renta";

/// Decimal places kept by the money columns (`NUMERIC(12, 2)`).
pub const AMOUNT_SCALE: u32 = 2;

/// Checks that an amount fits a money column: strictly positive, at most
/// two decimals and below 10^10.
pub fn check_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("El monto debe ser mayor a 0");
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err("El monto admite como máximo 2 decimales");
    }
    if amount >= Decimal::from(10_000_000_000_i64) {
        return Err("El monto excede el máximo permitido");
    }
    Ok(())
}

/// Stored payment status.
///
/// `Overdue` may be stored explicitly by an owner, but is normally derived:
/// see [`Payment::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "pagado")]
    Paid,
    #[serde(alias = "vencido")]
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(UnknownVariant(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[serde(alias = "tarjeta")]
    CreditCard,
    #[serde(alias = "transferencia")]
    BankTransfer,
    #[serde(alias = "efectivo")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::BankTransfer => "bank_transfer",
            Self::Cash => "cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "credit_card" => Ok(Self::CreditCard),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cash" => Ok(Self::Cash),
            _ => Err(UnknownVariant(value)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i64,
    pub owner_id: i64,
    pub tenant_id: Option<i64>,
    pub contract_id: Option<i64>,
    pub concept: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_date: Option<DateTime<Utc>>,
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub deleted_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Payment {
    pub fn is_deleted(&self) -> bool {
        self.deleted_utc.is_some()
    }

    /// A pending payment whose due date has passed.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && self.due_date < today
    }

    /// Status as reported to clients: pending payments past their due date count as overdue.
    pub fn effective_status(&self, today: NaiveDate) -> PaymentStatus {
        if self.is_past_due(today) {
            PaymentStatus::Overdue
        } else {
            self.status
        }
    }
}

/// Input for inserting a payment. Status is always pending on creation.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub owner_id: i64,
    pub tenant_id: Option<i64>,
    pub contract_id: Option<i64>,
    pub concept: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentChanges {
    pub amount: Option<Decimal>,
    pub status: Option<PaymentStatus>,
    pub method: Option<PaymentMethod>,
}

/// Result of an owner's conditional mark-paid.
#[derive(Debug, Clone)]
pub enum MarkPaidOutcome {
    Paid(Payment),
    AlreadyPaid,
    Missing,
}

/// Aggregates over an owner's active payments.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaymentStatistics {
    #[serde(rename = "pagados")]
    pub paid: u64,
    #[serde(rename = "pendientes")]
    pub pending: u64,
    #[serde(rename = "vencidos")]
    pub overdue: u64,
    #[serde(rename = "total")]
    pub total: u64,
    /// Sum of payments collected in the current calendar month (UTC).
    #[serde(rename = "ingresos_mes")]
    pub month_revenue: Decimal,
    /// Percentage of payments collected, rounded, 0..=100.
    #[serde(rename = "tasa_cobro")]
    pub collection_rate: u32,
}

impl PaymentStatistics {
    /// Soft-deleted payments are skipped even if the caller passes them in.
    pub fn compute(payments: &[Payment], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut stats = PaymentStatistics {
            paid: 0,
            pending: 0,
            overdue: 0,
            total: 0,
            month_revenue: Decimal::ZERO,
            collection_rate: 0,
        };

        for payment in payments.iter().filter(|p| !p.is_deleted()) {
            match payment.effective_status(today) {
                PaymentStatus::Paid => {
                    stats.paid += 1;
                    let in_month = payment
                        .paid_date
                        .map(|d| d.year() == now.year() && d.month() == now.month())
                        .unwrap_or(false);
                    if in_month {
                        stats.month_revenue += payment.amount;
                    }
                }
                PaymentStatus::Pending => stats.pending += 1,
                PaymentStatus::Overdue => stats.overdue += 1,
            }
        }

        stats.total = stats.paid + stats.pending + stats.overdue;
        stats.collection_rate = collection_rate(stats.paid, stats.total);
        stats
    }
}

/// `round(paid / total * 100)`, half away from zero; 0 when there is nothing to collect.
pub fn collection_rate(paid: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (paid.min(total) * 200 + total) / (2 * total);
    rate as u32
}
