pub mod contract;
pub mod incident;
pub mod lifecycle;
pub mod notification;
pub mod payment;
pub mod priority;
pub mod tenant;
pub mod user;

pub use contract::{Contract, NewContract};
pub use incident::{Incident, IncidentChanges, IncidentStatus, NewIncident};
pub use notification::{NewNotification, Notification, NotificationStatus, NotificationType};
pub use payment::{
    check_amount, MarkPaidOutcome, NewPayment, Payment, PaymentChanges, PaymentMethod, PaymentStatistics,
    PaymentStatus,
};
pub use priority::Priority;
pub use tenant::{Tenant, TenantSummary};
pub use user::{NewUser, ProfileChanges, Role, User};

/// A stored enum column held a value this build does not know.
#[derive(Debug, thiserror::Error)]
#[error("unknown stored value: {0}")]
pub struct UnknownVariant(pub String);
