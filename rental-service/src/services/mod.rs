pub mod auth;
pub mod contracts;
pub mod database;
pub mod error;
pub mod incidents;
pub mod jwt;
pub mod memory;
pub mod metrics;
pub mod notifications;
pub mod payments;
pub mod store;
pub mod tenants;

pub use auth::{AuthService, Dashboard, NewTenantAccount};
pub use contracts::{ContractRequest, ContractService};
pub use database::PgStore;
pub use error::ServiceError;
pub use incidents::IncidentService;
pub use jwt::{Claims, JwtService, TokenError};
pub use memory::MemoryStore;
pub use notifications::NotificationService;
pub use payments::{PaymentRequest, PaymentService};
pub use store::Store;
pub use tenants::{TenantDashboard, TenantService};
