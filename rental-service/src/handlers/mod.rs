pub mod auth;
pub mod contracts;
pub mod incidents;
pub mod metrics;
pub mod notifications;
pub mod payments;
pub mod tenant;
