//! Domain counters. HTTP request metrics come from `service_core::middleware::metrics`.

use metrics::counter;

/// Login attempts by outcome: success, invalid_credentials, role_mismatch.
pub fn record_login(outcome: &'static str) {
    counter!("rental_logins_total", "outcome" => outcome).increment(1);
}

/// Payment lifecycle events: created, updated, paid, tenant_paid, deleted.
pub fn record_payment(event: &'static str) {
    counter!("rental_payments_total", "event" => event).increment(1);
}

/// Incident lifecycle events: reported, updated, resolved.
pub fn record_incident(event: &'static str) {
    counter!("rental_incidents_total", "event" => event).increment(1);
}
