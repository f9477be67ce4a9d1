use chrono::Utc;
use std::sync::Arc;

use crate::models::{NewNotification, Notification, NotificationType, Priority};
use crate::services::{ServiceError, Store};

/// Inbox operations, always scoped to the recipient.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn Store>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Own notifications, newest first, plus the unread count.
    pub async fn list(
        &self,
        user_id: i64,
        include_archived: bool,
    ) -> Result<(Vec<Notification>, i64), ServiceError> {
        let notifications = self.store.list_notifications(user_id, include_archived).await?;
        let unread = self.store.count_unread(user_id).await?;
        Ok((notifications, unread))
    }

    /// Mark one notification read. The read time is kept from the first call.
    pub async fn mark_read(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<Notification, ServiceError> {
        self.store
            .mark_notification_read(user_id, notification_id, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound("Notificación no encontrada"))
    }

    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, ServiceError> {
        let updated = self
            .store
            .mark_all_notifications_read(user_id, Utc::now())
            .await?;
        tracing::debug!(user_id, updated, "Notifications marked as read");
        Ok(updated)
    }

    pub async fn archive(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<Notification, ServiceError> {
        self.store
            .archive_notification(user_id, notification_id)
            .await?
            .ok_or(ServiceError::NotFound("Notificación no encontrada"))
    }

    /// Owner-initiated notification to one of their own tenants.
    pub async fn send_to_tenant(
        &self,
        owner_id: i64,
        recipient_user_id: i64,
        title: String,
        message: String,
        notification_type: NotificationType,
        priority: Priority,
    ) -> Result<Notification, ServiceError> {
        let tenant = self
            .store
            .find_tenant_by_user(recipient_user_id)
            .await?
            .filter(|t| t.owner_id == owner_id)
            .ok_or(ServiceError::NotFound("Inquilino no encontrado"))?;

        let notification = self
            .store
            .insert_notification(NewNotification {
                recipient_id: tenant.user_id,
                title,
                message,
                notification_type,
                priority,
            })
            .await?;

        tracing::info!(
            notification_id = notification.id,
            owner_id,
            recipient_id = tenant.user_id,
            "Notification sent to tenant"
        );
        Ok(notification)
    }

    /// Side-effect notification raised by another operation. A failure here is
    /// logged and swallowed: the operation that triggered it already committed.
    pub async fn notify(&self, notification: NewNotification) {
        let recipient_id = notification.recipient_id;
        let kind = notification.notification_type.as_str();
        if let Err(e) = self.store.insert_notification(notification).await {
            tracing::warn!(error = %e, recipient_id, kind, "Failed to deliver notification");
        }
    }
}
