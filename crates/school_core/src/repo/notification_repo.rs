//! Notification repository contract and in-memory implementation.

use super::store::{ensure_unique, find, position, rejected, remove_by_id, SchoolRepository};
use super::{RepoError, RepoResult};
use crate::model::notification::{NewNotification, Notification, NotificationPatch};
use crate::model::user::User;
use crate::model::Entity;
use log::info;

pub trait NotificationRepository {
    fn list_notifications(&self) -> Vec<Notification>;
    fn get_notification(&self, id: &str) -> Option<Notification>;
    fn get_notifications_by_user(&self, user_id: &str) -> Vec<Notification>;
    fn unread_count(&self, user_id: &str) -> usize;
    fn add_notification(&mut self, notification: NewNotification) -> RepoResult<Notification>;
    fn update_notification(
        &mut self,
        id: &str,
        patch: NotificationPatch,
    ) -> RepoResult<Option<Notification>>;
    /// Returns `false` when the notification does not exist.
    fn mark_notification_read(&mut self, id: &str) -> bool;
    fn delete_notification(&mut self, id: &str) -> RepoResult<bool>;
}

impl NotificationRepository for SchoolRepository {
    fn list_notifications(&self) -> Vec<Notification> {
        self.notifications.clone()
    }

    fn get_notification(&self, id: &str) -> Option<Notification> {
        find(&self.notifications, id).cloned()
    }

    fn get_notifications_by_user(&self, user_id: &str) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|notification| notification.recipient_id == user_id)
            .cloned()
            .collect()
    }

    fn unread_count(&self, user_id: &str) -> usize {
        self.notifications
            .iter()
            .filter(|notification| notification.recipient_id == user_id && !notification.is_read)
            .count()
    }

    fn add_notification(&mut self, notification: NewNotification) -> RepoResult<Notification> {
        const EVENT: &str = "notification_add";
        let notification = notification.into_notification(self.now());
        notification
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;
        ensure_unique(&self.notifications, &notification.id)
            .map_err(|err| rejected(EVENT, err))?;
        if !self
            .accounts()
            .any(|account| account.id == notification.recipient_id)
        {
            return Err(rejected(
                EVENT,
                RepoError::MissingReference {
                    entity: User::KIND,
                    id: notification.recipient_id.clone(),
                },
            ));
        }

        self.notifications.push(notification.clone());
        info!(
            "event={EVENT} module=repo status=ok id={} recipient_id={}",
            notification.id, notification.recipient_id
        );
        Ok(notification)
    }

    fn update_notification(
        &mut self,
        id: &str,
        patch: NotificationPatch,
    ) -> RepoResult<Option<Notification>> {
        const EVENT: &str = "notification_update";
        let Some(index) = position(&self.notifications, id) else {
            return Ok(None);
        };

        let mut updated = self.notifications[index].clone();
        patch.apply(&mut updated);
        updated
            .validate()
            .map_err(|err| rejected(EVENT, err.into()))?;

        self.notifications[index] = updated.clone();
        info!("event={EVENT} module=repo status=ok id={id}");
        Ok(Some(updated))
    }

    fn mark_notification_read(&mut self, id: &str) -> bool {
        match position(&self.notifications, id) {
            Some(index) => {
                self.notifications[index].is_read = true;
                true
            }
            None => false,
        }
    }

    fn delete_notification(&mut self, id: &str) -> RepoResult<bool> {
        let removed = remove_by_id(&mut self.notifications, id);
        if removed {
            info!("event=notification_delete module=repo status=ok id={id}");
        }
        Ok(removed)
    }
}
