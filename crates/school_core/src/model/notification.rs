//! In-app notification records.

use super::user::UserRole;
use super::{require_text, Entity, EntityId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Announcement,
    Grade,
    Assignment,
    Attendance,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    pub recipient_id: EntityId,
    pub recipient_role: UserRole,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: i64,
    pub created_by: EntityId,
}

impl Notification {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "id", &self.id)?;
        require_text(Self::KIND, "recipient_id", &self.recipient_id)?;
        require_text(Self::KIND, "title", &self.title)
    }
}

impl Entity for Notification {
    const KIND: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for `add_notification`; starts unread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub id: EntityId,
    pub recipient_id: EntityId,
    pub recipient_role: UserRole,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_by: EntityId,
}

impl NewNotification {
    pub(crate) fn into_notification(self, now: i64) -> Notification {
        Notification {
            id: self.id,
            recipient_id: self.recipient_id,
            recipient_role: self.recipient_role,
            title: self.title,
            message: self.message,
            kind: self.kind,
            is_read: false,
            created_at: now,
            created_by: self.created_by,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPatch {
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<NotificationKind>,
    pub is_read: Option<bool>,
}

impl NotificationPatch {
    pub(crate) fn apply(self, notification: &mut Notification) {
        if let Some(title) = self.title {
            notification.title = title;
        }
        if let Some(message) = self.message {
            notification.message = message;
        }
        if let Some(kind) = self.kind {
            notification.kind = kind;
        }
        if let Some(is_read) = self.is_read {
            notification.is_read = is_read;
        }
    }
}
