use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::{ActiveState, status_enum};
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    NotificationKind, default = Info {
        Info => ("info", "اطلاع‌رسانی"),
        Warning => ("warning", "هشدار"),
        Success => ("success", "موفقیت"),
        Error => ("error", "خطا"),
        Matching => ("matching", "مچینگ"),
    }
);

status_enum!(
    NotificationPriority, default = Normal {
        Low => ("low", "کم"),
        Normal => ("normal", "عادی"),
        High => ("high", "زیاد"),
        Urgent => ("urgent", "فوری"),
    }
);

/// Label used when a notification has no recipient.
pub const BROADCAST_RECIPIENT: &str = "همه کاربران";

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub status: ActiveState,
    pub is_read: bool,
    /// `None` means the notification is broadcast to every user.
    pub user_id: Option<String>,
    pub recipient: String,
    pub action_url: String,
    pub action_text: String,
    pub expires_at: Option<String>,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("title", "عنوان").sortable(),
    Column::new("kind", "نوع").sortable(),
    Column::new("priority", "اولویت").sortable(),
    Column::new("recipient", "گیرنده"),
    Column::new("status", "وضعیت").sortable(),
    Column::new("is_read", "خوانده شده").hidden(),
    Column::new("expires_at", "انقضا").hidden(),
    Column::new("created_at", "تاریخ ایجاد").sortable(),
];

impl ViewModel for Notification {
    const RESOURCE: Resource = Resource::Notifications;

    fn normalize(raw: Raw<'_>) -> Self {
        let user_id = raw.text(&["user_id", "user.id"]);
        let recipient = if user_id.is_some() {
            raw.full_name("user")
                .or_else(|| raw.text(&["user.email"]))
                .or_else(|| user_id.clone())
                .unwrap_or_default()
        } else {
            BROADCAST_RECIPIENT.to_string()
        };

        Self {
            id: raw.id(),
            title: raw.text_or(&["title"], "بدون عنوان"),
            message: raw.text_or(&["message", "body"], ""),
            kind: NotificationKind::parse_or_default(raw.text(&["type"]).as_deref()),
            priority: NotificationPriority::parse_or_default(raw.text(&["priority"]).as_deref()),
            status: ActiveState::from_flag(raw.flag_or(&["is_active"], false)),
            is_read: raw.flag_or(&["is_read"], false),
            user_id,
            recipient,
            action_url: raw.text_or(&["action_url"], ""),
            action_text: raw.text_or(&["action_text"], ""),
            expires_at: raw.timestamp_opt(&["expires_at"]),
            created_at: raw.timestamp(&["created_at", "createdAt"]),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "id" => self.id.as_str().into(),
            "title" => self.title.as_str().into(),
            "kind" => self.kind.label().into(),
            "priority" => self.priority.label().into(),
            "recipient" => self.recipient.as_str().into(),
            "status" => self.status.label().into(),
            "is_read" => self.is_read.into(),
            "expires_at" => self.expires_at.clone().into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
