use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::status_enum;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    TicketStatus, default = Open {
        Open => ("open", "باز"),
        InProgress => ("in_progress", "در حال بررسی"),
        WaitingResponse => ("waiting_response", "در انتظار پاسخ"),
        Closed => ("closed", "بسته"),
    }
);

status_enum!(
    TicketPriority, default = Medium {
        Low => ("low", "کم"),
        Medium => ("medium", "متوسط"),
        High => ("high", "زیاد"),
        Urgent => ("urgent", "فوری"),
    }
);

status_enum!(
    TicketCategory, default = General {
        General => ("general", "عمومی"),
        Technical => ("technical", "فنی"),
        Billing => ("billing", "مالی"),
        License => ("license", "لایسنس"),
        Other => ("other", "سایر"),
    }
);

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TicketReply {
    pub id: String,
    pub message: String,
    pub author: String,
    pub from_admin: bool,
    pub created_at: String,
}

/// Support conversation opened by a user.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub subject: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: String,
    pub updated_at: String,
    pub replies: Vec<TicketReply>,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه"),
    Column::new("subject", "موضوع").sortable(),
    Column::new("user_name", "کاربر").sortable(),
    Column::new("category", "دسته").sortable(),
    Column::new("priority", "اولویت").sortable(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("replies", "پاسخ‌ها").hidden(),
    Column::new("created_at", "تاریخ ایجاد").sortable(),
    Column::new("updated_at", "آخرین بروزرسانی").hidden(),
];

fn normalize_category(raw: Option<String>) -> TicketCategory {
    match raw.as_deref() {
        Some("bug") | Some("feature") => TicketCategory::Other,
        other => TicketCategory::parse_or_default(other),
    }
}

fn normalize_reply(raw: Raw<'_>) -> TicketReply {
    let from_admin = raw
        .flag(&["is_admin", "is_from_admin"])
        .unwrap_or_else(|| raw.text(&["author_type", "sender_type"]).as_deref() == Some("admin"));
    let fallback_author = if from_admin { "پشتیبانی" } else { "کاربر" };

    TicketReply {
        id: raw.id(),
        message: raw.text_or(&["message", "content"], ""),
        author: raw
            .full_name("user")
            .or_else(|| raw.text(&["author", "sender_name"]))
            .unwrap_or_else(|| fallback_author.to_string()),
        from_admin,
        created_at: raw.timestamp(&["created_at", "createdAt"]),
    }
}

impl ViewModel for Ticket {
    const RESOURCE: Resource = Resource::Tickets;

    fn normalize(raw: Raw<'_>) -> Self {
        Self {
            id: raw.id(),
            user_id: raw.text_or(&["user_id", "user.id"], ""),
            user_name: raw
                .full_name("user")
                .or_else(|| raw.text(&["user_name", "userName"]))
                .unwrap_or_else(|| "نامشخص".to_string()),
            subject: raw.text_or(&["title", "subject"], "بدون عنوان"),
            category: normalize_category(raw.text(&["category"])),
            priority: TicketPriority::parse_or_default(raw.text(&["priority"]).as_deref()),
            message: raw.text_or(&["message", "description"], ""),
            status: TicketStatus::parse_or_default(raw.text(&["status"]).as_deref()),
            created_at: raw.timestamp(&["created_at", "createdAt"]),
            updated_at: raw.timestamp(&["updated_at", "updatedAt"]),
            replies: raw
                .array(&["messages", "replies"])
                .into_iter()
                .map(normalize_reply)
                .collect(),
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
            "subject" => self.subject.as_str().into(),
            "user_name" => self.user_name.as_str().into(),
            "category" => self.category.label().into(),
            "priority" => self.priority.label().into(),
            "status" => self.status.label().into(),
            "replies" => (self.replies.len() as i64).into(),
            "created_at" => self.created_at.as_str().into(),
            "updated_at" => self.updated_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
