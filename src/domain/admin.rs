use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::status_enum;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    AdminRole, default = Moderator {
        SuperAdmin => ("super_admin", "مدیر کل"),
        Admin => ("admin", "مدیر"),
        Moderator => ("moderator", "ناظر"),
        SupportAdmin => ("support_admin", "پشتیبان"),
    }
);

status_enum!(
    AdminStatus, default = Inactive {
        Active => ("active", "فعال"),
        Inactive => ("inactive", "غیرفعال"),
        Suspended => ("suspended", "تعلیق"),
    }
);

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub role: AdminRole,
    pub permissions: Vec<String>,
    pub status: AdminStatus,
    pub created_at: String,
    pub last_login: Option<String>,
    pub login_count: i64,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("name", "نام").sortable(),
    Column::new("username", "نام کاربری").sortable(),
    Column::new("email", "ایمیل"),
    Column::new("phone", "تلفن"),
    Column::new("role", "نقش").sortable(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("last_login", "آخرین ورود").sortable(),
    Column::new("login_count", "تعداد ورود").hidden(),
    Column::new("created_at", "تاریخ ایجاد").sortable(),
];

impl ViewModel for Admin {
    const RESOURCE: Resource = Resource::Admins;

    fn normalize(raw: Raw<'_>) -> Self {
        let role = raw
            .text(&["role"])
            .and_then(|role| AdminRole::parse(&role))
            .unwrap_or_else(|| {
                if raw.flag_or(&["is_full_admin", "user.is_admin"], false) {
                    AdminRole::SuperAdmin
                } else {
                    AdminRole::Moderator
                }
            });
        let status = raw
            .text(&["status"])
            .and_then(|status| AdminStatus::parse(&status))
            .unwrap_or_else(|| {
                if raw.flag_or(&["is_active", "user.is_active"], false) {
                    AdminStatus::Active
                } else {
                    AdminStatus::Inactive
                }
            });

        Self {
            id: raw.id(),
            name: raw
                .text(&["name"])
                .or_else(|| raw.full_name(""))
                .or_else(|| raw.full_name("user"))
                .unwrap_or_else(|| "بدون نام".to_string()),
            email: raw.text_or(&["email", "user.email"], ""),
            phone: raw.text_or(&["phone", "user.phone"], ""),
            username: raw.text_or(&["username", "user.username"], ""),
            role,
            permissions: raw.strings(&["permissions"]),
            status,
            created_at: raw.timestamp(&["created_at", "createdAt"]),
            last_login: raw.timestamp_opt(&["last_login", "lastLogin", "last_login_at"]),
            login_count: raw.integer_or(&["login_count", "loginCount"], 0),
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
            "name" => self.name.as_str().into(),
            "username" => self.username.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "role" => self.role.label().into(),
            "status" => self.status.label().into(),
            "last_login" => self.last_login.clone().into(),
            "login_count" => self.login_count.into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
