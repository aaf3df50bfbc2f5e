use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::status_enum;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    /// Account state of a marketplace user.
    UserStatus, default = Inactive {
        Active => ("active", "فعال"),
        Inactive => ("inactive", "غیرفعال"),
        Banned => ("banned", "مسدود"),
    }
);

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub telegram_id: String,
    pub balance: f64,
    pub status: UserStatus,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("name", "نام").sortable(),
    Column::new("email", "ایمیل").sortable(),
    Column::new("phone", "تلفن"),
    Column::new("telegram_id", "تلگرام").hidden(),
    Column::new("balance", "موجودی").sortable(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("created_at", "تاریخ عضویت").sortable(),
];

impl ViewModel for User {
    const RESOURCE: Resource = Resource::Users;

    fn normalize(raw: Raw<'_>) -> Self {
        let status = raw
            .text(&["status"])
            .and_then(|status| UserStatus::parse(&status))
            .or_else(|| {
                raw.flag(&["is_active", "isActive"]).map(|active| {
                    if active {
                        UserStatus::Active
                    } else {
                        UserStatus::Inactive
                    }
                })
            })
            .unwrap_or_default();

        Self {
            id: raw.id(),
            name: raw
                .text(&["name"])
                .or_else(|| raw.full_name(""))
                .unwrap_or_else(|| "بدون نام".to_string()),
            email: raw.text_or(&["email"], ""),
            phone: raw.text_or(&["phone", "mobile", "phone_number"], ""),
            telegram_id: raw.text_or(&["telegram_id", "telegramId"], ""),
            balance: raw.number_or(&["balance", "wallet_balance"], 0.0),
            status,
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
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "telegram_id" => self.telegram_id.as_str().into(),
            "balance" => self.balance.into(),
            "status" => self.status.label().into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_get_defaults() {
        let value = json!({"ID": 3});
        let user = User::normalize(Raw::new(&value));
        assert_eq!(user.id, "3");
        assert_eq!(user.name, "بدون نام");
        assert_eq!(user.email, "");
        assert_eq!(user.balance, 0.0);
        assert_eq!(user.status, UserStatus::Inactive);
        assert_eq!(user.created_at, "");
    }

    #[test]
    fn active_flag_and_split_names_are_coalesced() {
        let value = json!({
            "id": 9,
            "first_name": "Ali",
            "last_name": "Karimi",
            "is_active": true,
            "createdAt": "2024-05-01T08:00:00Z"
        });
        let user = User::normalize(Raw::new(&value));
        assert_eq!(user.name, "Ali Karimi");
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.created_at, "2024-05-01 08:00");
    }

    #[test]
    fn explicit_status_wins_over_flag() {
        let value = json!({"id": 1, "status": "banned", "is_active": true});
        let user = User::normalize(Raw::new(&value));
        assert_eq!(user.status, UserStatus::Banned);
        assert_eq!(user.field("status"), FieldValue::from("مسدود"));
    }
}
