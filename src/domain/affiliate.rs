use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::ActiveState;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

/// Referral partner with their own panel login.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Affiliate {
    pub id: String,
    pub name: String,
    pub username: String,
    pub referral_code: String,
    pub balance: f64,
    pub total_earnings: f64,
    pub status: ActiveState,
    pub last_login: Option<String>,
    pub login_count: i64,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("name", "نام").sortable(),
    Column::new("username", "نام کاربری").sortable(),
    Column::new("referral_code", "کد معرف"),
    Column::new("balance", "موجودی").sortable(),
    Column::new("total_earnings", "کل درآمد").sortable(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("last_login", "آخرین ورود").hidden(),
    Column::new("login_count", "تعداد ورود").hidden(),
    Column::new("created_at", "تاریخ ثبت").sortable(),
];

impl ViewModel for Affiliate {
    const RESOURCE: Resource = Resource::Affiliates;

    fn normalize(raw: Raw<'_>) -> Self {
        Self {
            id: raw.id(),
            name: raw.text_or(&["name"], "بدون نام"),
            username: raw.text_or(&["username"], ""),
            referral_code: raw.text_or(&["referral_code", "ref_code"], ""),
            balance: raw.number_or(&["balance"], 0.0),
            total_earnings: raw.number_or(&["total_earnings"], 0.0),
            status: ActiveState::from_flag(raw.flag_or(&["is_active"], true)),
            last_login: raw.timestamp_opt(&["last_login"]),
            login_count: raw.integer_or(&["login_count"], 0),
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
            "username" => self.username.as_str().into(),
            "referral_code" => self.referral_code.as_str().into(),
            "balance" => self.balance.into(),
            "total_earnings" => self.total_earnings.into(),
            "status" => self.status.label().into(),
            "last_login" => self.last_login.clone().into(),
            "login_count" => self.login_count.into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
