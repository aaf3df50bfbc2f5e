use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::status_enum;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    /// Product tier unlocked by a license code.
    LicenseKind, default = Plus {
        Pro => ("pro", "پرو"),
        Plus => ("plus", "پلاس"),
        Plus4 => ("plus4", "پلاس ۴ ماهه"),
    }
);

status_enum!(
    LicenseTerm, default = Yearly {
        Trial => ("trial", "آزمایشی"),
        Monthly => ("monthly", "ماهانه"),
        Yearly => ("yearly", "سالانه"),
        Lifetime => ("lifetime", "مادام‌العمر"),
    }
);

status_enum!(
    LicenseStatus, default = Expired {
        Active => ("active", "فعال"),
        Expired => ("expired", "استفاده نشده"),
        Suspended => ("suspended", "تعلیق"),
        Revoked => ("revoked", "باطل شده"),
    }
);

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct License {
    pub id: String,
    pub code: String,
    pub kind: LicenseKind,
    pub term: LicenseTerm,
    pub status: LicenseStatus,
    pub user_name: String,
    pub used_at: Option<String>,
    pub max_activations: i64,
    pub current_activations: i64,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("code", "کد لایسنس"),
    Column::new("kind", "نوع").sortable(),
    Column::new("term", "مدت").hidden(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("user_name", "کاربر").sortable(),
    Column::new("used_at", "تاریخ استفاده").sortable(),
    Column::new("created_at", "تاریخ ایجاد").sortable(),
];

impl ViewModel for License {
    const RESOURCE: Resource = Resource::Licenses;

    fn normalize(raw: Raw<'_>) -> Self {
        let kind = LicenseKind::parse_or_default(raw.text(&["type"]).as_deref());
        let is_used = raw.flag_or(&["is_used", "isUsed"], false);
        let term = raw
            .text(&["license_type", "licenseType"])
            .and_then(|term| LicenseTerm::parse(&term))
            .unwrap_or(if kind == LicenseKind::Plus4 {
                LicenseTerm::Monthly
            } else {
                LicenseTerm::Yearly
            });
        let status = raw
            .text(&["status"])
            .and_then(|status| LicenseStatus::parse(&status))
            .unwrap_or(if is_used {
                LicenseStatus::Active
            } else {
                LicenseStatus::Expired
            });

        Self {
            id: raw.id(),
            code: raw.text_or(&["code", "license_key", "licenseKey"], ""),
            kind,
            term,
            status,
            user_name: raw
                .full_name("user")
                .or_else(|| raw.text(&["user_name", "userName", "user.email"]))
                .unwrap_or_default(),
            used_at: raw.timestamp_opt(&["used_at", "usedAt", "activated_at"]),
            max_activations: raw.integer_or(&["max_activations", "maxActivations"], 1),
            current_activations: raw.integer_or(
                &["current_activations", "currentActivations"],
                i64::from(is_used),
            ),
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
            "code" => self.code.as_str().into(),
            "kind" => self.kind.label().into(),
            "term" => self.term.label().into(),
            "status" => self.status.label().into(),
            "user_name" => self.user_name.as_str().into(),
            "used_at" => self.used_at.clone().into(),
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
    fn unused_code_defaults() {
        let value = json!({"id": 10, "code": "ASL-1"});
        let license = License::normalize(Raw::new(&value));
        assert_eq!(license.kind, LicenseKind::Plus);
        assert_eq!(license.term, LicenseTerm::Yearly);
        assert_eq!(license.status, LicenseStatus::Expired);
        assert_eq!(license.max_activations, 1);
        assert_eq!(license.current_activations, 0);
        assert_eq!(license.user_name, "");
    }

    #[test]
    fn plus4_is_monthly_and_used_is_active() {
        let value = json!({
            "id": 11,
            "license_key": "ASL-2",
            "type": "plus4",
            "is_used": true,
            "user": {"first_name": "Sina", "last_name": "Moradi"}
        });
        let license = License::normalize(Raw::new(&value));
        assert_eq!(license.code, "ASL-2");
        assert_eq!(license.term, LicenseTerm::Monthly);
        assert_eq!(license.status, LicenseStatus::Active);
        assert_eq!(license.current_activations, 1);
        assert_eq!(license.user_name, "Sina Moradi");
    }
}
