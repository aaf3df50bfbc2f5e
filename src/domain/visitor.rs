use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::ReviewStatus;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

/// Field agent registration awaiting or past review.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Visitor {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub national_id: String,
    pub mobile: String,
    pub email: String,
    pub city_province: String,
    pub destination_cities: String,
    pub language_level: String,
    pub has_marketing_experience: bool,
    pub status: ReviewStatus,
    pub admin_notes: String,
    pub is_featured: bool,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("full_name", "نام").sortable(),
    Column::new("mobile", "موبایل"),
    Column::new("national_id", "کد ملی").hidden(),
    Column::new("city_province", "شهر/استان").sortable(),
    Column::new("destination_cities", "شهرهای مقصد").hidden(),
    Column::new("language_level", "سطح زبان").hidden(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("is_featured", "ویژه").sortable(),
    Column::new("average_rating", "امتیاز").sortable(),
    Column::new("created_at", "تاریخ ثبت").sortable(),
];

impl ViewModel for Visitor {
    const RESOURCE: Resource = Resource::Visitors;

    fn normalize(raw: Raw<'_>) -> Self {
        Self {
            id: raw.id(),
            user_id: raw.text_or(&["user_id", "user.id"], ""),
            full_name: raw.text_or(&["full_name", "name"], "بدون نام"),
            national_id: raw.text_or(&["national_id", "passport_number"], ""),
            mobile: raw.text_or(&["mobile", "whatsapp_number"], ""),
            email: raw.text_or(&["email", "user.email"], ""),
            city_province: raw.text_or(&["city_province"], ""),
            destination_cities: raw.text_or(&["destination_cities"], ""),
            language_level: raw.text_or(&["language_level"], ""),
            has_marketing_experience: raw.flag_or(&["has_marketing_experience"], false),
            status: ReviewStatus::parse_or_default(raw.text(&["status"]).as_deref()),
            admin_notes: raw.text_or(&["admin_notes"], ""),
            is_featured: raw.flag_or(&["is_featured"], false),
            average_rating: raw.number_or(&["average_rating"], 0.0),
            total_ratings: raw.integer_or(&["total_ratings"], 0),
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
            "full_name" => self.full_name.as_str().into(),
            "mobile" => self.mobile.as_str().into(),
            "national_id" => self.national_id.as_str().into(),
            "city_province" => self.city_province.as_str().into(),
            "destination_cities" => self.destination_cities.as_str().into(),
            "language_level" => self.language_level.as_str().into(),
            "status" => self.status.label().into(),
            "is_featured" => self.is_featured.into(),
            "average_rating" => self.average_rating.into(),
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
        let value = json!({"id": 12});
        let visitor = Visitor::normalize(Raw::new(&value));
        assert_eq!(visitor.full_name, "بدون نام");
        assert_eq!(visitor.status, ReviewStatus::Pending);
        assert!(!visitor.is_featured);
        assert_eq!(visitor.total_ratings, 0);
        assert_eq!(visitor.created_at, "");
    }

    #[test]
    fn featured_visitor_keeps_review_status() {
        let value = json!({
            "id": 13,
            "full_name": "Neda",
            "status": "approved",
            "is_featured": true,
            "average_rating": 4.5
        });
        let visitor = Visitor::normalize(Raw::new(&value));
        assert_eq!(visitor.status, ReviewStatus::Approved);
        assert!(visitor.is_featured);
        assert_eq!(visitor.field("average_rating"), FieldValue::Number(4.5));
    }
}
