use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::{ReviewStatus, status_enum};
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    /// Operational state derived from the registration review.
    SupplierState, default = Inactive {
        Active => ("active", "فعال"),
        Inactive => ("inactive", "در انتظار تایید"),
        Suspended => ("suspended", "رد شده"),
    }
);

impl From<ReviewStatus> for SupplierState {
    fn from(review: ReviewStatus) -> Self {
        match review {
            ReviewStatus::Approved => SupplierState::Active,
            ReviewStatus::Pending => SupplierState::Inactive,
            ReviewStatus::Rejected => SupplierState::Suspended,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub review_status: ReviewStatus,
    pub status: SupplierState,
    pub is_featured: bool,
    pub rating: f64,
    pub notes: String,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("name", "نام").sortable(),
    Column::new("company_name", "برند").sortable(),
    Column::new("phone", "موبایل"),
    Column::new("email", "ایمیل").hidden(),
    Column::new("city", "شهر").sortable(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("is_featured", "ویژه").sortable(),
    Column::new("rating", "امتیاز").sortable(),
    Column::new("created_at", "تاریخ ثبت").sortable(),
];

impl ViewModel for Supplier {
    const RESOURCE: Resource = Resource::Suppliers;

    fn normalize(raw: Raw<'_>) -> Self {
        let review_status = ReviewStatus::parse_or_default(raw.text(&["status"]).as_deref());

        Self {
            id: raw.id(),
            name: raw.text_or(&["full_name", "name"], "بدون نام"),
            company_name: raw.text_or(&["brand_name", "company_name", "companyName"], ""),
            email: raw.text_or(&["email", "user.email"], ""),
            phone: raw.text_or(&["mobile", "phone"], ""),
            city: raw.text_or(&["city"], ""),
            address: raw.text_or(&["address"], ""),
            review_status,
            status: review_status.into(),
            is_featured: raw.flag_or(&["is_featured"], false),
            rating: raw.number_or(&["average_rating", "rating"], 0.0),
            notes: raw.text_or(&["admin_notes", "notes"], ""),
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
            "company_name" => self.company_name.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "email" => self.email.as_str().into(),
            "city" => self.city.as_str().into(),
            "status" => self.status.label().into(),
            "is_featured" => self.is_featured.into(),
            "rating" => self.rating.into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
