use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::status_enum;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    ProductStatus, default = Active {
        Active => ("active", "فعال"),
        Inactive => ("inactive", "غیرفعال"),
        OutOfStock => ("out_of_stock", "ناموجود"),
    }
);

/// Product offered in the "available products" catalogue.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub status: ProductStatus,
    pub tags: Vec<String>,
    pub image_url: String,
    pub sku: String,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("name", "نام محصول").sortable(),
    Column::new("category", "دسته‌بندی").sortable(),
    Column::new("price", "قیمت").sortable(),
    Column::new("stock", "موجودی").sortable(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("sku", "کد کالا").hidden(),
    Column::new("tags", "برچسب‌ها").hidden(),
    Column::new("created_at", "تاریخ ثبت").sortable(),
];

impl ViewModel for Product {
    const RESOURCE: Resource = Resource::Products;

    fn normalize(raw: Raw<'_>) -> Self {
        let image_url = raw
            .strings(&["image_urls"])
            .into_iter()
            .next()
            .or_else(|| raw.text(&["image_url", "imageUrl"]))
            .unwrap_or_default();

        Self {
            id: raw.id(),
            name: raw.text_or(&["product_name", "name"], "بدون نام"),
            description: raw.text_or(&["description"], ""),
            price: raw.number_or(
                &["wholesale_price", "retail_price", "export_price", "price"],
                0.0,
            ),
            category: raw.text_or(&["category"], ""),
            stock: raw.integer_or(&["available_quantity", "stock", "quantity"], 0),
            status: ProductStatus::parse_or_default(raw.text(&["status"]).as_deref()),
            tags: raw.strings(&["tags"]),
            image_url,
            sku: raw.text_or(&["sku"], ""),
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
            "category" => self.category.as_str().into(),
            "price" => self.price.into(),
            "stock" => self.stock.into(),
            "status" => self.status.label().into(),
            "sku" => self.sku.as_str().into(),
            "tags" => self.tags.join(", ").into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
