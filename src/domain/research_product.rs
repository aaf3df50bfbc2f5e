use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::{ActiveState, status_enum};
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    /// Shared scale of demand, profit potential and competition.
    MarketLevel, default = Medium {
        High => ("high", "بالا"),
        Medium => ("medium", "متوسط"),
        Low => ("low", "پایین"),
    }
);

/// Export market research entry for one product.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ResearchProduct {
    pub id: String,
    pub name: String,
    pub hs_code: String,
    pub category: String,
    pub description: String,
    pub target_country: String,
    pub export_value: String,
    pub import_value: String,
    pub market_demand: Option<MarketLevel>,
    pub profit_potential: Option<MarketLevel>,
    pub competition_level: Option<MarketLevel>,
    pub iran_purchase_price: String,
    pub target_country_price: String,
    pub price_currency: String,
    pub priority: i64,
    pub status: ActiveState,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("name", "نام محصول").sortable(),
    Column::new("hs_code", "کد HS"),
    Column::new("category", "دسته‌بندی").sortable(),
    Column::new("target_country", "کشور هدف"),
    Column::new("market_demand", "تقاضای بازار").sortable(),
    Column::new("profit_potential", "پتانسیل سود").hidden(),
    Column::new("competition_level", "سطح رقابت").hidden(),
    Column::new("priority", "اولویت").sortable(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("created_at", "تاریخ ثبت").sortable(),
];

fn level(raw: &Raw<'_>, key: &str) -> Option<MarketLevel> {
    raw.text(&[key]).and_then(|value| MarketLevel::parse(&value))
}

fn level_label(level: Option<MarketLevel>) -> FieldValue {
    level.map(MarketLevel::label).unwrap_or_default().into()
}

impl ViewModel for ResearchProduct {
    const RESOURCE: Resource = Resource::ResearchProducts;

    fn normalize(raw: Raw<'_>) -> Self {
        // Research entries are listed as active unless the backend says otherwise.
        let status = raw
            .text(&["status"])
            .and_then(|status| ActiveState::parse(&status))
            .unwrap_or(ActiveState::Active);

        Self {
            id: raw.id(),
            name: raw.text_or(&["name", "product_name"], "بدون نام"),
            hs_code: raw.text_or(&["hs_code"], ""),
            category: raw.text_or(&["category"], ""),
            description: raw.text_or(&["description"], ""),
            target_country: raw.text_or(&["target_country"], ""),
            export_value: raw.text_or(&["export_value"], ""),
            import_value: raw.text_or(&["import_value"], ""),
            market_demand: level(&raw, "market_demand"),
            profit_potential: level(&raw, "profit_potential"),
            competition_level: level(&raw, "competition_level"),
            iran_purchase_price: raw.text_or(&["iran_purchase_price"], ""),
            target_country_price: raw.text_or(&["target_country_price"], ""),
            price_currency: raw.text_or(&["price_currency"], "USD"),
            priority: raw.integer_or(&["priority"], 0),
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
            "hs_code" => self.hs_code.as_str().into(),
            "category" => self.category.as_str().into(),
            "target_country" => self.target_country.as_str().into(),
            "market_demand" => level_label(self.market_demand),
            "profit_potential" => level_label(self.profit_potential),
            "competition_level" => level_label(self.competition_level),
            "priority" => self.priority.into(),
            "status" => self.status.label().into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
