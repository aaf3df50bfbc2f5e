use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::{ActiveState, status_enum};
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    SliderLinkType, default = Internal {
        Internal => ("internal", "داخلی"),
        External => ("external", "خارجی"),
    }
);

/// Home page slide: an image with an optional link.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Slider {
    pub id: String,
    pub image_url: String,
    pub link: String,
    pub link_type: SliderLinkType,
    pub status: ActiveState,
    pub order: i64,
    pub click_count: i64,
    pub view_count: i64,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").sortable(),
    Column::new("image_url", "تصویر").hidden(),
    Column::new("link", "لینک"),
    Column::new("link_type", "نوع لینک"),
    Column::new("status", "وضعیت").sortable(),
    Column::new("order", "ترتیب").sortable(),
    Column::new("view_count", "نمایش").sortable(),
    Column::new("click_count", "کلیک").sortable(),
    Column::new("created_at", "تاریخ ایجاد").sortable(),
];

impl ViewModel for Slider {
    const RESOURCE: Resource = Resource::Sliders;

    fn normalize(raw: Raw<'_>) -> Self {
        Self {
            id: raw.id(),
            image_url: raw.text_or(&["image_url", "imageUrl", "image"], ""),
            link: raw.text_or(&["link", "link_url"], ""),
            link_type: SliderLinkType::parse_or_default(raw.text(&["link_type"]).as_deref()),
            status: ActiveState::from_flag(raw.flag_or(&["is_active"], false)),
            order: raw.integer_or(&["order", "sort_order"], 0),
            click_count: raw.integer_or(&["click_count"], 0),
            view_count: raw.integer_or(&["view_count"], 0),
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
            "image_url" => self.image_url.as_str().into(),
            "link" => self.link.as_str().into(),
            "link_type" => self.link_type.label().into(),
            "status" => self.status.label().into(),
            "order" => self.order.into(),
            "view_count" => self.view_count.into(),
            "click_count" => self.click_count.into(),
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
        let value = json!({"id": 3});
        let slider = Slider::normalize(Raw::new(&value));
        assert_eq!(slider.link_type, SliderLinkType::Internal);
        assert_eq!(slider.status, ActiveState::Inactive);
        assert_eq!(slider.order, 0);
        assert_eq!(slider.link, "");
    }

    #[test]
    fn external_links_and_counters() {
        let value = json!({
            "id": 4,
            "image_url": "/uploads/sliders/a.webp",
            "link": "https://asllmarket.com/offer",
            "link_type": "external",
            "is_active": true,
            "order": "2",
            "view_count": 140,
            "click_count": 12
        });
        let slider = Slider::normalize(Raw::new(&value));
        assert_eq!(slider.link_type, SliderLinkType::External);
        assert!(slider.status.is_active());
        assert_eq!(slider.order, 2);
        assert_eq!(slider.field("view_count"), FieldValue::Number(140.0));
    }
}
