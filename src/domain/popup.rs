use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::{ActiveState, status_enum};
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    PopupKind, default = Modal {
        Modal => ("modal", "پنجره"),
        Banner => ("banner", "بنر"),
        Slide => ("slide", "کشویی"),
    }
);

status_enum!(
    PopupPosition, default = Center {
        Center => ("center", "وسط"),
        Top => ("top", "بالا"),
        Bottom => ("bottom", "پایین"),
    }
);

/// Marketing popup shown to site visitors.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Popup {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: PopupKind,
    pub position: PopupPosition,
    pub discount_url: String,
    pub button_text: String,
    pub status: ActiveState,
    pub priority: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub show_close_button: bool,
    pub display_count: i64,
    pub click_count: i64,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("title", "عنوان").sortable(),
    Column::new("kind", "نوع"),
    Column::new("status", "وضعیت").sortable(),
    Column::new("priority", "اولویت").sortable(),
    Column::new("start_date", "شروع").hidden(),
    Column::new("end_date", "پایان").hidden(),
    Column::new("display_count", "نمایش").sortable(),
    Column::new("click_count", "کلیک").sortable(),
    Column::new("created_at", "تاریخ ایجاد").sortable(),
];

impl ViewModel for Popup {
    const RESOURCE: Resource = Resource::Popups;

    fn normalize(raw: Raw<'_>) -> Self {
        let status = raw
            .text(&["status"])
            .and_then(|status| ActiveState::parse(&status))
            .unwrap_or_else(|| ActiveState::from_flag(raw.flag_or(&["is_active"], false)));

        Self {
            id: raw.id(),
            title: raw.text_or(&["title"], "بدون عنوان"),
            message: raw.text_or(&["message", "content"], ""),
            kind: PopupKind::parse_or_default(raw.text(&["type", "kind"]).as_deref()),
            position: PopupPosition::parse_or_default(raw.text(&["position"]).as_deref()),
            discount_url: raw.text_or(&["discount_url", "link_url"], ""),
            button_text: raw.text_or(&["button_text"], ""),
            status,
            priority: raw.integer_or(&["priority"], 0),
            start_date: raw.timestamp_opt(&["start_date"]),
            end_date: raw.timestamp_opt(&["end_date"]),
            show_close_button: raw.flag_or(&["show_close_button", "close_button"], true),
            display_count: raw.integer_or(&["display_count", "show_count"], 0),
            click_count: raw.integer_or(&["click_count"], 0),
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
            "title" => self.title.as_str().into(),
            "kind" => self.kind.label().into(),
            "status" => self.status.label().into(),
            "priority" => self.priority.into(),
            "start_date" => self.start_date.clone().into(),
            "end_date" => self.end_date.clone().into(),
            "display_count" => self.display_count.into(),
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
        let value = json!({"id": 1});
        let popup = Popup::normalize(Raw::new(&value));
        assert_eq!(popup.kind, PopupKind::Modal);
        assert_eq!(popup.position, PopupPosition::Center);
        assert_eq!(popup.status, ActiveState::Inactive);
        assert!(popup.show_close_button);
        assert_eq!(popup.display_count, 0);
    }

    #[test]
    fn show_count_alias_and_active_flag() {
        let value = json!({"id": 2, "is_active": true, "show_count": 31, "close_button": false});
        let popup = Popup::normalize(Raw::new(&value));
        assert_eq!(popup.status, ActiveState::Active);
        assert_eq!(popup.display_count, 31);
        assert!(!popup.show_close_button);
    }
}
