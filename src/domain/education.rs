use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::status_enum;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    EducationCategory, default = Video {
        Video => ("video", "ویدیو"),
        Article => ("article", "مقاله"),
        Course => ("course", "دوره"),
        Tutorial => ("tutorial", "آموزش"),
        Documentation => ("documentation", "مستندات"),
        Other => ("other", "سایر"),
    }
);

status_enum!(
    EducationLevel, default = Beginner {
        Beginner => ("beginner", "مقدماتی"),
        Intermediate => ("intermediate", "متوسط"),
        Advanced => ("advanced", "پیشرفته"),
    }
);

status_enum!(
    PublishState, default = Published {
        Draft => ("draft", "پیش‌نویس"),
        Published => ("published", "منتشر شده"),
        Archived => ("archived", "بایگانی"),
    }
);

/// Training video or article shown in the learning section.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Education {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: EducationCategory,
    pub level: EducationLevel,
    pub duration_minutes: i64,
    pub video_url: String,
    pub thumbnail_url: String,
    pub status: PublishState,
    pub is_free: bool,
    pub views: i64,
    pub created_at: String,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه").hidden(),
    Column::new("title", "عنوان").sortable(),
    Column::new("category", "دسته").sortable(),
    Column::new("level", "سطح").sortable(),
    Column::new("duration_minutes", "مدت (دقیقه)").hidden(),
    Column::new("status", "وضعیت").sortable(),
    Column::new("is_free", "رایگان").hidden(),
    Column::new("views", "بازدید").sortable(),
    Column::new("created_at", "تاریخ ایجاد").sortable(),
];

impl ViewModel for Education {
    const RESOURCE: Resource = Resource::Education;

    fn normalize(raw: Raw<'_>) -> Self {
        Self {
            id: raw.id(),
            title: raw.text_or(&["title", "name"], "بدون عنوان"),
            description: raw.text_or(&["description"], ""),
            category: EducationCategory::parse_or_default(raw.text(&["category"]).as_deref()),
            level: EducationLevel::parse_or_default(raw.text(&["level"]).as_deref()),
            duration_minutes: raw.integer_or(&["duration", "duration_minutes"], 0),
            video_url: raw.text_or(&["video_url", "videoUrl", "url", "file_url"], ""),
            thumbnail_url: raw.text_or(&["thumbnail_url", "thumbnailUrl", "thumbnail"], ""),
            status: PublishState::parse_or_default(raw.text(&["status"]).as_deref()),
            is_free: raw.flag_or(&["is_free", "isFree"], true),
            views: raw.integer_or(&["views", "view_count"], 0),
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
            "category" => self.category.label().into(),
            "level" => self.level.label().into(),
            "duration_minutes" => self.duration_minutes.into(),
            "status" => self.status.label().into(),
            "is_free" => self.is_free.into(),
            "views" => self.views.into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Empty,
        }
    }
}
