//! Create/edit dialogs of the editable resources.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use validator::Validate;

use crate::domain::ViewModel;
use crate::domain::admin::{Admin, AdminRole, AdminStatus};
use crate::domain::affiliate::Affiliate;
use crate::domain::auth::PERMISSIONS;
use crate::domain::education::{Education, EducationCategory, EducationLevel, PublishState};
use crate::domain::notification::{Notification, NotificationKind, NotificationPriority};
use crate::domain::popup::{Popup, PopupKind, PopupPosition};
use crate::domain::product::{Product, ProductStatus};
use crate::domain::research_product::{MarketLevel, ResearchProduct};
use crate::domain::slider::{Slider, SliderLinkType};
use crate::domain::types::{EmailAddress, SanitizedText};
use crate::domain::user::{User, UserStatus};
use crate::forms::{
    FormError, checked, optional_text, optional_url, parse_integer, parse_number, validate_phone,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update,
}

/// Dialog that creates or edits one record of `Model`'s resource.
pub trait RecordForm: DeserializeOwned + Validate {
    type Model: ViewModel;

    /// Builds the JSON body for the create or update endpoint.
    fn into_body(self, mode: SaveMode) -> Result<Value, FormError>;

    /// Validates the form and builds the body.
    fn payload(self, mode: SaveMode) -> Result<Value, FormError>
    where
        Self: Sized,
    {
        self.validate()?;
        self.into_body(mode)
    }
}

fn parse_choice<T>(raw: &str, parse: fn(&str) -> Option<T>, label: &str) -> Result<T, FormError> {
    parse(raw).ok_or_else(|| FormError::InvalidValue(format!("{label} را انتخاب کنید")))
}

/// Accepts `datetime-local` and plain date inputs.
fn parse_datetime(raw: &str, label: &str) -> Result<Option<NaiveDateTime>, FormError> {
    let Some(value) = optional_text(raw) else {
        return Ok(None);
    };
    NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map(Some)
        .map_err(|_| FormError::InvalidValue(format!("{label} معتبر نیست")))
}

fn iso(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Comma separated tags, trimmed and de-duplicated.
fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split([',', '،']).filter_map(optional_text) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn insert_optional(body: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::from(value));
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserForm {
    #[validate(length(min = 2, max = 50, message = "نام باید بین ۲ تا ۵۰ کاراکتر باشد"))]
    pub name: String,
    #[validate(email(message = "فرمت ایمیل معتبر نیست"))]
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub telegram_id: String,
    #[serde(default)]
    pub balance: String,
    pub status: String,
}

impl RecordForm for UserForm {
    type Model = User;

    fn into_body(self, _mode: SaveMode) -> Result<Value, FormError> {
        let telegram_id = optional_text(&self.telegram_id);
        if let Some(handle) = &telegram_id {
            let bare = handle.strip_prefix('@').unwrap_or(handle);
            if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(FormError::InvalidValue(
                    "فرمت آیدی تلگرام معتبر نیست".to_string(),
                ));
            }
        }
        let status = parse_choice(&self.status, UserStatus::parse, "وضعیت کاربر")?;

        Ok(json!({
            "name": self.name.trim(),
            "email": EmailAddress::new(self.email)?.into_inner(),
            "phone": validate_phone(&self.phone)?,
            "telegram_id": telegram_id.unwrap_or_default(),
            "balance": parse_number(&self.balance, "موجودی", 0.0, 1_000_000_000.0, 0.0)?,
            "status": status.as_str(),
            "is_active": status == UserStatus::Active,
        }))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminForm {
    #[validate(length(min = 2, max = 50, message = "نام باید بین ۲ تا ۵۰ کاراکتر باشد"))]
    pub name: String,
    #[validate(email(message = "فرمت ایمیل معتبر نیست"))]
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub telegram_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub status: String,
}

fn validate_username(username: &str) -> Result<(), FormError> {
    let valid_chars = username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !(3..=30).contains(&username.len()) || !valid_chars {
        return Err(FormError::InvalidValue(
            "نام کاربری باید ۳ تا ۳۰ کاراکتر و فقط شامل حروف انگلیسی، اعداد و _ باشد".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), FormError> {
    let strong = password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit());
    if !(8..=100).contains(&password.chars().count()) || !strong {
        return Err(FormError::InvalidValue(
            "رمز عبور باید حداقل ۸ کاراکتر و شامل حروف بزرگ، کوچک و عدد باشد".to_string(),
        ));
    }
    Ok(())
}

impl RecordForm for AdminForm {
    type Model = Admin;

    fn into_body(self, mode: SaveMode) -> Result<Value, FormError> {
        let telegram_id = optional_text(&self.telegram_id);
        if telegram_id
            .as_deref()
            .is_some_and(|id| !id.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(FormError::InvalidValue(
                "آیدی تلگرام باید فقط عدد باشد".to_string(),
            ));
        }
        let username = optional_text(&self.username);
        if let Some(username) = &username {
            validate_username(username)?;
        }
        let password = (!self.password.is_empty()).then_some(self.password);
        if let Some(password) = &password {
            validate_password(password)?;
        }
        if mode == SaveMode::Create
            && telegram_id.is_none()
            && (username.is_none() || password.is_none())
        {
            return Err(FormError::InvalidValue(
                "لطفا آیدی تلگرام را وارد کنید یا نام کاربری و رمز عبور را وارد کنید".to_string(),
            ));
        }

        let role = parse_choice(&self.role, AdminRole::parse, "نقش مدیر")?;
        let status = parse_choice(&self.status, AdminStatus::parse, "وضعیت مدیر")?;
        let mut permissions = Vec::new();
        for permission in self.permissions {
            if !PERMISSIONS.iter().any(|(key, _)| *key == permission) {
                return Err(FormError::InvalidValue(format!(
                    "دسترسی «{permission}» شناخته شده نیست"
                )));
            }
            if !permissions.contains(&permission) {
                permissions.push(permission);
            }
        }

        let mut body = Map::new();
        body.insert("name".into(), Value::from(self.name.trim()));
        body.insert(
            "email".into(),
            Value::from(EmailAddress::new(self.email)?.into_inner()),
        );
        body.insert("phone".into(), Value::from(validate_phone(&self.phone)?));
        body.insert("role".into(), Value::from(role.as_str()));
        body.insert("permissions".into(), Value::from(permissions));
        body.insert("status".into(), Value::from(status.as_str()));
        body.insert(
            "is_active".into(),
            Value::from(status == AdminStatus::Active),
        );
        insert_optional(&mut body, "telegram_id", telegram_id);
        insert_optional(&mut body, "username", username);
        insert_optional(&mut body, "password", password);
        Ok(Value::Object(body))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 2, max = 100, message = "نام محصول باید بین ۲ تا ۱۰۰ کاراکتر باشد"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "توضیحات نمی‌تواند بیشتر از ۲۰۰۰ کاراکتر باشد"))]
    pub description: String,
    pub price: String,
    #[validate(length(min = 1, message = "دسته‌بندی الزامی است"))]
    pub category: String,
    #[serde(default)]
    pub stock: String,
    pub status: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "کد محصول نمی‌تواند بیشتر از ۵۰ کاراکتر باشد"))]
    pub sku: String,
}

impl RecordForm for ProductForm {
    type Model = Product;

    fn into_body(self, _mode: SaveMode) -> Result<Value, FormError> {
        let description = optional_text(&self.description);
        if description.as_ref().is_some_and(|d| d.chars().count() < 10) {
            return Err(FormError::InvalidValue(
                "توضیحات باید حداقل ۱۰ کاراکتر باشد".to_string(),
            ));
        }
        let status = parse_choice(&self.status, ProductStatus::parse, "وضعیت محصول")?;

        Ok(json!({
            "name": self.name.trim(),
            "description": description.unwrap_or_default(),
            "price": parse_number(&self.price, "قیمت", 0.0, 1_000_000_000.0, 0.0)?,
            "category": self.category.trim(),
            "stock": parse_integer(&self.stock, "موجودی", 0, i64::from(i32::MAX), 0)?,
            "status": status.as_str(),
            "tags": split_tags(&self.tags),
            "image_url": optional_url(&self.image_url, "آدرس تصویر")?.unwrap_or_default(),
            "sku": self.sku.trim(),
        }))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EducationForm {
    #[validate(length(min = 5, max = 200, message = "عنوان باید بین ۵ تا ۲۰۰ کاراکتر باشد"))]
    pub title: String,
    #[validate(length(min = 10, max = 5000, message = "توضیحات باید بین ۱۰ تا ۵۰۰۰ کاراکتر باشد"))]
    pub description: String,
    pub category: String,
    pub level: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub status: String,
    #[serde(default)]
    pub is_free: Option<String>,
}

impl RecordForm for EducationForm {
    type Model = Education;

    fn into_body(self, _mode: SaveMode) -> Result<Value, FormError> {
        let category = parse_choice(&self.category, EducationCategory::parse, "دسته‌بندی محتوا")?;
        let level = parse_choice(&self.level, EducationLevel::parse, "سطح محتوا")?;
        let status = parse_choice(&self.status, PublishState::parse, "وضعیت محتوا")?;

        Ok(json!({
            "title": self.title.trim(),
            "description": self.description.trim(),
            "category": category.as_str(),
            "level": level.as_str(),
            "duration": parse_integer(&self.duration, "مدت زمان", 0, 1000, 0)?,
            "video_url": optional_url(&self.video_url, "آدرس ویدیو")?.unwrap_or_default(),
            "thumbnail_url": optional_url(&self.thumbnail_url, "آدرس تصویر")?.unwrap_or_default(),
            "status": status.as_str(),
            "is_free": checked(&self.is_free),
        }))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PopupForm {
    #[validate(length(min = 3, max = 200, message = "عنوان باید بین ۳ تا ۲۰۰ کاراکتر باشد"))]
    pub title: String,
    #[validate(length(min = 10, max = 5000, message = "متن باید بین ۱۰ تا ۵۰۰۰ کاراکتر باشد"))]
    pub message: String,
    pub kind: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub discount_url: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "متن دکمه نمی‌تواند بیشتر از ۱۰۰ کاراکتر باشد"))]
    pub button_text: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub show_close_button: Option<String>,
}

impl RecordForm for PopupForm {
    type Model = Popup;

    fn into_body(self, _mode: SaveMode) -> Result<Value, FormError> {
        let kind = parse_choice(&self.kind, PopupKind::parse, "نوع پاپ‌آپ")?;
        let position = PopupPosition::parse_or_default(optional_text(&self.position).as_deref());
        let start = parse_datetime(&self.start_date, "تاریخ شروع")?;
        let end = parse_datetime(&self.end_date, "تاریخ پایان")?;
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(FormError::InvalidValue(
                "تاریخ پایان باید بعد از تاریخ شروع باشد".to_string(),
            ));
        }

        let mut body = Map::new();
        body.insert("title".into(), Value::from(self.title.trim()));
        body.insert(
            "message".into(),
            Value::from(SanitizedText::new(self.message)?.into_inner()),
        );
        body.insert("type".into(), Value::from(kind.as_str()));
        body.insert("position".into(), Value::from(position.as_str()));
        body.insert(
            "discount_url".into(),
            Value::from(optional_url(&self.discount_url, "آدرس تخفیف")?.unwrap_or_default()),
        );
        body.insert("button_text".into(), Value::from(self.button_text.trim()));
        body.insert(
            "priority".into(),
            Value::from(parse_integer(&self.priority, "اولویت", 0, 100, 0)?),
        );
        body.insert("is_active".into(), Value::from(checked(&self.is_active)));
        body.insert(
            "show_close_button".into(),
            Value::from(checked(&self.show_close_button)),
        );
        insert_optional(&mut body, "start_date", start.map(iso));
        insert_optional(&mut body, "end_date", end.map(iso));
        Ok(Value::Object(body))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NotificationForm {
    #[validate(length(min = 3, max = 200, message = "عنوان باید بین ۳ تا ۲۰۰ کاراکتر باشد"))]
    pub title: String,
    #[validate(length(min = 10, max = 5000, message = "متن باید بین ۱۰ تا ۵۰۰۰ کاراکتر باشد"))]
    pub message: String,
    pub kind: String,
    pub priority: String,
    /// Blank sends the notification to every user.
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub action_url: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "متن دکمه نمی‌تواند بیشتر از ۱۰۰ کاراکتر باشد"))]
    pub action_text: String,
    #[serde(default)]
    pub expires_at: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl RecordForm for NotificationForm {
    type Model = Notification;

    fn into_body(self, _mode: SaveMode) -> Result<Value, FormError> {
        let kind = parse_choice(&self.kind, NotificationKind::parse, "نوع اعلان")?;
        let priority = parse_choice(&self.priority, NotificationPriority::parse, "اولویت")?;
        let user_id = optional_text(&self.user_id);
        if user_id
            .as_deref()
            .is_some_and(|id| !id.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(FormError::InvalidId);
        }

        let mut body = Map::new();
        body.insert("title".into(), Value::from(self.title.trim()));
        body.insert(
            "message".into(),
            Value::from(SanitizedText::new(self.message)?.into_inner()),
        );
        body.insert("type".into(), Value::from(kind.as_str()));
        body.insert("priority".into(), Value::from(priority.as_str()));
        body.insert("is_active".into(), Value::from(checked(&self.is_active)));
        body.insert(
            "action_url".into(),
            Value::from(optional_url(&self.action_url, "آدرس لینک")?.unwrap_or_default()),
        );
        body.insert("action_text".into(), Value::from(self.action_text.trim()));
        if let Some(user_id) = user_id.and_then(|id| id.parse::<i64>().ok()) {
            body.insert("user_id".into(), Value::from(user_id));
        }
        insert_optional(
            &mut body,
            "expires_at",
            parse_datetime(&self.expires_at, "تاریخ انقضا")?.map(iso),
        );
        Ok(Value::Object(body))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SliderForm {
    pub image_url: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub link_type: String,
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl RecordForm for SliderForm {
    type Model = Slider;

    fn into_body(self, _mode: SaveMode) -> Result<Value, FormError> {
        let Some(image_url) = optional_text(&self.image_url) else {
            return Err(FormError::InvalidValue("لطفا تصویر را مشخص کنید".to_string()));
        };
        if !image_url.starts_with('/') {
            optional_url(&image_url, "آدرس تصویر")?;
        }
        let link_type = SliderLinkType::parse_or_default(optional_text(&self.link_type).as_deref());
        let link = match (optional_text(&self.link), link_type) {
            (None, _) => String::new(),
            (Some(link), SliderLinkType::Internal) if link.starts_with('/') => link,
            (Some(_), SliderLinkType::Internal) => {
                return Err(FormError::InvalidValue(
                    "لینک داخلی باید با / شروع شود".to_string(),
                ));
            }
            (Some(link), SliderLinkType::External) => {
                optional_url(&link, "لینک خارجی")?.unwrap_or_default()
            }
        };

        Ok(json!({
            "image_url": image_url,
            "link": link,
            "link_type": link_type.as_str(),
            "order": parse_integer(&self.order, "ترتیب", 0, 1000, 0)?,
            "is_active": checked(&self.is_active),
        }))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResearchProductForm {
    #[validate(length(min = 2, max = 255, message = "نام محصول باید بین ۲ تا ۲۵۵ کاراکتر باشد"))]
    pub name: String,
    #[validate(length(min = 2, max = 100, message = "دسته‌بندی باید بین ۲ تا ۱۰۰ کاراکتر باشد"))]
    pub category: String,
    #[serde(default)]
    pub hs_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub export_value: String,
    #[serde(default)]
    pub import_value: String,
    #[serde(default)]
    pub market_demand: String,
    #[serde(default)]
    pub profit_potential: String,
    #[serde(default)]
    pub competition_level: String,
    #[serde(default)]
    pub target_country: String,
    #[serde(default)]
    pub iran_purchase_price: String,
    #[serde(default)]
    pub target_country_price: String,
    #[serde(default)]
    pub price_currency: String,
    #[serde(default)]
    pub target_countries: String,
    #[serde(default)]
    pub seasonal_factors: String,
    #[serde(default)]
    pub required_licenses: String,
    #[serde(default)]
    pub quality_standards: String,
    #[serde(default)]
    pub priority: String,
}

/// Blank leaves the level unset; anything else must be a known level.
fn optional_level(raw: &str, label: &str) -> Result<Option<MarketLevel>, FormError> {
    optional_text(raw)
        .map(|value| parse_choice(&value, MarketLevel::parse, label))
        .transpose()
}

impl RecordForm for ResearchProductForm {
    type Model = ResearchProduct;

    fn into_body(self, _mode: SaveMode) -> Result<Value, FormError> {
        let mut body = Map::new();
        body.insert("name".into(), Value::from(self.name.trim()));
        body.insert("category".into(), Value::from(self.category.trim()));
        body.insert(
            "price_currency".into(),
            Value::from(optional_text(&self.price_currency).unwrap_or_else(|| "USD".to_string())),
        );
        body.insert(
            "priority".into(),
            Value::from(parse_integer(&self.priority, "اولویت", 0, 10_000, 0)?),
        );
        for (key, raw, label) in [
            ("market_demand", &self.market_demand, "تقاضای بازار"),
            ("profit_potential", &self.profit_potential, "پتانسیل سود"),
            ("competition_level", &self.competition_level, "سطح رقابت"),
        ] {
            insert_optional(
                &mut body,
                key,
                optional_level(raw, label)?.map(|level| level.as_str().to_string()),
            );
        }
        let description = optional_text(&self.description)
            .map(SanitizedText::new)
            .transpose()?
            .map(SanitizedText::into_inner);
        insert_optional(&mut body, "description", description);
        for (key, raw) in [
            ("hs_code", self.hs_code),
            ("export_value", self.export_value),
            ("import_value", self.import_value),
            ("target_country", self.target_country),
            ("iran_purchase_price", self.iran_purchase_price),
            ("target_country_price", self.target_country_price),
            ("target_countries", self.target_countries),
            ("seasonal_factors", self.seasonal_factors),
            ("required_licenses", self.required_licenses),
            ("quality_standards", self.quality_standards),
        ] {
            insert_optional(&mut body, key, optional_text(&raw));
        }
        Ok(Value::Object(body))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AffiliateForm {
    #[validate(length(min = 2, max = 100, message = "نام باید بین ۲ تا ۱۰۰ کاراکتر باشد"))]
    pub name: String,
    /// Fixed once the affiliate exists.
    #[serde(default)]
    pub username: String,
    /// Blank keeps the current password on update.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub balance: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl RecordForm for AffiliateForm {
    type Model = Affiliate;

    fn into_body(self, mode: SaveMode) -> Result<Value, FormError> {
        let password = (!self.password.is_empty()).then_some(self.password);
        if password.as_ref().is_some_and(|password| password.chars().count() < 6) {
            return Err(FormError::InvalidValue(
                "رمز عبور باید حداقل ۶ کاراکتر باشد".to_string(),
            ));
        }

        let mut body = Map::new();
        body.insert("name".into(), Value::from(self.name.trim()));
        match mode {
            SaveMode::Create => {
                let username = self.username.trim();
                if username.is_empty() || password.is_none() {
                    return Err(FormError::InvalidValue(
                        "نام، نام کاربری و رمز عبور (حداقل ۶ کاراکتر) الزامی است".to_string(),
                    ));
                }
                body.insert("username".into(), Value::from(username));
            }
            SaveMode::Update => {
                body.insert("is_active".into(), Value::from(checked(&self.is_active)));
                if optional_text(&self.balance).is_some() {
                    body.insert(
                        "balance".into(),
                        Value::from(parse_number(&self.balance, "موجودی", 0.0, 1e12, 0.0)?),
                    );
                }
            }
        }
        insert_optional(&mut body, "password", password);
        Ok(Value::Object(body))
    }
}
