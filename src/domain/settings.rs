//! Panel settings tabs and theme preference.
//!
//! Settings are local to the panel: each tab is stored as one JSON object
//! under `asll-settings-{tab}` and never synced to the backend.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::types::status_enum;

/// Store key of the theme preference.
pub const THEME_KEY: &str = "asll-theme";

status_enum!(
    SettingsTab, default = General {
        General => ("general", "عمومی"),
        Email => ("email", "ایمیل"),
        Sms => ("sms", "پیامک"),
        Telegram => ("telegram", "تلگرام"),
        Payment => ("payment", "پرداخت"),
        Security => ("security", "امنیت"),
        Display => ("display", "نمایش"),
        Api => ("api", "API"),
    }
);

status_enum!(
    Theme, default = Light {
        Light => ("light", "روشن"),
        Dark => ("dark", "تاریک"),
    }
);

/// Input type of a settings field; drives both rendering and validation.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Number,
    Toggle,
    Secret,
    Choice,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct SettingField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
    /// Allowed values for [`FieldKind::Choice`].
    pub options: &'static [&'static str],
    /// Inclusive bounds for [`FieldKind::Number`].
    pub min: i64,
    pub max: i64,
}

impl SettingField {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            default: "",
            options: &[],
            min: 0,
            max: 0,
        }
    }

    const fn default_value(mut self, value: &'static str) -> Self {
        self.default = value;
        self
    }

    const fn range(mut self, min: i64, max: i64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    const fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }
}

/// Persisted values of one tab keyed by field key.
pub type SettingsValues = BTreeMap<String, String>;

const GENERAL: &[SettingField] = &[
    SettingField::new("site_name", "نام سایت", FieldKind::Text),
    SettingField::new("site_description", "توضیحات سایت", FieldKind::Text),
    SettingField::new("site_url", "آدرس سایت", FieldKind::Url),
    SettingField::new("contact_email", "ایمیل تماس", FieldKind::Email),
    SettingField::new("contact_phone", "تلفن تماس", FieldKind::Text),
    SettingField::new("timezone", "منطقه زمانی", FieldKind::Text).default_value("Asia/Tehran"),
    SettingField::new("language", "زبان", FieldKind::Choice)
        .default_value("fa")
        .options(&["fa", "en"]),
    SettingField::new("currency", "واحد پول", FieldKind::Choice)
        .default_value("IRR")
        .options(&["IRR", "USD"]),
];

const EMAIL: &[SettingField] = &[
    SettingField::new("smtp_host", "سرور SMTP", FieldKind::Text),
    SettingField::new("smtp_port", "پورت", FieldKind::Number)
        .default_value("587")
        .range(1, 65535),
    SettingField::new("smtp_username", "نام کاربری", FieldKind::Text),
    SettingField::new("smtp_password", "رمز عبور", FieldKind::Secret),
    SettingField::new("smtp_encryption", "رمزنگاری", FieldKind::Choice)
        .default_value("tls")
        .options(&["tls", "ssl", "none"]),
    SettingField::new("from_email", "ایمیل فرستنده", FieldKind::Email),
    SettingField::new("from_name", "نام فرستنده", FieldKind::Text),
    SettingField::new("enabled", "فعال", FieldKind::Toggle).default_value("true"),
];

const SMS: &[SettingField] = &[
    SettingField::new("provider", "سرویس‌دهنده", FieldKind::Choice)
        .default_value("kavenegar")
        .options(&["kavenegar", "ghasedak", "melipayamak"]),
    SettingField::new("api_key", "کلید API", FieldKind::Secret),
    SettingField::new("sender_number", "شماره فرستنده", FieldKind::Text),
    SettingField::new("template_id", "شناسه قالب", FieldKind::Text),
    SettingField::new("enabled", "فعال", FieldKind::Toggle).default_value("true"),
];

const TELEGRAM: &[SettingField] = &[
    SettingField::new("bot_token", "توکن ربات", FieldKind::Secret),
    SettingField::new("chat_id", "شناسه چت", FieldKind::Text),
    SettingField::new("enabled", "فعال", FieldKind::Toggle).default_value("true"),
];

const PAYMENT: &[SettingField] = &[
    SettingField::new("gateway", "درگاه", FieldKind::Choice)
        .default_value("zarinpal")
        .options(&["zarinpal", "idpay", "nextpay"]),
    SettingField::new("merchant_id", "شناسه پذیرنده", FieldKind::Text),
    SettingField::new("api_key", "کلید API", FieldKind::Secret),
    SettingField::new("sandbox", "حالت آزمایشی", FieldKind::Toggle).default_value("false"),
    SettingField::new("enabled", "فعال", FieldKind::Toggle).default_value("true"),
];

const SECURITY: &[SettingField] = &[
    SettingField::new("two_factor_enabled", "ورود دو مرحله‌ای", FieldKind::Toggle)
        .default_value("false"),
    SettingField::new("session_timeout", "مهلت نشست (دقیقه)", FieldKind::Number)
        .default_value("60")
        .range(5, 1440),
    SettingField::new("max_login_attempts", "حداکثر تلاش ورود", FieldKind::Number)
        .default_value("5")
        .range(1, 20),
    SettingField::new("lockout_duration", "مدت قفل (دقیقه)", FieldKind::Number)
        .default_value("15")
        .range(1, 1440),
    SettingField::new("password_min_length", "حداقل طول رمز", FieldKind::Number)
        .default_value("8")
        .range(6, 64),
    SettingField::new("require_strong_password", "رمز قوی", FieldKind::Toggle)
        .default_value("true"),
];

const DISPLAY: &[SettingField] = &[
    SettingField::new("items_per_page", "تعداد در صفحه", FieldKind::Number)
        .default_value("20")
        .range(5, 100),
    SettingField::new("date_format", "قالب تاریخ", FieldKind::Choice)
        .default_value("YYYY/MM/DD")
        .options(&["YYYY/MM/DD", "DD/MM/YYYY"]),
    SettingField::new("time_format", "قالب ساعت", FieldKind::Choice)
        .default_value("24")
        .options(&["12", "24"]),
    SettingField::new("rtl", "راست به چپ", FieldKind::Toggle).default_value("true"),
    SettingField::new("show_notifications", "نمایش اعلان‌ها", FieldKind::Toggle)
        .default_value("true"),
    SettingField::new("show_breadcrumbs", "نمایش مسیر", FieldKind::Toggle).default_value("true"),
];

const API: &[SettingField] = &[
    SettingField::new("api_enabled", "API فعال", FieldKind::Toggle).default_value("true"),
    SettingField::new("api_key", "کلید API", FieldKind::Secret),
    SettingField::new("rate_limit", "محدودیت درخواست", FieldKind::Number)
        .default_value("100")
        .range(1, 10000),
    SettingField::new("rate_limit_window", "بازه محدودیت (ثانیه)", FieldKind::Number)
        .default_value("60")
        .range(1, 3600),
];

impl SettingsTab {
    pub fn storage_key(self) -> String {
        format!("asll-settings-{}", self.as_str())
    }

    pub const fn fields(self) -> &'static [SettingField] {
        match self {
            SettingsTab::General => GENERAL,
            SettingsTab::Email => EMAIL,
            SettingsTab::Sms => SMS,
            SettingsTab::Telegram => TELEGRAM,
            SettingsTab::Payment => PAYMENT,
            SettingsTab::Security => SECURITY,
            SettingsTab::Display => DISPLAY,
            SettingsTab::Api => API,
        }
    }

    /// Default values for every field of the tab.
    pub fn defaults(self) -> SettingsValues {
        self.fields()
            .iter()
            .map(|field| (field.key.to_string(), field.default.to_string()))
            .collect()
    }
}
