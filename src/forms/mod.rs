//! Form definitions backing the panel's dialogs.
//!
//! Every form is decoded with `serde_html_form` (so repeated keys such as
//! `ids` or `columns` collect into vectors), validated with `validator` and
//! then converted into the backend payload it stands for.

use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::ValidationErrors;

pub mod actions;
pub mod auth;
pub mod bulk;
pub mod export;
pub mod records;
pub mod settings;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("اطلاعات فرم معتبر نیست: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("فرم قابل خواندن نیست")]
    Malformed(String),

    #[error("شناسه نامعتبر است")]
    InvalidId,

    #[error("فرمت ایمیل معتبر نیست")]
    InvalidEmail,

    #[error("نام الزامی است")]
    InvalidName,

    #[error("عملیات انتخاب شده معتبر نیست")]
    InvalidAction,

    #[error("برای این عملیات تایید لازم است")]
    ConfirmationRequired,

    #[error("برای رد کردن، توضیحات الزامی است")]
    MissingNotes,

    #[error("{0}")]
    InvalidValue(String),
}

/// Decodes an `application/x-www-form-urlencoded` body.
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, FormError> {
    serde_html_form::from_bytes(body).map_err(|err| FormError::Malformed(err.to_string()))
}

/// Trimmed value, `None` when blank.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// HTML checkboxes are only submitted when ticked.
pub(crate) fn checked(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v, "on" | "true" | "1" | "yes"))
}

/// Maps Persian and Arabic-Indic digits onto ASCII.
pub(crate) fn ascii_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            other => other,
        })
        .collect()
}

/// Parses a number typed into `label`, accepting Persian digits and
/// thousands separators. Blank input yields `default`.
pub(crate) fn parse_number(
    raw: &str,
    label: &str,
    min: f64,
    max: f64,
    default: f64,
) -> Result<f64, FormError> {
    let cleaned: String = ascii_digits(raw)
        .chars()
        .filter(|c| !matches!(c, ',' | '،' | '٬' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(default);
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| FormError::InvalidValue(format!("{label} باید عدد باشد")))?;
    if !(min..=max).contains(&value) {
        return Err(FormError::InvalidValue(format!(
            "{label} باید بین {min} و {max} باشد"
        )));
    }
    Ok(value)
}

pub(crate) fn parse_integer(
    raw: &str,
    label: &str,
    min: i64,
    max: i64,
    default: i64,
) -> Result<i64, FormError> {
    let value = parse_number(raw, label, min as f64, max as f64, default as f64)?;
    if value.fract() != 0.0 {
        return Err(FormError::InvalidValue(format!("{label} باید عدد صحیح باشد")));
    }
    Ok(value as i64)
}

/// Phone numbers must carry 10 or 11 digits once separators are dropped.
pub(crate) fn validate_phone(raw: &str) -> Result<String, FormError> {
    let normalized = ascii_digits(raw.trim());
    let digits = normalized.chars().filter(char::is_ascii_digit).count();
    let allowed = normalized
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+'));
    if !allowed || !(10..=11).contains(&digits) {
        return Err(FormError::InvalidValue(
            "شماره تلفن باید ۱۰ یا ۱۱ رقم باشد".to_string(),
        ));
    }
    Ok(normalized)
}

/// Optional absolute URL.
pub(crate) fn optional_url(raw: &str, label: &str) -> Result<Option<String>, FormError> {
    match optional_text(raw) {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(Some(url)),
        Some(_) => Err(FormError::InvalidValue(format!("{label} معتبر نیست"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persian_digits_and_separators_are_accepted() {
        assert_eq!(parse_number("۲٬۵۰۰", "مبلغ", 0.0, 1e9, 0.0).unwrap(), 2500.0);
        assert_eq!(parse_number("۲,۵۰۰", "مبلغ", 0.0, 1e9, 0.0).unwrap(), 2500.0);
        assert_eq!(parse_number("  ", "مبلغ", 0.0, 1e9, 7.0).unwrap(), 7.0);
        assert!(parse_number("-1", "مبلغ", 0.0, 1e9, 0.0).is_err());
    }

    #[test]
    fn integers_reject_fractions() {
        assert_eq!(parse_integer("12", "تعداد", 1, 100, 1).unwrap(), 12);
        assert!(parse_integer("1.5", "تعداد", 1, 100, 1).is_err());
        assert!(parse_integer("101", "تعداد", 1, 100, 1).is_err());
    }

    #[test]
    fn phone_numbers_need_ten_or_eleven_digits() {
        assert_eq!(validate_phone("۰۹۱۲ ۳۴۵ ۶۷۸۹").unwrap(), "0912 345 6789");
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("0912abc4567").is_err());
    }

    #[test]
    fn checkboxes_and_urls() {
        assert!(checked(&Some("on".to_string())));
        assert!(!checked(&None));
        assert_eq!(optional_url("", "آدرس").unwrap(), None);
        assert!(optional_url("javascript:alert(1)", "آدرس").is_err());
    }
}
