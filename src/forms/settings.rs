use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::settings::{FieldKind, SettingField, SettingsTab, SettingsValues, Theme};
use crate::domain::types::EmailAddress;
use crate::forms::{FormError, ascii_digits, optional_url};

/// Raw fields of one settings tab, keyed by field key.
pub type SettingsForm = BTreeMap<String, String>;

fn field_value(
    field: &SettingField,
    submitted: Option<&str>,
    current: Option<&String>,
) -> Result<String, FormError> {
    let raw = submitted.map(str::trim).unwrap_or_default();
    let value = match field.kind {
        FieldKind::Toggle => {
            let on = matches!(raw, "on" | "true" | "1");
            on.to_string()
        }
        // Secrets are never echoed back, so a blank input keeps the stored one.
        FieldKind::Secret if raw.is_empty() => current.cloned().unwrap_or_default(),
        FieldKind::Secret | FieldKind::Text => {
            if raw.chars().count() > 500 {
                return Err(FormError::InvalidValue(format!(
                    "{} نمی‌تواند بیشتر از ۵۰۰ کاراکتر باشد",
                    field.label
                )));
            }
            raw.to_string()
        }
        FieldKind::Email if raw.is_empty() => String::new(),
        FieldKind::Email => EmailAddress::new(raw)?.into_inner(),
        FieldKind::Url => optional_url(raw, field.label)?.unwrap_or_default(),
        FieldKind::Number if raw.is_empty() => field.default.to_string(),
        FieldKind::Number => {
            let number: i64 = ascii_digits(raw).parse().map_err(|_| {
                FormError::InvalidValue(format!("{} باید عدد صحیح باشد", field.label))
            })?;
            if !(field.min..=field.max).contains(&number) {
                return Err(FormError::InvalidValue(format!(
                    "{} باید بین {} و {} باشد",
                    field.label, field.min, field.max
                )));
            }
            number.to_string()
        }
        FieldKind::Choice => {
            if !field.options.contains(&raw) {
                return Err(FormError::InvalidValue(format!(
                    "مقدار {} معتبر نیست",
                    field.label
                )));
            }
            raw.to_string()
        }
    };
    Ok(value)
}

/// Validates a submitted tab against its field definitions.
///
/// Unknown keys are dropped; unticked toggles become `false`.
pub fn validate_tab(
    tab: SettingsTab,
    form: &SettingsForm,
    current: &SettingsValues,
) -> Result<SettingsValues, FormError> {
    tab.fields()
        .iter()
        .map(|field| {
            let value = field_value(
                field,
                form.get(field.key).map(String::as_str),
                current.get(field.key),
            )?;
            Ok((field.key.to_string(), value))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub theme: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

impl TryFrom<&ThemeForm> for Theme {
    type Error = FormError;

    fn try_from(form: &ThemeForm) -> Result<Self, Self::Error> {
        Theme::parse(&form.theme).ok_or(FormError::InvalidAction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> SettingsForm {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn email_tab_is_validated_and_defaulted() {
        let submitted = form(&[
            ("smtp_host", "smtp.asll.ir"),
            ("smtp_port", "۴۶۵"),
            ("smtp_encryption", "ssl"),
            ("from_email", "No-Reply@asll.ir"),
            ("unknown", "dropped"),
        ]);
        let values = validate_tab(SettingsTab::Email, &submitted, &SettingsValues::new()).unwrap();
        assert_eq!(values["smtp_port"], "465");
        assert_eq!(values["from_email"], "no-reply@asll.ir");
        assert_eq!(values["enabled"], "false");
        assert!(!values.contains_key("unknown"));
    }

    #[test]
    fn out_of_range_numbers_and_unknown_choices_fail() {
        let port = form(&[("smtp_port", "70000"), ("smtp_encryption", "tls")]);
        assert!(validate_tab(SettingsTab::Email, &port, &SettingsValues::new()).is_err());
        let choice = form(&[("smtp_encryption", "starttls")]);
        assert!(validate_tab(SettingsTab::Email, &choice, &SettingsValues::new()).is_err());
    }

    #[test]
    fn blank_secret_keeps_stored_value() {
        let mut current = SettingsValues::new();
        current.insert("bot_token".to_string(), "123:abc".to_string());
        let values = validate_tab(
            SettingsTab::Telegram,
            &form(&[("bot_token", ""), ("enabled", "on")]),
            &current,
        )
        .unwrap();
        assert_eq!(values["bot_token"], "123:abc");
        assert_eq!(values["enabled"], "true");
    }

    #[test]
    fn theme_must_be_known() {
        let dark = ThemeForm {
            theme: "dark".to_string(),
            return_to: None,
        };
        assert_eq!(Theme::try_from(&dark).unwrap(), Theme::Dark);
        let neon = ThemeForm {
            theme: "neon".to_string(),
            return_to: None,
        };
        assert!(Theme::try_from(&neon).is_err());
    }
}
