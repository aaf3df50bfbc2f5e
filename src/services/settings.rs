//! Locally stored panel settings and the theme preference.

use chrono::Utc;
use serde_json::Value;

use crate::domain::settings::{SettingsTab, SettingsValues, THEME_KEY, Theme};
use crate::domain::store::NewStoreEntry;
use crate::dto::pages::SettingsPage;
use crate::forms::settings::{SettingsForm, ThemeForm, validate_tab};
use crate::repository::{StoreReader, StoreWriter};
use crate::services::{ServiceError, ServiceResult};

const SETTINGS_PREFIX: &str = "asll-settings-";

/// Stored values of `tab` layered over its defaults.
pub fn load_tab<R>(repo: &R, tab: SettingsTab) -> ServiceResult<SettingsValues>
where
    R: StoreReader + ?Sized,
{
    let mut values = tab.defaults();
    let entry = repo.get_entry(&tab.storage_key()).map_err(|err| {
        log::error!("Failed to load {} settings: {err}", tab.as_str());
        err
    })?;

    if let Some(entry) = entry {
        match serde_json::from_value::<SettingsValues>(entry.value) {
            Ok(stored) => {
                for (key, value) in stored {
                    if values.contains_key(&key) {
                        values.insert(key, value);
                    }
                }
            }
            Err(err) => log::warn!("Ignoring malformed {} settings: {err}", tab.as_str()),
        }
    }

    Ok(values)
}

pub fn settings_page<R>(repo: &R, tab: SettingsTab) -> ServiceResult<SettingsPage>
where
    R: StoreReader + ?Sized,
{
    let values = load_tab(repo, tab)?;
    Ok(SettingsPage::new(tab, &values))
}

/// Validates and stores one tab. Blank secrets keep the stored value.
pub fn save_tab<R>(repo: &R, tab: SettingsTab, form: &SettingsForm) -> ServiceResult<SettingsValues>
where
    R: StoreReader + StoreWriter + ?Sized,
{
    let current = load_tab(repo, tab)?;
    let values = validate_tab(tab, form, &current)?;

    let value = serde_json::to_value(&values)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    let entry = NewStoreEntry::new(tab.storage_key(), value, Utc::now().naive_utc());
    repo.put_entry(&entry).map_err(|err| {
        log::error!("Failed to save {} settings: {err}", tab.as_str());
        err
    })?;
    log::info!("Saved {} settings", tab.as_str());

    Ok(values)
}

/// Drops every stored tab so all settings fall back to their defaults.
pub fn reset_settings<R>(repo: &R) -> ServiceResult<usize>
where
    R: StoreWriter + ?Sized,
{
    let removed = repo.invalidate_prefix(SETTINGS_PREFIX).map_err(|err| {
        log::error!("Failed to reset settings: {err}");
        err
    })?;
    log::info!("Reset settings, {removed} tabs removed");
    Ok(removed)
}

/// Theme preference; a missing or broken entry means the light theme.
pub fn load_theme<R>(repo: &R) -> Theme
where
    R: StoreReader + ?Sized,
{
    match repo.get_entry(THEME_KEY) {
        Ok(Some(entry)) => Theme::parse_or_default(entry.value.as_str()),
        Ok(None) => Theme::default(),
        Err(err) => {
            log::error!("Failed to load the theme: {err}");
            Theme::default()
        }
    }
}

pub fn save_theme<R>(repo: &R, form: &ThemeForm) -> ServiceResult<Theme>
where
    R: StoreWriter + ?Sized,
{
    let theme = Theme::try_from(form)?;
    let entry = NewStoreEntry::new(
        THEME_KEY,
        Value::String(theme.as_str().to_string()),
        Utc::now().naive_utc(),
    );
    repo.put_entry(&entry).map_err(|err| {
        log::error!("Failed to save the theme: {err}");
        err
    })?;
    Ok(theme)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::store::StoreEntry;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn stored(key: &str, value: Value) -> StoreEntry {
        StoreEntry {
            key: key.to_string(),
            value,
            updated_at: Utc::now().naive_utc(),
            expires_at: None,
        }
    }

    fn echo(entry: &NewStoreEntry) -> StoreEntry {
        stored(&entry.key, entry.value.clone())
    }

    /// Stored values override defaults; keys no longer defined are dropped.
    #[test]
    fn load_merges_stored_values_over_defaults() {
        let mut repo = MockRepository::new();
        repo.expect_get_entry()
            .withf(|key| key == "asll-settings-email")
            .returning(|key| {
                Ok(Some(stored(
                    key,
                    json!({"smtp_host": "smtp.asll.ir", "legacy": "x"}),
                )))
            });

        let values = load_tab(&repo, SettingsTab::Email).expect("should load settings");

        assert_eq!(values["smtp_host"], "smtp.asll.ir");
        assert_eq!(values["smtp_port"], "587");
        assert!(!values.contains_key("legacy"));
    }

    /// Saving validates the form and stores the tab without expiry.
    #[test]
    fn save_stores_validated_values() {
        let mut repo = MockRepository::new();
        repo.expect_get_entry().returning(|_| Ok(None));
        repo.expect_put_entry()
            .withf(|entry| {
                entry.key == "asll-settings-security"
                    && entry.expires_at.is_none()
                    && entry.value["session_timeout"] == "45"
            })
            .times(1)
            .returning(|entry| Ok(echo(entry)));
        let form: SettingsForm = [("session_timeout".to_string(), "45".to_string())]
            .into_iter()
            .collect();

        let values =
            save_tab(&repo, SettingsTab::Security, &form).expect("should save settings");

        assert_eq!(values["session_timeout"], "45");
    }

    /// Invalid input is reported as a form error and nothing is written.
    #[test]
    fn invalid_values_are_not_stored() {
        let mut repo = MockRepository::new();
        repo.expect_get_entry().returning(|_| Ok(None));
        repo.expect_put_entry().times(0);
        let form: SettingsForm = [("smtp_port".to_string(), "99999".to_string())]
            .into_iter()
            .collect();

        let result = save_tab(&repo, SettingsTab::Email, &form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn reset_drops_every_tab() {
        let mut repo = MockRepository::new();
        repo.expect_invalidate_prefix()
            .withf(|prefix| prefix == "asll-settings-")
            .times(1)
            .returning(|_| Ok(3));

        assert_eq!(reset_settings(&repo).expect("should reset"), 3);
    }

    #[test]
    fn theme_defaults_to_light_on_errors() {
        let mut repo = MockRepository::new();
        repo.expect_get_entry()
            .returning(|_| Err(RepositoryError::Unexpected("locked".to_string())));

        assert_eq!(load_theme(&repo), Theme::Light);
    }

    #[test]
    fn theme_is_saved_as_plain_string() {
        let mut repo = MockRepository::new();
        repo.expect_put_entry()
            .withf(|entry| entry.key == THEME_KEY && entry.value == json!("dark"))
            .times(1)
            .returning(|entry| Ok(echo(entry)));
        let form = ThemeForm {
            theme: "dark".to_string(),
            return_to: None,
        };

        assert_eq!(save_theme(&repo, &form).expect("should save"), Theme::Dark);
    }
}
