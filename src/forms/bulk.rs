use serde::Deserialize;

use crate::domain::bulk::BulkAction;
use crate::domain::resource::Resource;
use crate::domain::types::ResourceId;
use crate::forms::{FormError, checked};

#[derive(Debug, Default, Deserialize)]
/// Bulk action posted from a list page.
pub struct BulkForm {
    pub action: String,
    /// Selected row ids; one `ids` key per checkbox.
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub confirm: Option<String>,
    /// List query string to return to.
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Bulk action checked against the resource it targets.
#[derive(Debug, PartialEq, Eq)]
pub struct BulkPayload {
    pub action: BulkAction,
    pub ids: Vec<ResourceId>,
}

impl BulkForm {
    /// Validates the action for `resource`; destructive actions must be confirmed.
    pub fn into_payload(self, resource: Resource) -> Result<BulkPayload, FormError> {
        let action = BulkAction::parse(&self.action).ok_or(FormError::InvalidAction)?;
        if !resource.supports(action) {
            return Err(FormError::InvalidAction);
        }
        if action.is_destructive() && !checked(&self.confirm) {
            return Err(FormError::ConfirmationRequired);
        }

        let mut ids = Vec::with_capacity(self.ids.len());
        for raw in self.ids {
            let id = ResourceId::new(raw)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Err(FormError::InvalidValue(
                "هیچ موردی انتخاب نشده است".to_string(),
            ));
        }

        Ok(BulkPayload { action, ids })
    }
}
