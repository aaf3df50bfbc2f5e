//! Bulk actions and their aggregated outcome.

use serde::Serialize;

use crate::domain::types::{ResourceId, status_enum};

status_enum!(
    /// Action applied to every selected row of a list page.
    BulkAction, default = Activate {
        Activate => ("activate", "فعال‌سازی"),
        Deactivate => ("deactivate", "غیرفعال‌سازی"),
        Approve => ("approve", "تایید"),
        Reject => ("reject", "رد"),
        Close => ("close", "بستن"),
        Feature => ("feature", "ویژه کردن"),
        Unfeature => ("unfeature", "حذف از ویژه"),
        Delete => ("delete", "حذف"),
    }
);

impl BulkAction {
    /// Destructive actions require an explicit confirmation.
    pub const fn is_destructive(self) -> bool {
        matches!(self, BulkAction::Delete | BulkAction::Reject)
    }
}

/// Per-item result of a bulk action.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: Vec<ResourceId>,
    pub failed: Vec<BulkFailure>,
}

/// One id the backend refused, with the reason shown to the operator.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: ResourceId,
    pub reason: String,
}

impl BulkOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Comma separated list of failed ids for the summary message.
    pub fn failed_ids(&self) -> String {
        self.failed
            .iter()
            .map(|failure| failure.id.as_str())
            .collect::<Vec<_>>()
            .join("، ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_reports_failed_ids() {
        let outcome = BulkOutcome {
            succeeded: vec![ResourceId::new("1").unwrap()],
            failed: vec![
                BulkFailure {
                    id: ResourceId::new("2").unwrap(),
                    reason: "x".to_string(),
                },
                BulkFailure {
                    id: ResourceId::new("3").unwrap(),
                    reason: "y".to_string(),
                },
            ],
        };
        assert!(!outcome.is_complete_success());
        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.failed_ids(), "2، 3");
    }

    #[test]
    fn delete_and_reject_are_destructive() {
        assert!(BulkAction::Delete.is_destructive());
        assert!(BulkAction::Reject.is_destructive());
        assert!(!BulkAction::Activate.is_destructive());
    }
}
