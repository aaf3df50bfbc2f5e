//! Single-record action dialogs: status changes, reviews, replies.

use serde::Deserialize;
use validator::Validate;

use crate::domain::license::LicenseKind;
use crate::domain::ticket::TicketStatus;
use crate::domain::types::{AdminNotes, ReviewStatus, SanitizedText};
use crate::domain::withdrawal::WithdrawalStatus;
use crate::forms::{FormError, checked, optional_text, parse_integer};

/// Hidden `active` field of the per-row toggle switch.
#[derive(Debug, Deserialize)]
pub struct ToggleActiveForm {
    pub active: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

impl ToggleActiveForm {
    pub fn active(&self) -> Result<bool, FormError> {
        match self.active.as_str() {
            "true" | "1" | "on" => Ok(true),
            "false" | "0" | "off" => Ok(false),
            other => Err(FormError::InvalidValue(format!("مقدار «{other}» معتبر نیست"))),
        }
    }
}

#[derive(Debug, Deserialize)]
/// Approve/reject dialog of suppliers and visitors.
pub struct ReviewForm {
    pub decision: String,
    #[serde(default)]
    pub admin_notes: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReviewPayload {
    pub decision: ReviewStatus,
    pub admin_notes: Option<AdminNotes>,
}

impl TryFrom<ReviewForm> for ReviewPayload {
    type Error = FormError;

    /// Rejections must explain themselves; approvals may carry notes.
    fn try_from(form: ReviewForm) -> Result<Self, Self::Error> {
        let decision = match ReviewStatus::parse(&form.decision) {
            Some(ReviewStatus::Pending) | None => return Err(FormError::InvalidAction),
            Some(decision) => decision,
        };
        let admin_notes = optional_text(&form.admin_notes)
            .map(AdminNotes::new)
            .transpose()?;
        if decision == ReviewStatus::Rejected && admin_notes.is_none() {
            return Err(FormError::MissingNotes);
        }
        Ok(Self {
            decision,
            admin_notes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FeatureForm {
    #[serde(default)]
    pub featured: Option<String>,
}

impl FeatureForm {
    pub fn featured(&self) -> bool {
        checked(&self.featured)
    }
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalStatusForm {
    pub status: String,
    #[serde(default)]
    pub admin_notes: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct WithdrawalStatusPayload {
    pub status: WithdrawalStatus,
    pub admin_notes: Option<AdminNotes>,
}

impl TryFrom<WithdrawalStatusForm> for WithdrawalStatusPayload {
    type Error = FormError;

    fn try_from(form: WithdrawalStatusForm) -> Result<Self, Self::Error> {
        let status = WithdrawalStatus::parse(&form.status).ok_or(FormError::InvalidAction)?;
        let admin_notes = optional_text(&form.admin_notes)
            .map(AdminNotes::new)
            .transpose()?;
        if status == WithdrawalStatus::Rejected && admin_notes.is_none() {
            return Err(FormError::MissingNotes);
        }
        Ok(Self {
            status,
            admin_notes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TicketStatusForm {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TicketStatusPayload {
    pub status: TicketStatus,
    pub message: Option<SanitizedText>,
}

impl TryFrom<TicketStatusForm> for TicketStatusPayload {
    type Error = FormError;

    fn try_from(form: TicketStatusForm) -> Result<Self, Self::Error> {
        let status = TicketStatus::parse(&form.status).ok_or(FormError::InvalidAction)?;
        let message = optional_text(&form.message)
            .map(SanitizedText::new)
            .transpose()?;
        Ok(Self { status, message })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TicketReplyForm {
    #[validate(length(min = 2, max = 5000, message = "پیام باید بین ۲ تا ۵۰۰۰ کاراکتر باشد"))]
    pub message: String,
}

impl TryFrom<TicketReplyForm> for SanitizedText {
    type Error = FormError;

    fn try_from(form: TicketReplyForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(SanitizedText::new(form.message)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateLicensesForm {
    pub count: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GenerateLicensesPayload {
    pub count: u32,
    pub kind: LicenseKind,
}

impl TryFrom<GenerateLicensesForm> for GenerateLicensesPayload {
    type Error = FormError;

    fn try_from(form: GenerateLicensesForm) -> Result<Self, Self::Error> {
        if form.count.trim().is_empty() {
            return Err(FormError::InvalidValue("تعداد لایسنس الزامی است".to_string()));
        }
        let count = parse_integer(&form.count, "تعداد لایسنس", 1, 100, 1)?;
        let kind = LicenseKind::parse(&form.kind)
            .ok_or_else(|| FormError::InvalidValue("نوع لایسنس را انتخاب کنید".to_string()))?;
        Ok(Self {
            count: count as u32,
            kind,
        })
    }
}

/// Submitted from the delete confirmation page.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteForm {
    pub fn ensure_confirmed(&self) -> Result<(), FormError> {
        if checked(&self.confirm) {
            Ok(())
        } else {
            Err(FormError::ConfirmationRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_requires_notes() {
        let form = ReviewForm {
            decision: "rejected".to_string(),
            admin_notes: "  ".to_string(),
        };
        assert!(matches!(
            ReviewPayload::try_from(form),
            Err(FormError::MissingNotes)
        ));

        let form = ReviewForm {
            decision: "approved".to_string(),
            admin_notes: String::new(),
        };
        let payload = ReviewPayload::try_from(form).unwrap();
        assert_eq!(payload.decision, ReviewStatus::Approved);
        assert_eq!(payload.admin_notes, None);
    }

    #[test]
    fn pending_is_not_a_decision() {
        let form = ReviewForm {
            decision: "pending".to_string(),
            admin_notes: "x".to_string(),
        };
        assert!(matches!(
            ReviewPayload::try_from(form),
            Err(FormError::InvalidAction)
        ));
    }

    #[test]
    fn license_count_is_bounded() {
        for (count, ok) in [("1", true), ("100", true), ("0", false), ("101", false), ("", false)] {
            let form = GenerateLicensesForm {
                count: count.to_string(),
                kind: "pro".to_string(),
            };
            assert_eq!(GenerateLicensesPayload::try_from(form).is_ok(), ok, "count {count}");
        }
        let form = GenerateLicensesForm {
            count: "5".to_string(),
            kind: "gold".to_string(),
        };
        assert!(GenerateLicensesPayload::try_from(form).is_err());
    }

    #[test]
    fn withdrawal_rejection_requires_notes() {
        let form = WithdrawalStatusForm {
            status: "rejected".to_string(),
            admin_notes: String::new(),
        };
        assert!(WithdrawalStatusPayload::try_from(form).is_err());
        let form = WithdrawalStatusForm {
            status: "completed".to_string(),
            admin_notes: String::new(),
        };
        assert_eq!(
            WithdrawalStatusPayload::try_from(form).unwrap().status,
            WithdrawalStatus::Completed
        );
    }

    #[test]
    fn toggle_and_delete_confirmation() {
        let toggle = ToggleActiveForm {
            active: "false".to_string(),
            return_to: None,
        };
        assert!(!toggle.active().unwrap());
        assert!(DeleteForm::default().ensure_confirmed().is_err());
        let confirmed = DeleteForm {
            confirm: Some("on".to_string()),
        };
        assert!(confirmed.ensure_confirmed().is_ok());
    }
}
