use serde::Serialize;

use crate::domain::resource::Resource;
use crate::domain::types::status_enum;
use crate::domain::{Column, FieldValue, ViewModel};
use crate::normalize::Raw;

status_enum!(
    WithdrawalStatus, default = Pending {
        Pending => ("pending", "در انتظار"),
        Approved => ("approved", "تایید شده"),
        Processing => ("processing", "در حال پردازش"),
        Completed => ("completed", "پرداخت شده"),
        Rejected => ("rejected", "رد شده"),
        Cancelled => ("cancelled", "لغو شده"),
    }
);

status_enum!(
    PayoutMethod, default = BankTransfer {
        BankTransfer => ("bank_transfer", "انتقال بانکی"),
        Card => ("card", "کارت به کارت"),
        Wallet => ("wallet", "کیف پول"),
        Crypto => ("crypto", "ارز دیجیتال"),
    }
);

/// Payout request raised by a marketplace user.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Withdrawal {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub amount: f64,
    pub currency: String,
    pub method: PayoutMethod,
    pub account_info: String,
    pub status: WithdrawalStatus,
    pub description: String,
    pub created_at: String,
    pub processed_at: Option<String>,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "شناسه"),
    Column::new("user_name", "کاربر").sortable(),
    Column::new("amount", "مبلغ").sortable(),
    Column::new("currency", "ارز").hidden(),
    Column::new("method", "روش").sortable(),
    Column::new("account_info", "اطلاعات حساب"),
    Column::new("status", "وضعیت").sortable(),
    Column::new("description", "توضیحات").hidden(),
    Column::new("created_at", "تاریخ درخواست").sortable(),
    Column::new("processed_at", "تاریخ پردازش").hidden(),
];

impl ViewModel for Withdrawal {
    const RESOURCE: Resource = Resource::Withdrawals;

    fn normalize(raw: Raw<'_>) -> Self {
        Self {
            id: raw.id(),
            user_id: raw.text_or(&["user_id", "user.id"], ""),
            user_name: raw
                .full_name("user")
                .or_else(|| raw.text(&["user_name", "userName"]))
                .unwrap_or_else(|| "نامشخص".to_string()),
            amount: raw.number_or(&["amount"], 0.0),
            currency: raw.text_or(&["currency"], ""),
            method: PayoutMethod::parse_or_default(raw.text(&["method"]).as_deref()),
            account_info: raw.text_or(
                &["bank_card_number", "sheba_number", "account_info", "accountInfo"],
                "",
            ),
            status: WithdrawalStatus::parse_or_default(raw.text(&["status"]).as_deref()),
            description: raw.text_or(&["admin_notes", "description"], ""),
            created_at: raw.timestamp(&["requested_at", "created_at", "createdAt"]),
            processed_at: raw.timestamp_opt(&["processed_at", "completed_at"]),
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
            "user_name" => self.user_name.as_str().into(),
            "amount" => self.amount.into(),
            "currency" => self.currency.as_str().into(),
            "method" => self.method.label().into(),
            "account_info" => self.account_info.as_str().into(),
            "status" => self.status.label().into(),
            "description" => self.description.as_str().into(),
            "created_at" => self.created_at.as_str().into(),
            "processed_at" => self.processed_at.clone().into(),
            _ => FieldValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_status_and_method_fall_back() {
        let value = json!({"id": 5, "status": "on_hold", "method": "cash"});
        let withdrawal = Withdrawal::normalize(Raw::new(&value));
        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
        assert_eq!(withdrawal.method, PayoutMethod::BankTransfer);
        assert_eq!(withdrawal.user_name, "نامشخص");
        assert_eq!(withdrawal.amount, 0.0);
        assert_eq!(withdrawal.processed_at, None);
    }

    #[test]
    fn account_info_uses_first_available_source() {
        let value = json!({
            "id": 6,
            "amount": 250.0,
            "sheba_number": "IR120000000000000000000001",
            "admin_notes": "checked",
            "user": {"first_name": "Mina", "last_name": "Azadi"},
            "status": "completed"
        });
        let withdrawal = Withdrawal::normalize(Raw::new(&value));
        assert_eq!(withdrawal.account_info, "IR120000000000000000000001");
        assert_eq!(withdrawal.description, "checked");
        assert_eq!(withdrawal.user_name, "Mina Azadi");
        assert_eq!(withdrawal.status, WithdrawalStatus::Completed);
    }
}
