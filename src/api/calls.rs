//! Backend endpoints used by the panel.

use serde_json::{Value, json};

use crate::api::ApiCall;
use crate::domain::bulk::BulkAction;
use crate::domain::license::LicenseKind;
use crate::domain::product::ProductStatus;
use crate::domain::resource::Resource;
use crate::domain::ticket::TicketStatus;
use crate::domain::types::{ActiveState, ResourceId, ReviewStatus};
use crate::domain::withdrawal::WithdrawalStatus;

/// Notes sent when suppliers or visitors are rejected in bulk.
pub const BULK_REJECT_NOTE: &str = "رد شده توسط ادمین";

pub fn list(resource: Resource, query: Vec<(String, String)>) -> ApiCall {
    ApiCall::get(resource.list_path()).query(query)
}

pub fn fetch(resource: Resource, id: &ResourceId) -> ApiCall {
    ApiCall::get(resource.record_path(id))
}

pub fn create(resource: Resource, body: Value) -> ApiCall {
    ApiCall::post(resource.collection_path(), body)
}

pub fn update(resource: Resource, id: &ResourceId, body: Value) -> ApiCall {
    ApiCall::put(resource.item_path(id), body)
}

pub fn delete(resource: Resource, id: &ResourceId) -> ApiCall {
    ApiCall::delete(resource.item_path(id))
}

pub fn set_user_active(id: &ResourceId, active: bool) -> ApiCall {
    ApiCall::put(
        format!("{}/status", Resource::Users.item_path(id)),
        json!({ "is_active": active }),
    )
}

/// Records without a dedicated status endpoint are toggled through their update route.
pub fn set_active_flag(resource: Resource, id: &ResourceId, active: bool) -> ApiCall {
    match resource {
        Resource::Users => set_user_active(id, active),
        Resource::Products => set_product_status(
            id,
            if active {
                ProductStatus::Active
            } else {
                ProductStatus::Inactive
            },
        ),
        Resource::ResearchProducts => ApiCall::patch(
            format!("{}/status", Resource::ResearchProducts.item_path(id)),
            json!({ "status": ActiveState::from_flag(active).as_str() }),
        ),
        other => update(other, id, json!({ "is_active": active })),
    }
}

pub fn set_product_status(id: &ResourceId, status: ProductStatus) -> ApiCall {
    ApiCall::put(
        format!("{}/status", Resource::Products.item_path(id)),
        json!({ "status": status.as_str() }),
    )
}

pub fn set_withdrawal_status(
    id: &ResourceId,
    status: WithdrawalStatus,
    admin_notes: Option<&str>,
) -> ApiCall {
    let mut body = json!({ "status": status.as_str() });
    if let Some(notes) = admin_notes {
        body["admin_notes"] = Value::from(notes);
    }
    ApiCall::put(
        format!("{}/status", Resource::Withdrawals.item_path(id)),
        body,
    )
}

pub fn set_ticket_status(id: &ResourceId, status: TicketStatus, message: Option<&str>) -> ApiCall {
    let mut body = json!({ "status": status.as_str() });
    if let Some(message) = message {
        body["message"] = Value::from(message);
    }
    ApiCall::put(format!("{}/status", Resource::Tickets.item_path(id)), body)
}

pub fn reply_ticket(id: &ResourceId, message: &str) -> ApiCall {
    ApiCall::post(
        format!("{}/messages", Resource::Tickets.item_path(id)),
        json!({ "message": message }),
    )
}

/// Approves or rejects a supplier or visitor registration.
pub fn review(
    resource: Resource,
    id: &ResourceId,
    decision: ReviewStatus,
    admin_notes: Option<&str>,
) -> ApiCall {
    let action = match decision {
        ReviewStatus::Rejected => "reject",
        ReviewStatus::Approved | ReviewStatus::Pending => "approve",
    };
    let body = match admin_notes {
        Some(notes) => json!({ "admin_notes": notes }),
        None => json!({}),
    };
    ApiCall::post(format!("{}/{action}", resource.item_path(id)), body)
}

pub fn set_featured(resource: Resource, id: &ResourceId, featured: bool) -> ApiCall {
    let action = if featured { "feature" } else { "unfeature" };
    ApiCall::post(format!("{}/{action}", resource.item_path(id)), json!({}))
}

pub fn generate_licenses(count: u32, kind: LicenseKind) -> ApiCall {
    ApiCall::post(
        "/admin/licenses/generate",
        json!({ "count": count, "type": kind.as_str() }),
    )
}

pub fn login(credentials: Value) -> ApiCall {
    ApiCall::post("/auth/login", credentials)
}

pub fn current_user() -> ApiCall {
    ApiCall::get("/me")
}

pub fn forgot_password(email: &str) -> ApiCall {
    ApiCall::post("/auth/forgot-password", json!({ "email": email }))
}

pub fn dashboard_stats() -> ApiCall {
    ApiCall::get("/admin/dashboard/stats")
}

/// The single-record call a bulk action issues for one id.
///
/// Returns `None` when the resource does not offer the action.
pub fn bulk(resource: Resource, action: BulkAction, id: &ResourceId) -> Option<ApiCall> {
    if !resource.supports(action) {
        return None;
    }
    let call = match (resource, action) {
        (_, BulkAction::Delete) => delete(resource, id),
        (_, BulkAction::Activate) => set_active_flag(resource, id, true),
        (_, BulkAction::Deactivate) => set_active_flag(resource, id, false),
        (Resource::Withdrawals, BulkAction::Approve) => {
            set_withdrawal_status(id, WithdrawalStatus::Approved, None)
        }
        (Resource::Withdrawals, BulkAction::Reject) => {
            set_withdrawal_status(id, WithdrawalStatus::Rejected, None)
        }
        (_, BulkAction::Approve) => review(resource, id, ReviewStatus::Approved, None),
        (_, BulkAction::Reject) => {
            review(resource, id, ReviewStatus::Rejected, Some(BULK_REJECT_NOTE))
        }
        (_, BulkAction::Close) => set_ticket_status(id, TicketStatus::Closed, None),
        (_, BulkAction::Feature) => set_featured(resource, id, true),
        (_, BulkAction::Unfeature) => set_featured(resource, id, false),
    };
    Some(call)
}
