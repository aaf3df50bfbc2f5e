//! Endpoint bindings for every list resource managed by the panel.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::domain::bulk::BulkAction;
use crate::domain::types::{ResourceId, TypeConstraintError};

/// Backend collection backing one list page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Users,
    Admins,
    Products,
    Withdrawals,
    Licenses,
    Tickets,
    Education,
    Suppliers,
    Visitors,
    Popups,
    Notifications,
    Sliders,
    ResearchProducts,
    Affiliates,
}

impl Resource {
    pub const ALL: [Resource; 14] = [
        Resource::Users,
        Resource::Admins,
        Resource::Products,
        Resource::Withdrawals,
        Resource::Licenses,
        Resource::Tickets,
        Resource::Education,
        Resource::Suppliers,
        Resource::Visitors,
        Resource::Popups,
        Resource::Notifications,
        Resource::Sliders,
        Resource::ResearchProducts,
        Resource::Affiliates,
    ];

    /// Path segment used by the panel's own routes.
    pub const fn slug(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Admins => "admins",
            Resource::Products => "products",
            Resource::Withdrawals => "withdrawals",
            Resource::Licenses => "licenses",
            Resource::Tickets => "tickets",
            Resource::Education => "education",
            Resource::Suppliers => "suppliers",
            Resource::Visitors => "visitors",
            Resource::Popups => "popups",
            Resource::Notifications => "notifications",
            Resource::Sliders => "sliders",
            Resource::ResearchProducts => "research-products",
            Resource::Affiliates => "affiliates",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|resource| resource.slug() == slug)
    }

    pub const fn title(self) -> &'static str {
        match self {
            Resource::Users => "کاربران",
            Resource::Admins => "مدیران",
            Resource::Products => "محصولات موجود",
            Resource::Withdrawals => "درخواست‌های برداشت",
            Resource::Licenses => "لایسنس‌ها",
            Resource::Tickets => "تیکت‌ها",
            Resource::Education => "آموزش",
            Resource::Suppliers => "تامین‌کنندگان",
            Resource::Visitors => "ویزیتورها",
            Resource::Popups => "پاپ‌آپ‌های تبلیغاتی",
            Resource::Notifications => "اعلان‌ها",
            Resource::Sliders => "اسلایدرها",
            Resource::ResearchProducts => "محصولات تحقیقی",
            Resource::Affiliates => "افیلیت‌ها",
        }
    }

    /// Backend path of the list endpoint, relative to the API base URL.
    pub const fn list_path(self) -> &'static str {
        match self {
            Resource::Users => "/admin/users",
            Resource::Admins => "/admin/web-admins",
            Resource::Products => "/available-products",
            Resource::Withdrawals => "/admin/withdrawal/requests",
            Resource::Licenses => "/admin/licenses",
            Resource::Tickets => "/admin/support/tickets",
            Resource::Education => "/admin/training/videos",
            Resource::Suppliers => "/admin/suppliers",
            Resource::Visitors => "/admin/visitors",
            Resource::Popups => "/admin/marketing-popups",
            Resource::Notifications => "/admin/notifications",
            Resource::Sliders => "/admin/sliders",
            Resource::ResearchProducts => "/research-products",
            Resource::Affiliates => "/admin/affiliates",
        }
    }

    /// Backend path records are created under.
    pub const fn collection_path(self) -> &'static str {
        match self {
            Resource::Products => "/admin/available-products",
            Resource::ResearchProducts => "/admin/research-products",
            other => other.list_path(),
        }
    }

    /// Backend path single records are read from.
    pub fn record_path(self, id: &ResourceId) -> String {
        match self {
            Resource::ResearchProducts => format!("{}/{id}", self.list_path()),
            other => other.item_path(id),
        }
    }

    /// Backend path single records are changed or deleted at.
    pub fn item_path(self, id: &ResourceId) -> String {
        match self {
            Resource::Withdrawals => format!("/admin/withdrawal/request/{id}"),
            other => format!("{}/{id}", other.collection_path()),
        }
    }

    /// Keys the record array may be stored under inside the envelope.
    pub const fn list_keys(self) -> &'static [&'static str] {
        match self {
            Resource::Users => &["users"],
            Resource::Admins => &["admins", "web_admins"],
            Resource::Products => &["products", "available_products"],
            Resource::Withdrawals => &["requests", "withdrawals"],
            Resource::Licenses => &["licenses"],
            Resource::Tickets => &["tickets"],
            Resource::Education => &["videos", "items"],
            Resource::Suppliers => &["suppliers"],
            Resource::Visitors => &["visitors"],
            Resource::Popups => &["popups"],
            Resource::Notifications => &["notifications"],
            Resource::Sliders => &["sliders"],
            Resource::ResearchProducts => &["products", "research_products"],
            Resource::Affiliates => &["affiliates"],
        }
    }

    /// Keys a single record may be wrapped in by item endpoints.
    pub const fn record_keys(self) -> &'static [&'static str] {
        match self {
            Resource::Users => &["user"],
            Resource::Admins => &["admin", "web_admin"],
            Resource::Products => &["product", "available_product"],
            Resource::Withdrawals => &["request", "withdrawal"],
            Resource::Licenses => &["license"],
            Resource::Tickets => &["ticket"],
            Resource::Education => &["video"],
            Resource::Suppliers => &["supplier"],
            Resource::Visitors => &["visitor"],
            Resource::Popups => &["popup"],
            Resource::Notifications => &["notification"],
            Resource::Sliders => &["slider"],
            Resource::ResearchProducts => &["product", "research_product"],
            Resource::Affiliates => &["affiliate"],
        }
    }

    /// Whether a 404 from the list endpoint means "no data yet".
    pub const fn empty_on_not_found(self) -> bool {
        matches!(self, Resource::Admins)
    }

    /// Store key holding the last good list snapshot.
    pub fn storage_key(self) -> String {
        format!("asll-{}", self.slug())
    }

    /// Query parameters rendered as filter controls.
    pub const fn filter_keys(self) -> &'static [&'static str] {
        match self {
            Resource::Users | Resource::Admins => &["status"],
            Resource::Products => &["status", "category"],
            Resource::Withdrawals => &["status", "method"],
            Resource::Licenses => &["type", "status"],
            Resource::Tickets => &["status", "priority", "category"],
            Resource::Education => &["category", "level", "status"],
            Resource::Suppliers | Resource::Visitors => &["status", "is_featured"],
            Resource::Popups => &["status"],
            Resource::Notifications => &["type", "priority"],
            Resource::Sliders => &["active_only"],
            Resource::ResearchProducts => &["status", "category", "hs_code"],
            Resource::Affiliates => &["status"],
        }
    }

    /// Bulk actions offered on the list page, in display order.
    pub const fn bulk_actions(self) -> &'static [BulkAction] {
        match self {
            Resource::Users
            | Resource::Admins
            | Resource::Products
            | Resource::Popups
            | Resource::Notifications
            | Resource::Sliders
            | Resource::ResearchProducts
            | Resource::Affiliates => &[
                BulkAction::Activate,
                BulkAction::Deactivate,
                BulkAction::Delete,
            ],
            Resource::Withdrawals => &[BulkAction::Approve, BulkAction::Reject, BulkAction::Delete],
            Resource::Licenses | Resource::Education => &[BulkAction::Delete],
            Resource::Tickets => &[BulkAction::Close],
            Resource::Suppliers | Resource::Visitors => &[
                BulkAction::Approve,
                BulkAction::Reject,
                BulkAction::Feature,
                BulkAction::Unfeature,
                BulkAction::Delete,
            ],
        }
    }

    pub fn supports(self, action: BulkAction) -> bool {
        self.bulk_actions().contains(&action)
    }

    /// Whether the panel offers create/edit forms for this resource.
    pub const fn editable(self) -> bool {
        matches!(
            self,
            Resource::Users
                | Resource::Admins
                | Resource::Products
                | Resource::Education
                | Resource::Popups
                | Resource::Notifications
                | Resource::Sliders
                | Resource::ResearchProducts
                | Resource::Affiliates
        )
    }

    /// Whether rows carry an activate/deactivate toggle.
    pub const fn toggles_active(self) -> bool {
        matches!(
            self,
            Resource::Users
                | Resource::Admins
                | Resource::Products
                | Resource::Popups
                | Resource::Notifications
                | Resource::Sliders
                | Resource::ResearchProducts
                | Resource::Affiliates
        )
    }

    /// Whether records go through approve/reject review and featuring.
    pub const fn reviewable(self) -> bool {
        matches!(self, Resource::Suppliers | Resource::Visitors)
    }

    /// Whether single records can be deleted.
    pub const fn deletable(self) -> bool {
        !matches!(self, Resource::Tickets)
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Resource {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}
