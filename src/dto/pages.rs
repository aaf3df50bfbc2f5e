//! Data for the dashboard, statistics, export and settings pages.

use serde::Serialize;

use crate::domain::auth::AdminUser;
use crate::domain::resource::Resource;
use crate::domain::settings::{FieldKind, SettingField, SettingsTab, SettingsValues};
use crate::domain::stats::{ChartPoint, DashboardStats};
use crate::domain::{Column, ViewModel};
use crate::guard::{GuardState, access_for, evaluate};

#[derive(Debug, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: i64,
    pub href: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub stats: DashboardStats,
    /// Cards linking to the pages the user may open.
    pub cards: Vec<StatCard>,
}

impl DashboardPage {
    pub fn new(stats: DashboardStats, user: &AdminUser) -> Self {
        let candidates: [(&str, i64, &str, &[&str]); 8] = [
            ("کل کاربران", stats.total_users, "/users", &["users.view", "users.manage"]),
            ("کاربران فعال", stats.active_users, "/users", &["users.view", "users.manage"]),
            ("محصولات", stats.total_products, "/products", &["products.view", "products.manage"]),
            ("تامین‌کنندگان در انتظار", stats.pending_suppliers, "/suppliers", &["products.view", "products.manage"]),
            ("ویزیتورهای در انتظار", stats.pending_visitors, "/visitors", &["reports.view"]),
            ("برداشت‌های در انتظار", stats.pending_withdrawals, "/withdrawals", &["users.manage", "reports.view"]),
            ("تیکت‌های باز", stats.open_tickets, "/tickets", &["tickets.view", "tickets.manage"]),
            ("لایسنس‌های استفاده شده", stats.used_licenses, "/licenses", &["products.view", "products.manage"]),
        ];
        let cards = candidates
            .into_iter()
            .filter(|(_, _, _, required)| user.has_any_permission(required))
            .map(|(label, value, href, _)| StatCard { label, value, href })
            .collect();
        Self { stats, cards }
    }
}

#[derive(Debug, Serialize)]
pub struct StatisticsPage {
    pub stats: DashboardStats,
    pub chart: Vec<ChartPoint>,
    pub total_revenue: u64,
    pub total_new_users: u32,
    /// Tallest bar of each series, for scaling the CSS bar charts.
    pub max_users: u32,
    pub max_revenue: u64,
    pub max_products: u32,
}

impl StatisticsPage {
    pub fn new(stats: DashboardStats, chart: Vec<ChartPoint>) -> Self {
        Self {
            total_revenue: chart.iter().map(|point| point.revenue).sum(),
            total_new_users: chart.iter().map(|point| point.users).sum(),
            max_users: chart.iter().map(|point| point.users).max().unwrap_or(0).max(1),
            max_revenue: chart.iter().map(|point| point.revenue).max().unwrap_or(0).max(1),
            max_products: chart.iter().map(|point| point.products).max().unwrap_or(0).max(1),
            stats,
            chart,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportResource {
    pub slug: &'static str,
    pub title: &'static str,
    pub columns: &'static [Column],
}

/// Resources offered on the export page with their columns.
#[derive(Debug, Serialize)]
pub struct ExportPage {
    pub resources: Vec<ExportResource>,
    pub selected: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TabLink {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct SettingFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Secrets are never echoed back; `has_value` tells whether one is set.
    pub value: String,
    pub has_value: bool,
    pub checked: bool,
    pub options: &'static [&'static str],
    pub min: i64,
    pub max: i64,
}

impl SettingFieldView {
    fn new(field: &SettingField, values: &SettingsValues) -> Self {
        let stored = values
            .get(field.key)
            .cloned()
            .unwrap_or_else(|| field.default.to_string());
        let secret = field.kind == FieldKind::Secret;
        Self {
            key: field.key,
            label: field.label,
            kind: field.kind,
            has_value: !stored.is_empty(),
            checked: stored == "true",
            value: if secret { String::new() } else { stored },
            options: field.options,
            min: field.min,
            max: field.max,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub tab: SettingsTab,
    pub tabs: Vec<TabLink>,
    pub fields: Vec<SettingFieldView>,
}

impl SettingsPage {
    pub fn new(tab: SettingsTab, values: &SettingsValues) -> Self {
        Self {
            tab,
            tabs: SettingsTab::ALL
                .iter()
                .map(|candidate| TabLink {
                    value: candidate.as_str(),
                    label: candidate.label(),
                    active: *candidate == tab,
                })
                .collect(),
            fields: tab
                .fields()
                .iter()
                .map(|field| SettingFieldView::new(field, values))
                .collect(),
        }
    }
}

/// Everything a resource page needs to know about its resource.
#[derive(Debug, Serialize)]
pub struct ResourceMeta {
    pub slug: &'static str,
    pub title: &'static str,
    pub editable: bool,
    pub toggles_active: bool,
    pub reviewable: bool,
    pub deletable: bool,
}

impl From<Resource> for ResourceMeta {
    fn from(resource: Resource) -> Self {
        Self {
            slug: resource.slug(),
            title: resource.title(),
            editable: resource.editable(),
            toggles_active: resource.toggles_active(),
            reviewable: resource.reviewable(),
            deletable: resource.deletable(),
        }
    }
}

/// Sidebar entry; only routes the user may open are listed.
#[derive(Debug, Serialize)]
pub struct NavLink {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

impl NavLink {
    pub fn for_user(user: &AdminUser, current_page: &str) -> Vec<NavLink> {
        let resources = Resource::ALL
            .into_iter()
            .map(|resource| (resource.slug(), resource.title()));
        let pages = [
            ("statistics", "آمار و گزارش‌ها"),
            ("export", "خروجی اطلاعات"),
            ("settings", "تنظیمات"),
            ("support/tickets", "پشتیبانی"),
        ];
        std::iter::once(("", "داشبورد"))
            .chain(resources)
            .chain(pages)
            .filter_map(|(page, label)| {
                let href = format!("/{page}");
                let allowed = evaluate(access_for(&href), Some(user))
                    == GuardState::AuthenticatedAuthorized;
                allowed.then(|| NavLink {
                    active: page == current_page
                        || (page.is_empty() && current_page == "dashboard"),
                    href,
                    label,
                })
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct DetailField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Detail page of one record: every table column plus the raw view model
/// for resource specific sections.
#[derive(Debug, Serialize)]
pub struct RecordPage {
    pub id: String,
    pub fields: Vec<DetailField>,
    pub record: serde_json::Value,
}

impl RecordPage {
    pub fn build<V: ViewModel>(item: &V) -> Self {
        Self {
            id: item.id().to_string(),
            fields: V::columns()
                .iter()
                .map(|column| DetailField {
                    key: column.key,
                    label: column.label,
                    value: item.field(column.key).to_string(),
                })
                .collect(),
            record: serde_json::to_value(item).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(permissions: &[&str]) -> AdminUser {
        AdminUser {
            id: "1".to_string(),
            name: "Test".to_string(),
            email: String::new(),
            username: String::new(),
            role: "admin".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn dashboard_cards_follow_permissions() {
        let stats = DashboardStats {
            open_tickets: 4,
            ..DashboardStats::default()
        };
        let page = DashboardPage::new(stats, &user(&["tickets.view"]));
        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].value, 4);
        assert_eq!(page.cards[0].href, "/tickets");

        let everything = DashboardPage::new(DashboardStats::default(), &user(&["all"]));
        assert_eq!(everything.cards.len(), 8);
    }

    #[test]
    fn secrets_are_not_echoed() {
        let mut values = SettingsTab::Telegram.defaults();
        values.insert("bot_token".to_string(), "123:abc".to_string());
        let page = SettingsPage::new(SettingsTab::Telegram, &values);
        let token = page.fields.iter().find(|f| f.key == "bot_token").unwrap();
        assert!(token.value.is_empty());
        assert!(token.has_value);
        let enabled = page.fields.iter().find(|f| f.key == "enabled").unwrap();
        assert!(enabled.checked);
        assert!(page.tabs.iter().any(|tab| tab.active && tab.value == "telegram"));
    }

    #[test]
    fn navigation_hides_forbidden_pages() {
        let links = NavLink::for_user(&user(&["tickets.view"]), "tickets");
        let hrefs: Vec<&str> = links.iter().map(|link| link.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/", "/tickets"]);
        assert!(links[1].active);

        let everything = NavLink::for_user(&user(&["all"]), "dashboard");
        assert!(everything[0].active);
        assert!(everything.iter().any(|link| link.href == "/settings"));
        assert!(!everything.iter().any(|link| link.href == "/support/tickets"));
    }

    #[test]
    fn statistics_scale_never_divides_by_zero() {
        let page = StatisticsPage::new(DashboardStats::default(), Vec::new());
        assert_eq!(page.max_users, 1);
        assert_eq!(page.total_revenue, 0);
    }
}
