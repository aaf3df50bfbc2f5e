//! Data rendered by the generic list page.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::controller::{ListQuery, SelectionSet};
use crate::domain::ViewModel;
use crate::domain::admin::{AdminRole, AdminStatus};
use crate::domain::auth::PERMISSIONS;
use crate::domain::education::{EducationCategory, EducationLevel, PublishState};
use crate::domain::license::{LicenseKind, LicenseStatus};
use crate::domain::notification::{NotificationKind, NotificationPriority};
use crate::domain::popup::{PopupKind, PopupPosition};
use crate::domain::product::ProductStatus;
use crate::domain::research_product::MarketLevel;
use crate::domain::resource::Resource;
use crate::domain::slider::SliderLinkType;
use crate::domain::ticket::{TicketCategory, TicketPriority, TicketStatus};
use crate::domain::types::{ActiveState, ReviewStatus};
use crate::domain::user::UserStatus;
use crate::domain::withdrawal::{PayoutMethod, WithdrawalStatus};
use crate::pagination::Paginated;

/// Result of the list service for one resource page.
pub struct ListPageData<V> {
    pub resource: Resource,
    pub items: Paginated<V>,
    /// Query after clamping; links are built from it.
    pub query: ListQuery,
    pub selection: SelectionSet,
    /// Load failure to flash, already throttled.
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ColumnView {
    pub key: &'static str,
    pub label: &'static str,
    pub sort_href: Option<String>,
    /// `asc`/`desc` on the column the list is sorted by.
    pub sorted: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
    pub selected: bool,
    pub active: bool,
    /// Serialized view model for resource specific cells and actions.
    pub record: Value,
}

#[derive(Debug, Serialize)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct FilterGroup {
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<FilterOption>,
}

#[derive(Debug, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkActionView {
    pub value: &'static str,
    pub label: &'static str,
    pub destructive: bool,
}

/// Everything the `resources/index.html` template needs.
#[derive(Debug, Serialize)]
pub struct ListView {
    pub slug: &'static str,
    pub title: &'static str,
    pub query_string: String,
    pub search: String,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub filters: Vec<FilterGroup>,
    pub pages: Vec<PageLink>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub bulk_actions: Vec<BulkActionView>,
    pub selected_count: usize,
    /// Current page with every visible row checked.
    pub select_all_href: Option<String>,
    pub clear_selection_href: String,
    pub editable: bool,
    pub toggles_active: bool,
    pub reviewable: bool,
    pub deletable: bool,
}

fn options_of<T: Copy>(
    all: &[T],
    wire: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Vec<(&'static str, &'static str)> {
    all.iter().map(|item| (wire(*item), label(*item))).collect()
}

macro_rules! options {
    ($enum:ty) => {
        options_of(<$enum>::ALL, <$enum>::as_str, <$enum>::label)
    };
}

/// Closed value sets of the filter controls; open keys render no options.
pub fn filter_options(resource: Resource, key: &str) -> Vec<(&'static str, &'static str)> {
    match (resource, key) {
        (Resource::Users, "status") => options!(UserStatus),
        (Resource::Admins, "status") => options!(AdminStatus),
        (Resource::Products, "status") => options!(ProductStatus),
        (Resource::Withdrawals, "status") => options!(WithdrawalStatus),
        (Resource::Withdrawals, "method") => options!(PayoutMethod),
        (Resource::Licenses, "type") => options!(LicenseKind),
        (Resource::Licenses, "status") => options!(LicenseStatus),
        (Resource::Tickets, "status") => options!(TicketStatus),
        (Resource::Tickets, "priority") => options!(TicketPriority),
        (Resource::Tickets, "category") => options!(TicketCategory),
        (Resource::Education, "category") => options!(EducationCategory),
        (Resource::Education, "level") => options!(EducationLevel),
        (Resource::Education, "status") => options!(PublishState),
        (Resource::Suppliers | Resource::Visitors, "status") => options!(ReviewStatus),
        (Resource::Suppliers | Resource::Visitors, "is_featured") => {
            vec![("true", "ویژه"), ("false", "عادی")]
        }
        (Resource::Popups, "status") => options!(ActiveState),
        (Resource::Notifications, "type") => options!(NotificationKind),
        (Resource::Notifications, "priority") => options!(NotificationPriority),
        (Resource::Sliders, "active_only") => vec![("true", "فقط فعال")],
        (Resource::ResearchProducts | Resource::Affiliates, "status") => options!(ActiveState),
        _ => Vec::new(),
    }
}

/// Select options of the create/edit dialogs and the record action forms.
pub fn choices(resource: Resource) -> BTreeMap<&'static str, Vec<(&'static str, &'static str)>> {
    let choices = match resource {
        Resource::Users => vec![("status", options!(UserStatus))],
        Resource::Admins => vec![
            ("role", options!(AdminRole)),
            ("status", options!(AdminStatus)),
            ("permissions", PERMISSIONS.to_vec()),
        ],
        Resource::Products => vec![("status", options!(ProductStatus))],
        Resource::Withdrawals => vec![("status", options!(WithdrawalStatus))],
        Resource::Licenses => vec![("type", options!(LicenseKind))],
        Resource::Tickets => vec![("status", options!(TicketStatus))],
        Resource::Education => vec![
            ("category", options!(EducationCategory)),
            ("level", options!(EducationLevel)),
            ("status", options!(PublishState)),
        ],
        Resource::Suppliers | Resource::Visitors => Vec::new(),
        Resource::Popups => vec![
            ("kind", options!(PopupKind)),
            ("position", options!(PopupPosition)),
        ],
        Resource::Notifications => vec![
            ("kind", options!(NotificationKind)),
            ("priority", options!(NotificationPriority)),
        ],
        Resource::Sliders => vec![("link_type", options!(SliderLinkType))],
        Resource::ResearchProducts => vec![("level", options!(MarketLevel))],
        Resource::Affiliates => Vec::new(),
    };
    choices.into_iter().collect()
}

fn filter_label(key: &str) -> &'static str {
    match key {
        "status" => "وضعیت",
        "category" => "دسته‌بندی",
        "method" => "روش پرداخت",
        "type" => "نوع",
        "priority" => "اولویت",
        "level" => "سطح",
        "is_featured" => "ویژه",
        "active_only" => "نمایش",
        "hs_code" => "کد HS",
        _ => "فیلتر",
    }
}

fn href(slug: &str, query: &ListQuery) -> String {
    let query_string = query.to_query_string();
    if query_string.is_empty() {
        format!("/{slug}")
    } else {
        format!("/{slug}?{query_string}")
    }
}

impl ListView {
    pub fn build<V: ViewModel>(data: &ListPageData<V>) -> Self {
        let resource = data.resource;
        let slug = resource.slug();
        let query = &data.query;

        let columns = V::columns()
            .iter()
            .map(|column| {
                let sorted = (query.sort_field.as_deref() == Some(column.key))
                    .then(|| query.sort_order.as_str());
                let sort_href = column.sortable.then(|| {
                    href(
                        slug,
                        &query.with(|next| {
                            next.sort_by(column.key);
                            next.set_page(1);
                        }),
                    )
                });
                ColumnView {
                    key: column.key,
                    label: column.label,
                    sort_href,
                    sorted,
                }
            })
            .collect();

        let rows = data
            .items
            .items
            .iter()
            .map(|item| {
                let record = serde_json::to_value(item).unwrap_or(Value::Null);
                RowView {
                    id: item.id().to_string(),
                    cells: V::columns()
                        .iter()
                        .map(|column| item.field(column.key).to_string())
                        .collect(),
                    selected: data.selection.contains(item.id()),
                    active: record.get("status").and_then(Value::as_str) == Some("active"),
                    record,
                }
            })
            .collect();

        let filters = resource
            .filter_keys()
            .iter()
            .map(|key| FilterGroup {
                key,
                label: filter_label(key),
                options: filter_options(resource, key)
                    .into_iter()
                    .map(|(value, label)| FilterOption {
                        value,
                        label,
                        active: query.has_filter(key, value),
                        href: href(slug, &query.with(|next| next.toggle_filter(key, value))),
                    })
                    .collect(),
            })
            .filter(|group| !group.options.is_empty())
            .collect();

        let select_all_href = (!data.items.items.is_empty())
            .then(|| format!("{}&select=all", href(slug, query)));

        let pages = data
            .items
            .pages
            .iter()
            .map(|number| PageLink {
                number: *number,
                href: href(slug, &query.with(|next| next.set_page(*number))),
                current: *number == data.items.page,
            })
            .collect();

        Self {
            slug,
            title: resource.title(),
            query_string: query.to_query_string(),
            search: query.search.clone(),
            columns,
            rows,
            filters,
            pages,
            previous_href: data
                .items
                .has_previous
                .then(|| href(slug, &query.with(|next| next.set_page(query.page - 1)))),
            next_href: data
                .items
                .has_next
                .then(|| href(slug, &query.with(|next| next.set_page(query.page + 1)))),
            page: data.items.page,
            total: data.items.total,
            total_pages: data.items.total_pages,
            bulk_actions: resource
                .bulk_actions()
                .iter()
                .map(|action| BulkActionView {
                    value: action.as_str(),
                    label: action.label(),
                    destructive: action.is_destructive(),
                })
                .collect(),
            selected_count: data.selection.len(),
            select_all_href,
            clear_selection_href: href(slug, query),
            editable: resource.editable(),
            toggles_active: resource.toggles_active(),
            reviewable: resource.reviewable(),
            deletable: resource.deletable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::normalize::Raw;
    use serde_json::json;

    fn page_data(query: ListQuery) -> ListPageData<User> {
        let raw = json!({"id": 4, "name": "Ali", "status": "active"});
        let items = vec![User::normalize(Raw::new(&raw))];
        ListPageData {
            resource: Resource::Users,
            items: Paginated::new(items, query.page, 25, 3),
            query,
            selection: [crate::domain::types::ResourceId::new("4").unwrap()]
                .into_iter()
                .collect(),
            error: None,
        }
    }

    #[test]
    fn rows_render_cells_selection_and_state() {
        let view = ListView::build(&page_data(ListQuery::new(10)));
        assert_eq!(view.rows.len(), 1);
        assert!(view.rows[0].selected);
        assert!(view.rows[0].active);
        assert_eq!(view.rows[0].cells.len(), User::columns().len());
        assert_eq!(view.selected_count, 1);
        assert_eq!(
            view.select_all_href.as_deref(),
            Some("/users?page=1&per_page=10&select=all")
        );
    }

    #[test]
    fn filter_links_toggle_values() {
        let query = ListQuery::from_query_string("status=active", &["status"], 10);
        let view = ListView::build(&page_data(query));
        let status = &view.filters[0];
        let active = status.options.iter().find(|o| o.value == "active").unwrap();
        assert!(active.active);
        assert_eq!(active.href, "/users?page=1&per_page=10");
        let banned = status.options.iter().find(|o| o.value == "banned").unwrap();
        assert!(banned.href.contains("status=active&status=banned"));
    }

    #[test]
    fn pager_links_cover_the_window() {
        let mut query = ListQuery::new(10);
        query.set_page(2);
        let view = ListView::build(&page_data(query));
        let numbers: Vec<_> = view.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(view.previous_href.is_some());
        assert!(view.next_href.is_some());
        assert!(view.pages[1].current);
    }

    #[test]
    fn open_filter_keys_render_no_controls() {
        assert!(filter_options(Resource::Products, "category").is_empty());
        assert_eq!(filter_options(Resource::Suppliers, "is_featured").len(), 2);
    }
}
