//! Route access rules and the guard state machine.
//!
//! The guard is pure: [`decide`] maps a request path and the signed-in user
//! (if any) to what the middleware should do.

use crate::domain::auth::AdminUser;

/// Who may open a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Reachable without a session.
    Public,
    /// Any signed-in administrator.
    Session,
    /// At least one of the listed permissions (or the wildcard).
    AnyPermission(&'static [&'static str]),
    /// Support desk staff only.
    SupportRole,
}

#[derive(Clone, Copy, Debug)]
pub struct RouteRule {
    pub prefix: &'static str,
    pub access: Access,
}

const fn rule(prefix: &'static str, access: Access) -> RouteRule {
    RouteRule { prefix, access }
}

/// Access table. The longest matching prefix wins; unmatched paths need a session.
pub const ROUTE_RULES: &[RouteRule] = &[
    rule("/login", Access::Public),
    rule("/logout", Access::Public),
    rule("/auth", Access::Public),
    rule("/assets", Access::Public),
    rule(
        "/users",
        Access::AnyPermission(&["users.view", "users.manage"]),
    ),
    rule(
        "/admins",
        Access::AnyPermission(&["admins.view", "admins.manage"]),
    ),
    rule("/statistics", Access::AnyPermission(&["reports.view"])),
    rule(
        "/withdrawals",
        Access::AnyPermission(&["users.manage", "reports.view"]),
    ),
    rule(
        "/licenses",
        Access::AnyPermission(&["products.view", "products.manage"]),
    ),
    rule(
        "/suppliers",
        Access::AnyPermission(&["products.view", "products.manage"]),
    ),
    rule(
        "/products",
        Access::AnyPermission(&["products.view", "products.manage"]),
    ),
    rule(
        "/tickets",
        Access::AnyPermission(&["tickets.view", "tickets.manage"]),
    ),
    rule("/visitors", Access::AnyPermission(&["reports.view"])),
    rule(
        "/popups",
        Access::AnyPermission(&["settings.manage", "products.manage"]),
    ),
    rule(
        "/sliders",
        Access::AnyPermission(&["settings.manage", "products.manage"]),
    ),
    rule(
        "/research-products",
        Access::AnyPermission(&["products.view", "products.manage"]),
    ),
    rule(
        "/affiliates",
        Access::AnyPermission(&["users.view", "users.manage"]),
    ),
    rule(
        "/notifications",
        Access::AnyPermission(&["users.manage", "settings.manage"]),
    ),
    rule(
        "/education",
        Access::AnyPermission(&["products.view", "products.manage"]),
    ),
    rule("/export", Access::AnyPermission(&["reports.view"])),
    rule("/settings", Access::AnyPermission(&["settings.manage"])),
    rule("/settings/theme", Access::Session),
    rule("/support/tickets", Access::SupportRole),
];

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Access rule for `path`.
pub fn access_for(path: &str) -> Access {
    ROUTE_RULES
        .iter()
        .filter(|rule| matches_prefix(path, rule.prefix))
        .max_by_key(|rule| rule.prefix.len())
        .map(|rule| rule.access)
        .unwrap_or(Access::Session)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    AuthenticatedNoPermission,
    AuthenticatedAuthorized,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Sign in first, then come back to `next`.
    RedirectToLogin { next: String },
    /// Signed in but not allowed here; sent home without a message.
    RedirectHome,
}

pub fn evaluate(access: Access, user: Option<&AdminUser>) -> GuardState {
    let Some(user) = user else {
        return if access == Access::Public {
            GuardState::AuthenticatedAuthorized
        } else {
            GuardState::Unauthenticated
        };
    };
    let allowed = match access {
        Access::Public | Access::Session => true,
        Access::AnyPermission(required) => user.has_any_permission(required),
        Access::SupportRole => user.is_support_staff(),
    };
    if allowed {
        GuardState::AuthenticatedAuthorized
    } else {
        GuardState::AuthenticatedNoPermission
    }
}

/// Decides how to answer a request for `path`; `target` is the path with its
/// query string, preserved for the post-login redirect.
pub fn decide(path: &str, target: &str, user: Option<&AdminUser>) -> GuardDecision {
    match evaluate(access_for(path), user) {
        GuardState::AuthenticatedAuthorized => GuardDecision::Render,
        GuardState::AuthenticatedNoPermission => GuardDecision::RedirectHome,
        GuardState::Unauthenticated => GuardDecision::RedirectToLogin {
            next: target.to_string(),
        },
    }
}

/// Location of the login page carrying `next`.
pub fn login_location(next: &str) -> String {
    if next.is_empty() || next == "/" {
        return "/login".to_string();
    }
    match serde_html_form::to_string([("next", next)]) {
        Ok(query) => format!("/login?{query}"),
        Err(_) => "/login".to_string(),
    }
}

/// Post-login destination; only local absolute paths are honoured.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') => {
            next.to_string()
        }
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, permissions: &[&str]) -> AdminUser {
        AdminUser {
            id: "1".to_string(),
            name: "Test".to_string(),
            email: String::new(),
            username: String::new(),
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn anonymous_requests_go_to_login_with_next() {
        assert_eq!(
            decide("/users", "/users?page=2", None),
            GuardDecision::RedirectToLogin {
                next: "/users?page=2".to_string()
            }
        );
        assert_eq!(decide("/login", "/login", None), GuardDecision::Render);
        assert_eq!(decide("/assets/app.css", "/assets/app.css", None), GuardDecision::Render);
        assert!(matches!(decide("/", "/", None), GuardDecision::RedirectToLogin { .. }));
    }

    #[test]
    fn missing_permission_redirects_home() {
        let viewer = user("admin", &["reports.view"]);
        assert_eq!(decide("/users", "/users", Some(&viewer)), GuardDecision::RedirectHome);
        assert_eq!(decide("/statistics", "/statistics", Some(&viewer)), GuardDecision::Render);
        assert_eq!(decide("/withdrawals/5", "/withdrawals/5", Some(&viewer)), GuardDecision::Render);
    }

    #[test]
    fn catalogue_pages_follow_product_and_user_permissions() {
        let catalogue = user("admin", &["products.view"]);
        assert_eq!(
            decide("/research-products", "/research-products", Some(&catalogue)),
            GuardDecision::Render
        );
        assert_eq!(decide("/sliders", "/sliders", Some(&catalogue)), GuardDecision::RedirectHome);
        assert_eq!(
            decide("/affiliates/3/edit", "/affiliates/3/edit", Some(&catalogue)),
            GuardDecision::RedirectHome
        );
        let support = user("admin", &["users.view"]);
        assert_eq!(decide("/affiliates", "/affiliates", Some(&support)), GuardDecision::Render);
    }

    #[test]
    fn wildcard_opens_everything_but_the_support_desk() {
        let root = user("super_admin", &["all"]);
        assert_eq!(decide("/settings", "/settings", Some(&root)), GuardDecision::Render);
        assert_eq!(
            decide("/support/tickets", "/support/tickets", Some(&root)),
            GuardDecision::RedirectHome
        );
    }

    #[test]
    fn support_staff_reach_the_support_desk() {
        let support = user("support_admin", &[]);
        assert_eq!(
            decide("/support/tickets/4", "/support/tickets/4", Some(&support)),
            GuardDecision::Render
        );
        assert_eq!(decide("/tickets", "/tickets", Some(&support)), GuardDecision::RedirectHome);
    }

    #[test]
    fn prefixes_match_whole_segments() {
        assert_eq!(access_for("/usersettings"), Access::Session);
        assert_eq!(access_for("/settings/theme"), Access::Session);
        assert_eq!(access_for("/settings/general"), Access::AnyPermission(&["settings.manage"]));
    }

    #[test]
    fn login_location_encodes_next() {
        assert_eq!(login_location("/"), "/login");
        assert_eq!(login_location("/users?page=2"), "/login?next=%2Fusers%3Fpage%3D2");
    }

    #[test]
    fn only_local_next_targets_are_followed() {
        assert_eq!(safe_next(Some("/users")), "/users");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
