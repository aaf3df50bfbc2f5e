//! Authenticated administrator and permission checks.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::types::LoginIdentifier;
use crate::normalize::Raw;

/// Permission granting every other permission.
pub const WILDCARD_PERMISSION: &str = "all";

/// Permissions an administrator can be granted, with their labels.
pub const PERMISSIONS: &[(&str, &str)] = &[
    ("users.view", "مشاهده کاربران"),
    ("users.manage", "مدیریت کاربران"),
    ("admins.view", "مشاهده مدیران"),
    ("admins.manage", "مدیریت مدیران"),
    ("products.view", "مشاهده محصولات"),
    ("products.manage", "مدیریت محصولات"),
    ("tickets.view", "مشاهده تیکت‌ها"),
    ("tickets.manage", "مدیریت تیکت‌ها"),
    ("reports.view", "مشاهده گزارش‌ها"),
    ("settings.manage", "مدیریت تنظیمات"),
];

/// Roles allowed into the support ticket desk.
pub const SUPPORT_ROLES: &[&str] = &["moderator", "support_admin"];

/// Administrator signed into the panel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl AdminUser {
    /// Builds the signed-in user from the backend's login or `/me` payload.
    ///
    /// Super admins receive the wildcard permission regardless of the list
    /// the backend sent.
    pub fn from_backend(raw: Raw<'_>) -> Self {
        let is_super = raw.flag_or(&["is_admin", "is_full_admin", "is_super_admin"], false);
        let role = raw
            .text(&["role"])
            .unwrap_or_else(|| if is_super { "super_admin" } else { "admin" }.to_string());
        let permissions = if is_super || role == "super_admin" {
            vec![WILDCARD_PERMISSION.to_string()]
        } else {
            raw.strings(&["permissions"])
        };

        Self {
            id: raw.id(),
            name: raw
                .text(&["name"])
                .or_else(|| raw.full_name(""))
                .or_else(|| raw.text(&["username", "email"]))
                .unwrap_or_else(|| "مدیر".to_string()),
            email: raw.text_or(&["email"], ""),
            username: raw.text_or(&["username", "phone"], ""),
            role,
            permissions,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|held| held == WILDCARD_PERMISSION || held == permission)
    }

    /// True when no permission is required or at least one is held.
    pub fn has_any_permission(&self, required: &[&str]) -> bool {
        required.is_empty() || required.iter().any(|p| self.has_permission(p))
    }

    pub fn is_support_staff(&self) -> bool {
        SUPPORT_ROLES.contains(&self.role.as_str())
    }
}

/// Login body for the backend: phone numbers and plain names are sent as
/// `username`, anything containing `@` as `email`.
pub fn credentials_payload(identifier: &LoginIdentifier, password: &str) -> Value {
    let id = identifier.as_str();
    if id.contains('@') {
        json!({ "email": id, "password": password })
    } else {
        json!({ "username": id, "password": password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: &str, permissions: &[&str]) -> AdminUser {
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
    fn wildcard_grants_everything() {
        let user = user_with("admin", &["all"]);
        assert!(user.has_permission("users.manage"));
        assert!(user.has_any_permission(&["reports.view"]));
    }

    #[test]
    fn any_permission_semantics() {
        let user = user_with("admin", &["reports.view"]);
        assert!(user.has_any_permission(&["users.manage", "reports.view"]));
        assert!(!user.has_any_permission(&["users.manage"]));
        assert!(user.has_any_permission(&[]));
    }

    #[test]
    fn super_admin_payload_gets_wildcard() {
        let value = json!({"id": 1, "first_name": "Ali", "is_admin": true, "permissions": ["x"]});
        let user = AdminUser::from_backend(Raw::new(&value));
        assert_eq!(user.role, "super_admin");
        assert_eq!(user.permissions, vec!["all"]);
        assert_eq!(user.name, "Ali");
    }

    #[test]
    fn support_roles_are_recognized() {
        assert!(user_with("support_admin", &[]).is_support_staff());
        assert!(user_with("moderator", &[]).is_support_staff());
        assert!(!user_with("admin", &[]).is_support_staff());
    }

    #[test]
    fn login_payload_picks_field_by_shape() {
        let phone = LoginIdentifier::new("09120000000").unwrap();
        let email = LoginIdentifier::new("admin@asll.ir").unwrap();
        assert_eq!(credentials_payload(&phone, "secret")["username"], "09120000000");
        assert_eq!(credentials_payload(&email, "secret")["email"], "admin@asll.ir");
    }
}
