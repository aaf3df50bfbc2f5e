//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., non-empty identifiers,
//! normalized/validated email) so that once a value reaches the domain layer it
//! can be treated as trusted. Status enums map the backend's wire strings onto
//! closed sets with a documented fallback.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is empty or contains path separators.
    #[error("invalid identifier")]
    InvalidId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Identifier of a backend record.
///
/// The backend mixes numeric and string identifiers, so ids are carried as
/// trimmed strings and only checked to be safe as a single URL path segment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Trims the raw id and rejects empty values and path separators.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() || trimmed.contains(['/', '?', '#']) {
            return Err(TypeConstraintError::InvalidId);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the identifier as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResourceId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceId> for String {
    fn from(value: ResourceId) -> Self {
        value.0
    }
}

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    LoginIdentifier,
    "Username, phone or email typed into the login form."
);

non_empty_string_newtype!(
    DisplayName,
    "Person or record title enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    AdminNotes,
    "Reviewer notes attached to approvals and rejections."
);

/// Message body that may carry user-supplied HTML.
///
/// Content is passed through `ammonia` so that popups, notifications and
/// ticket replies never forward script or event-handler markup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SanitizedText(String);

impl SanitizedText {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let trimmed = sanitized.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SanitizedText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates a closed status enum with wire names, labels and a fallback.
///
/// `parse` recognizes the wire name only; `Default` yields the variant marked
/// with `default` and is what normalizers fall back to.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation used by the backend.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Human readable label rendered in tables.
            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Parses the wire representation.
            pub fn parse(value: &str) -> Option<Self> {
                match value.trim() {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Parses the wire representation, falling back to the default.
            pub fn parse_or_default(value: Option<&str>) -> Self {
                value.and_then(Self::parse).unwrap_or_default()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::types::TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| {
                    $crate::domain::types::TypeConstraintError::InvalidValue(s.to_string())
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&raw).ok_or_else(|| {
                    ::serde::de::Error::custom(format!("unknown {} `{raw}`", stringify!($name)))
                })
            }
        }
    };
}

pub(crate) use status_enum;

status_enum!(
    /// Shared on/off state for records toggled by activate/deactivate.
    ActiveState, default = Inactive {
        Active => ("active", "فعال"),
        Inactive => ("inactive", "غیرفعال"),
    }
);

impl ActiveState {
    /// Maps a backend `is_active` flag.
    pub fn from_flag(active: bool) -> Self {
        if active {
            ActiveState::Active
        } else {
            ActiveState::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        self == ActiveState::Active
    }
}

status_enum!(
    /// Review state of supplier and visitor registrations.
    ReviewStatus, default = Pending {
        Pending => ("pending", "در انتظار بررسی"),
        Approved => ("approved", "تایید شده"),
        Rejected => ("rejected", "رد شده"),
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_trims_and_rejects_separators() {
        assert_eq!(ResourceId::new(" 42 ").unwrap().as_str(), "42");
        assert_eq!(ResourceId::new(""), Err(TypeConstraintError::InvalidId));
        assert_eq!(ResourceId::new("1/2"), Err(TypeConstraintError::InvalidId));
    }

    #[test]
    fn email_is_normalized() {
        let email = EmailAddress::new("  Admin@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "admin@example.com");
        assert!(EmailAddress::new("not-an-email").is_err());
    }

    #[test]
    fn sanitized_text_strips_scripts() {
        let text = SanitizedText::new("<b>Hi</b><script>alert(1)</script>").unwrap();
        assert_eq!(text.as_str(), "<b>Hi</b>");
        assert!(SanitizedText::new("<script>x</script>").is_err());
    }

    #[test]
    fn status_enum_parses_wire_names_and_defaults() {
        assert_eq!(ReviewStatus::parse("approved"), Some(ReviewStatus::Approved));
        assert_eq!(ReviewStatus::parse("unknown"), None);
        assert_eq!(ReviewStatus::parse_or_default(None), ReviewStatus::Pending);
        assert_eq!(ActiveState::from_flag(false).as_str(), "inactive");
        assert_eq!(
            serde_json::to_string(&ActiveState::Active).unwrap(),
            "\"active\""
        );
    }
}
