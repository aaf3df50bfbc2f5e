//! Domain view models exposed by the admin panel.
//!
//! Every list page renders one [`ViewModel`]: a canonical, fully defaulted
//! shape built from whatever the backend returned for that resource.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::normalize::Raw;

pub mod admin;
pub mod affiliate;
pub mod auth;
pub mod bulk;
pub mod education;
pub mod license;
pub mod notification;
pub mod popup;
pub mod product;
pub mod research_product;
pub mod resource;
pub mod settings;
pub mod slider;
pub mod stats;
pub mod store;
pub mod supplier;
pub mod ticket;
pub mod types;
pub mod user;
pub mod visitor;
pub mod withdrawal;

use resource::Resource;

/// Table column metadata shared by list pages and the export screen.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Column {
    /// Canonical field key understood by [`ViewModel::field`].
    pub key: &'static str,
    pub label: &'static str,
    /// Whether the column header toggles server/client sorting.
    pub sortable: bool,
    /// Whether the column is pre-selected on the export screen.
    pub exported: bool,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
            exported: true,
        }
    }

    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub const fn hidden(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// Single cell value used for sorting and export.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Empty,
}

impl FieldValue {
    /// Total order used by client-side sorting. Empty cells sort first.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Empty, FieldValue::Empty) => Ordering::Equal,
            (FieldValue::Empty, _) => Ordering::Less,
            (_, FieldValue::Empty) => Ordering::Greater,
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Flag(true) => f.write_str("بله"),
            FieldValue::Flag(false) => f.write_str("خیر"),
            FieldValue::Empty => Ok(()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Text(value)
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::from(value.to_string())
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::from).unwrap_or(FieldValue::Empty)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Canonical entity shape rendered by a list page.
pub trait ViewModel: Clone + Serialize {
    /// Backend collection this view model is read from.
    const RESOURCE: Resource;

    /// Builds the view model, defaulting every missing field. Never fails.
    fn normalize(raw: Raw<'_>) -> Self;

    fn id(&self) -> &str;

    fn columns() -> &'static [Column];

    /// Cell value for a canonical column key; unknown keys yield `Empty`.
    fn field(&self, key: &str) -> FieldValue;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_order_numbers_numerically() {
        let small = FieldValue::from(9.0);
        let large = FieldValue::from(10.0);
        assert_eq!(small.compare(&large), Ordering::Less);
        assert_eq!(FieldValue::Empty.compare(&small), Ordering::Less);
        assert_eq!(
            FieldValue::from("b").compare(&FieldValue::from("a")),
            Ordering::Greater
        );
    }

    #[test]
    fn field_values_render_for_export() {
        assert_eq!(FieldValue::from(1500.0).to_string(), "1500");
        assert_eq!(FieldValue::from(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::from(String::new()), FieldValue::Empty);
    }
}
