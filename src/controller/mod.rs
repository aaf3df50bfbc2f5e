//! Paging, filtering, sorting, selection and bulk actions for list pages.

pub mod list;
pub mod query;
pub mod selection;

pub use list::{ListController, ListResult, ListSnapshot};
pub use query::{ListQuery, SortOrder};
pub use selection::{SelectionPolicy, SelectionSet};
