//! DTO modules that bridge services with templates.

pub mod list;
pub mod pages;
