//! Parser module for HTML documents

pub mod document;

pub use document::{classify_links, LinkStats, PageDocument};
