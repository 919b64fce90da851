//! Core domain entities.
//!
//! - [`UrlRecord`] - A stored short link
//! - [`NewUrlRecord`] - Insert payload; the store assigns the id

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
