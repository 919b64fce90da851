//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization. Input rules
//! live in the application layer, not here.

pub mod health;
pub mod shorten;
