//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating record store
//! calls, validation, and expiry rules. Services consume the
//! [`crate::domain::repositories::RecordStore`] trait and provide a clean API
//! for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shortening_service::ShorteningService`] - Short link creation
//! - [`services::redirect_resolver::RedirectResolver`] - Short code resolution

pub mod services;
