//! Business logic services for the application layer.

pub mod redirect_resolver;
pub mod shortening_service;

pub use redirect_resolver::RedirectResolver;
pub use shortening_service::{CollisionPolicy, Shortened, ShorteningService};
