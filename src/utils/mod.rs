//! Utility functions for code generation and input validation.
//!
//! - [`code_generator`] - Short code derivation and shape validation
//! - [`url_validator`] - URL validation for shortening requests
//! - [`short_url`] - Public short URL construction
//! - [`db_error`] - PostgreSQL constraint violation mapping

pub mod code_generator;
pub mod db_error;
pub mod short_url;
pub mod url_validator;
