//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Testing
//!
//! See integration tests in `tests/repository_record.rs` for usage examples.

pub mod record_store;

pub use record_store::{ConflictKind, InsertOutcome, RecordStore};

#[cfg(test)]
pub use record_store::MockRecordStore;
