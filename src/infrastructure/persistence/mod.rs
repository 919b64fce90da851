//! Record store implementations.
//!
//! # Stores
//!
//! - [`PgRecordStore`] - PostgreSQL storage via SQLx
//! - [`MemoryRecordStore`] - In-process storage for tests and ephemeral deployments

pub mod memory_record_store;
pub mod pg_record_store;

pub use memory_record_store::MemoryRecordStore;
pub use pg_record_store::PgRecordStore;
