//! Record store: CRUD over appointments, barbers, and notices.
//!
//! [`RecordStore`] fronts an optional [`Backend`] (PostgreSQL in
//! production) and an optional in-memory [`MemoryBackend`] seeded with
//! the fallback dataset. Callers never see which one answered except
//! through the [`DataSource`] tag on every result.

pub mod backend;
pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record_store;
pub mod seed;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::Backend;
pub use error::{BackendError, StoreError};
pub use memory::MemoryBackend;
pub use postgres::PostgresBackend;
pub use record_store::{DEFAULT_CALL_TIMEOUT, DataSource, RecordStore, Sourced, StoreMode};
pub use seed::{Dataset, fallback_dataset};
