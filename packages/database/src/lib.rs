#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Read-only access to the address and coverage store.
//!
//! The store is owned by the surrounding application; this crate only
//! reads from it. Queries are raw parameterized SQL issued through
//! `switchy_database`'s `query_raw_params()`, since they rely on Postgres
//! `ILIKE` and the `unaccent` extension.
//!
//! Resolvers depend on the [`store::AddressStore`] trait rather than on a
//! database handle directly, so they can run against
//! [`store::PgAddressStore`] in production and an in-memory store in tests.

pub mod db;
pub mod pattern;
pub mod queries;
pub mod store;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
