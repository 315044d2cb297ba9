//! The store seam used by the resolvers.

use std::sync::Arc;

use async_trait::async_trait;
use coverage_map_address_models::{AddressNumber, BoundingBox, CoveragePoint, LocalityRow};
use switchy_database::Database;

use crate::{DbError, queries};

/// Read-only queries the resolvers need from the address store.
///
/// `pattern` arguments are SQL `LIKE` patterns built with
/// [`crate::pattern`]. Implementations match them case-insensitively and
/// ignoring diacritics, and must honour `limit`.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Localities whose name matches `pattern`.
    async fn find_localities(&self, pattern: &str, limit: u32)
    -> Result<Vec<LocalityRow>, DbError>;

    /// Distinct raw street strings under `locality_code` matching
    /// `pattern`.
    async fn find_streets(
        &self,
        locality_code: &str,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<String>, DbError>;

    /// Building numbers under `locality_code` on one of `street_variants`
    /// (exact, raw spelling) or on no street when the slice is empty.
    async fn find_numbers(
        &self,
        locality_code: &str,
        street_variants: &[String],
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<AddressNumber>, DbError>;

    /// Points actively served by `operator_id` strictly inside `bbox`.
    async fn find_coverage_points(
        &self,
        operator_id: i64,
        bbox: &BoundingBox,
        limit: u32,
    ) -> Result<Vec<CoveragePoint>, DbError>;
}

/// [`AddressStore`] backed by the Postgres address database.
pub struct PgAddressStore {
    db: Arc<dyn Database>,
}

impl PgAddressStore {
    /// Wraps a shared database connection.
    #[must_use]
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressStore for PgAddressStore {
    async fn find_localities(
        &self,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<LocalityRow>, DbError> {
        queries::find_localities(self.db.as_ref(), pattern, limit).await
    }

    async fn find_streets(
        &self,
        locality_code: &str,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<String>, DbError> {
        queries::find_streets(self.db.as_ref(), locality_code, pattern, limit).await
    }

    async fn find_numbers(
        &self,
        locality_code: &str,
        street_variants: &[String],
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<AddressNumber>, DbError> {
        queries::find_numbers(
            self.db.as_ref(),
            locality_code,
            street_variants,
            pattern,
            limit,
        )
        .await
    }

    async fn find_coverage_points(
        &self,
        operator_id: i64,
        bbox: &BoundingBox,
        limit: u32,
    ) -> Result<Vec<CoveragePoint>, DbError> {
        queries::find_coverage_points(self.db.as_ref(), operator_id, bbox, limit).await
    }
}
