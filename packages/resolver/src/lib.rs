#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Address funnel and coverage lookups.
//!
//! The funnel narrows a free-text locality to a street and then to a
//! building number, one keystroke at a time:
//!
//! 1. [`locality`]: partial name to ranked locality candidates
//! 2. [`street`]: locality code and partial street to canonical streets,
//!    each carrying the raw spellings found in the address table
//! 3. [`number`]: locality code and raw street spellings to building
//!    numbers in natural order
//!
//! [`coverage`] is independent of the funnel and answers map viewport
//! queries for one operator, refusing boxes larger than the configured
//! area limit.
//!
//! Every lookup is read-only and makes at most one store round trip. Store
//! failures come back as [`Lookup::Degraded`] and never as errors.

pub mod config;
pub mod coverage;
pub mod locality;
pub mod number;
pub mod street;

#[cfg(test)]
mod test_store;

use std::sync::Arc;

use coverage_map_address_models::{
    AddressNumber, BoundingBox, CoverageBox, LocalityCandidate, Lookup, StreetCandidate,
};
use coverage_map_database::DbError;
use coverage_map_database::store::AddressStore;

pub use config::{ConfigError, ResolverConfig};
pub use coverage_map_normalize::normalize_operator_name;

/// Logs a store failure and turns it into a degraded lookup.
fn degrade<T>(operation: &str, e: &DbError) -> Lookup<T> {
    log::warn!("{operation} degraded: {e}");
    Lookup::Degraded {
        reason: e.to_string(),
    }
}

/// Clamps a caller-supplied cap into `1..=max`, falling back to `default`.
fn clamp_cap(cap: Option<usize>, default: usize, max: usize) -> usize {
    cap.unwrap_or(default).clamp(1, max.max(1))
}

/// Lookups against a shared [`AddressStore`].
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn AddressStore>,
    config: ResolverConfig,
}

impl Resolver {
    /// Creates a resolver over `store` with the given limits.
    #[must_use]
    pub fn new(store: Arc<dyn AddressStore>, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    /// The limits in effect.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// See [`locality::resolve_localities`].
    pub async fn resolve_localities(
        &self,
        query: &str,
        cap: Option<usize>,
    ) -> Lookup<Vec<LocalityCandidate>> {
        locality::resolve_localities(self.store.as_ref(), &self.config, query, cap).await
    }

    /// See [`street::resolve_streets`].
    pub async fn resolve_streets(
        &self,
        locality_code: &str,
        query: &str,
    ) -> Lookup<Vec<StreetCandidate>> {
        street::resolve_streets(self.store.as_ref(), &self.config, locality_code, query).await
    }

    /// See [`number::resolve_numbers`].
    pub async fn resolve_numbers(
        &self,
        locality_code: &str,
        street_variants: &[String],
        query: &str,
        cap: Option<usize>,
    ) -> Lookup<Vec<AddressNumber>> {
        number::resolve_numbers(
            self.store.as_ref(),
            &self.config,
            locality_code,
            street_variants,
            query,
            cap,
        )
        .await
    }

    /// See [`coverage::query_coverage_box`].
    pub async fn query_coverage_box(
        &self,
        operator_id: i64,
        bbox: &BoundingBox,
    ) -> Lookup<CoverageBox> {
        coverage::query_coverage_box(self.store.as_ref(), &self.config, operator_id, bbox).await
    }
}
