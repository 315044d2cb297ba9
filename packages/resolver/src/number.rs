//! Building-number lookup scoped to a locality and street.

use coverage_map_address_models::{AddressNumber, Lookup};
use coverage_map_database::pattern::{contains_pattern, prefix_pattern};
use coverage_map_database::store::AddressStore;
use coverage_map_normalize::natural_cmp;

use crate::config::ResolverConfig;
use crate::{clamp_cap, degrade};

/// Orders numbers naturally (`9 < 10 < 10A`), breaking ties by id, and
/// truncates to `cap`.
#[must_use]
pub fn sort_numbers(mut numbers: Vec<AddressNumber>, cap: usize) -> Vec<AddressNumber> {
    numbers.sort_by(|a, b| {
        natural_cmp(&a.street_number, &b.street_number).then_with(|| a.id.cmp(&b.id))
    });
    numbers.truncate(cap);
    numbers
}

/// Resolves a partial building number under `locality_code`.
///
/// `street_variants` are the raw spellings of the chosen street, as
/// returned in [`coverage_map_address_models::StreetCandidate::raw_variants`].
/// An empty slice selects addresses with no street, for localities that
/// number buildings directly.
///
/// With at most one variant the query matches as a prefix; with several it
/// matches anywhere in the number. `cap` defaults to `number_limit` and is
/// clamped to `1..=number_max_limit`.
pub async fn resolve_numbers(
    store: &dyn AddressStore,
    config: &ResolverConfig,
    locality_code: &str,
    street_variants: &[String],
    query: &str,
    cap: Option<usize>,
) -> Lookup<Vec<AddressNumber>> {
    let locality_code = locality_code.trim();
    let query = query.trim();
    if locality_code.is_empty() || query.is_empty() {
        return Lookup::Ready(Vec::new());
    }

    let mut variants: Vec<String> = Vec::with_capacity(street_variants.len());
    for variant in street_variants {
        if !variant.is_empty() && !variants.contains(variant) {
            variants.push(variant.clone());
        }
    }

    let pattern = if variants.len() > 1 {
        contains_pattern(query)
    } else {
        prefix_pattern(query)
    };
    let cap = clamp_cap(cap, config.number_limit, config.number_max_limit);

    log::debug!(
        "resolve_numbers: locality={locality_code} variants={} pattern={pattern:?} cap={cap}",
        variants.len()
    );

    match store
        .find_numbers(locality_code, &variants, &pattern, config.number_scan_limit)
        .await
    {
        Ok(numbers) => Lookup::Ready(sort_numbers(numbers, cap)),
        Err(e) => degrade("resolve_numbers", &e),
    }
}
