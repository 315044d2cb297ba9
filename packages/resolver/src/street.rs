//! Street autocomplete with raw-variant accumulation.
//!
//! The address table spells the same street many ways (`ul. Kwiatowa`,
//! `KWIATOWA`, `Kwiatowa`). Each raw spelling is normalized and grouped
//! under its canonical name, and every spelling is kept so number lookups
//! can match the raw column exactly.

use std::collections::{BTreeSet, HashMap};

use coverage_map_address_models::{Lookup, StreetCandidate};
use coverage_map_database::pattern::contains_pattern;
use coverage_map_database::store::AddressStore;
use coverage_map_normalize::{locale_cmp, normalize_street};

use crate::config::ResolverConfig;
use crate::degrade;

/// Groups raw street strings by lowercased canonical name.
///
/// The first raw string seen for a group fixes its canonical name and sort
/// key. Strings that normalize to nothing are skipped. The result is
/// ordered by sort key (Polish collation), then canonical name, and
/// truncated to `cap`.
#[must_use]
pub fn group_streets<I, S>(raw_streets: I, cap: usize) -> Vec<StreetCandidate>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut candidates: Vec<StreetCandidate> = Vec::new();

    for raw in raw_streets {
        let raw = raw.into();
        let normalized = normalize_street(&raw);
        if normalized.canonical.is_empty() {
            continue;
        }

        let key = normalized.canonical.to_lowercase();
        let idx = *index.entry(key).or_insert_with(|| {
            candidates.push(StreetCandidate {
                canonical_name: normalized.canonical,
                sort_key: normalized.sort_key,
                raw_variants: BTreeSet::new(),
            });
            candidates.len() - 1
        });
        candidates[idx].raw_variants.insert(raw);
    }

    candidates.sort_by(|a, b| {
        locale_cmp(&a.sort_key, &b.sort_key)
            .then_with(|| locale_cmp(&a.canonical_name, &b.canonical_name))
    });
    candidates.truncate(cap);
    candidates
}

/// Resolves a partial street name under `locality_code` to canonical
/// street candidates.
///
/// An empty locality code or a query shorter than `street_min_chars`
/// returns an empty result without contacting the store.
pub async fn resolve_streets(
    store: &dyn AddressStore,
    config: &ResolverConfig,
    locality_code: &str,
    query: &str,
) -> Lookup<Vec<StreetCandidate>> {
    let locality_code = locality_code.trim();
    let query = query.trim();
    if locality_code.is_empty() || query.chars().count() < config.street_min_chars {
        return Lookup::Ready(Vec::new());
    }

    log::debug!("resolve_streets: locality={locality_code} query={query:?}");

    match store
        .find_streets(
            locality_code,
            &contains_pattern(query),
            config.street_scan_limit,
        )
        .await
    {
        Ok(raw) => {
            let raw_count = raw.len();
            let candidates = group_streets(raw, config.street_limit);
            log::debug!(
                "resolve_streets: {raw_count} raw rows grouped into {} candidates",
                candidates.len()
            );
            Lookup::Ready(candidates)
        }
        Err(e) => degrade("resolve_streets", &e),
    }
}
