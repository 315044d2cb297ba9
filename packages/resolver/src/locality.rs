//! Locality autocomplete.

use std::collections::HashSet;

use coverage_map_address_models::{LocalityCandidate, LocalityRow, Lookup};
use coverage_map_database::pattern::contains_pattern;
use coverage_map_database::store::AddressStore;
use coverage_map_normalize::fold_key;

use crate::config::ResolverConfig;
use crate::{clamp_cap, degrade};

/// How closely a locality name matches the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Exact,
    Prefix,
    Substring,
}

fn match_rank(name: &str, folded_query: &str) -> MatchRank {
    let name = fold_key(name);
    if name == folded_query {
        MatchRank::Exact
    } else if name.starts_with(folded_query) {
        MatchRank::Prefix
    } else {
        MatchRank::Substring
    }
}

/// Formats the municipality context shown under a locality name, e.g.
/// `gm. Kórnik, pow. poznański, woj. wielkopolskie`. Empty parts are
/// omitted.
#[must_use]
pub fn format_sub_label(row: &LocalityRow) -> String {
    [
        ("gm.", Some(row.municipality.as_str())),
        ("pow.", row.county.as_deref()),
        ("woj.", row.province.as_deref()),
    ]
    .into_iter()
    .filter_map(|(prefix, value)| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| format!("{prefix} {v}"))
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Deduplicates rows by lowercased `(name, municipality)` and orders them
/// exact match first, then prefix, then substring. Store order is kept
/// within a rank.
#[must_use]
pub fn rank_localities(rows: Vec<LocalityRow>, query: &str, cap: usize) -> Vec<LocalityCandidate> {
    let folded_query = fold_key(query);
    let mut seen = HashSet::new();

    let mut ranked: Vec<(MatchRank, LocalityRow)> = rows
        .into_iter()
        .filter(|row| {
            seen.insert((
                row.name.trim().to_lowercase(),
                row.municipality.trim().to_lowercase(),
            ))
        })
        .map(|row| (match_rank(&row.name, &folded_query), row))
        .collect();

    ranked.sort_by_key(|(rank, _)| *rank);

    ranked
        .into_iter()
        .take(cap)
        .map(|(_, row)| LocalityCandidate {
            sub_label: format_sub_label(&row),
            display_name: row.name,
            locality_code: row.code,
        })
        .collect()
}

/// Resolves a partial locality name to ranked candidates.
///
/// Queries shorter than `locality_min_chars` return an empty result
/// without contacting the store. `cap` defaults to `locality_limit` and is
/// clamped to `1..=locality_max_limit`.
pub async fn resolve_localities(
    store: &dyn AddressStore,
    config: &ResolverConfig,
    query: &str,
    cap: Option<usize>,
) -> Lookup<Vec<LocalityCandidate>> {
    let query = query.trim();
    if query.chars().count() < config.locality_min_chars {
        return Lookup::Ready(Vec::new());
    }

    let cap = clamp_cap(cap, config.locality_limit, config.locality_max_limit);
    log::debug!("resolve_localities: query={query:?} cap={cap}");

    match store
        .find_localities(&contains_pattern(query), config.locality_scan_limit)
        .await
    {
        Ok(rows) => Lookup::Ready(rank_localities(rows, query, cap)),
        Err(e) => degrade("resolve_localities", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_store::MemoryStore;

    fn row(code: &str, name: &str, municipality: &str) -> LocalityRow {
        LocalityRow {
            code: code.to_string(),
            name: name.to_string(),
            municipality: municipality.to_string(),
            county: None,
            province: None,
        }
    }

    #[tokio::test]
    async fn short_queries_skip_the_store() {
        let store = MemoryStore::new().with_locality("0001", "Kórnik", "Kórnik");
        let config = ResolverConfig::default();

        for query in ["", "a", "  a  "] {
            let result = resolve_localities(&store, &config, query, None).await;
            assert_eq!(result, Lookup::Ready(Vec::new()));
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn matches_without_diacritics() {
        let store = MemoryStore::new()
            .with_locality("0001", "Łódź", "Łódź")
            .with_locality("0002", "Kraków", "Kraków");
        let config = ResolverConfig::default();

        let result = resolve_localities(&store, &config, "lodz", None)
            .await
            .into_data();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "Łódź");
        assert_eq!(result[0].locality_code, "0001");
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn case_only_duplicates_collapse_to_the_first() {
        let store = MemoryStore::new()
            .with_locality("0001", "Borówiec", "Kórnik")
            .with_locality("0002", "BORÓWIEC", "kórnik")
            .with_locality("0003", "Borówiec", "Tarnowo Podgórne");
        let config = ResolverConfig::default();

        let result = resolve_localities(&store, &config, "borów", None)
            .await
            .into_data();
        let codes: Vec<&str> = result.iter().map(|c| c.locality_code.as_str()).collect();
        assert_eq!(codes, ["0001", "0003"]);
    }

    #[test]
    fn exact_then_prefix_then_substring() {
        let rows = vec![
            row("1", "Nowa Wieś", "Gm1"),
            row("2", "Wieśniaki", "Gm2"),
            row("3", "Wies", "Gm3"),
            row("4", "Stara Wieś", "Gm4"),
        ];
        let result = rank_localities(rows, "wieś", 10);
        let names: Vec<&str> = result.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, ["Wies", "Wieśniaki", "Nowa Wieś", "Stara Wieś"]);
    }

    #[test]
    fn ranking_respects_the_cap() {
        let rows = (0..20)
            .map(|i| row(&i.to_string(), &format!("Dąbrowa {i}"), &format!("Gm{i}")))
            .collect();
        assert_eq!(rank_localities(rows, "dąbrowa", 5).len(), 5);
    }

    #[tokio::test]
    async fn cap_is_clamped_to_the_maximum() {
        let mut store = MemoryStore::new();
        for i in 0..60 {
            store = store.with_locality(&format!("{i:04}"), &format!("Wola {i}"), &format!("Gm{i}"));
        }
        let config = ResolverConfig::default();

        let result = resolve_localities(&store, &config, "wola", Some(500))
            .await
            .into_data();
        assert_eq!(result.len(), config.locality_max_limit);

        let result = resolve_localities(&store, &config, "wola", Some(0))
            .await
            .into_data();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn sub_label_lists_available_parts() {
        let mut full = row("1", "Borówiec", "Kórnik");
        full.county = Some("poznański".to_string());
        full.province = Some("wielkopolskie".to_string());
        assert_eq!(
            format_sub_label(&full),
            "gm. Kórnik, pow. poznański, woj. wielkopolskie"
        );

        let mut partial = row("2", "Borówiec", "Kórnik");
        partial.county = Some("  ".to_string());
        partial.province = Some("wielkopolskie".to_string());
        assert_eq!(format_sub_label(&partial), "gm. Kórnik, woj. wielkopolskie");

        assert_eq!(format_sub_label(&row("3", "X", "")), "");
    }

    #[tokio::test]
    async fn candidates_carry_the_municipality_context() {
        let mut borowiec = row("0001", "Borówiec", "Kórnik");
        borowiec.county = Some("poznański".to_string());
        borowiec.province = Some("wielkopolskie".to_string());
        let store = MemoryStore::new().with_locality_row(borowiec);
        let config = ResolverConfig::default();

        let result = resolve_localities(&store, &config, "borowiec", None)
            .await
            .into_data();
        assert_eq!(
            result,
            [LocalityCandidate {
                display_name: "Borówiec".to_string(),
                sub_label: "gm. Kórnik, pow. poznański, woj. wielkopolskie".to_string(),
                locality_code: "0001".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty() {
        let store = MemoryStore::failing();
        let config = ResolverConfig::default();

        let result = resolve_localities(&store, &config, "poznań", None).await;
        assert!(result.is_degraded());
        assert_eq!(result.reason(), Some("Data conversion error: connection refused"));
        assert!(result.into_data().is_empty());
    }
}
