//! In-memory [`AddressStore`] for resolver tests.
//!
//! Matches `LIKE` patterns on folded, lowercased text like the Postgres
//! store's `ILIKE`/`unaccent` pair, counts calls, and can be told to fail
//! or to ignore row limits.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use coverage_map_address_models::{
    AddressNumber, BoundingBox, Coordinates, CoveragePoint, LocalityRow,
};
use coverage_map_database::store::AddressStore;
use coverage_map_database::DbError;
use coverage_map_normalize::fold_key;

struct AddressRecord {
    id: i64,
    locality_code: String,
    locality_name: String,
    street: Option<String>,
    number: String,
    coordinates: Option<Coordinates>,
}

struct CoverageRecord {
    operator_id: i64,
    address_id: i64,
    active: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    localities: Vec<LocalityRow>,
    addresses: Vec<AddressRecord>,
    coverage: Vec<CoverageRecord>,
    calls: AtomicUsize,
    failing: bool,
    ignore_limits: bool,
}

/// Evaluates a `LIKE` pattern (`%`, `_`, `\` escapes) against `value`,
/// case-sensitively.
fn like_matches(pattern: &str, value: &str) -> bool {
    #[derive(Clone, Copy)]
    enum Token {
        Any,
        One,
        Literal(char),
    }

    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        });
    }

    let value: Vec<char> = value.chars().collect();

    // reachable[j]: the first i tokens can consume exactly value[..j]
    let mut reachable = vec![false; value.len() + 1];
    reachable[0] = true;
    for token in tokens {
        let mut next = vec![false; value.len() + 1];
        match token {
            Token::Any => {
                let mut seen = false;
                for j in 0..=value.len() {
                    seen |= reachable[j];
                    next[j] = seen;
                }
            }
            Token::One => {
                for j in 1..=value.len() {
                    next[j] = reachable[j - 1];
                }
            }
            Token::Literal(c) => {
                for j in 1..=value.len() {
                    next[j] = reachable[j - 1] && value[j - 1] == c;
                }
            }
        }
        reachable = next;
    }

    reachable[value.len()]
}

fn pattern_matches(pattern: &str, value: &str) -> bool {
    like_matches(&fold_key(pattern), &fold_key(value))
}

fn take<T>(items: impl Iterator<Item = T>, limit: u32, ignore: bool) -> Vec<T> {
    if ignore {
        items.collect()
    } else {
        items.take(limit as usize).collect()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn ignoring_limits(mut self) -> Self {
        self.ignore_limits = true;
        self
    }

    pub fn with_locality(mut self, code: &str, name: &str, municipality: &str) -> Self {
        self.localities.push(LocalityRow {
            code: code.to_string(),
            name: name.to_string(),
            municipality: municipality.to_string(),
            county: None,
            province: None,
        });
        self
    }

    pub fn with_locality_row(mut self, row: LocalityRow) -> Self {
        self.localities.push(row);
        self
    }

    pub fn with_street(self, locality_code: &str, street: &str) -> Self {
        let id = i64::try_from(self.addresses.len()).unwrap() + 1;
        self.with_address(id, locality_code, Some(street), "1", None)
    }

    pub fn with_address(
        mut self,
        id: i64,
        locality_code: &str,
        street: Option<&str>,
        number: &str,
        coordinates: Option<(f64, f64)>,
    ) -> Self {
        self.addresses.push(AddressRecord {
            id,
            locality_code: locality_code.to_string(),
            locality_name: format!("Locality {locality_code}"),
            street: street.map(ToString::to_string),
            number: number.to_string(),
            coordinates: coordinates.map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            }),
        });
        self
    }

    pub fn with_coverage(mut self, operator_id: i64, address_id: i64, active: bool) -> Self {
        self.coverage.push(CoverageRecord {
            operator_id,
            address_id,
            active,
        });
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            Err(DbError::Conversion {
                message: "connection refused".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn find_localities(
        &self,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<LocalityRow>, DbError> {
        self.enter()?;
        let rows = self
            .localities
            .iter()
            .filter(|l| pattern_matches(pattern, &l.name))
            .cloned();
        Ok(take(rows, limit, self.ignore_limits))
    }

    async fn find_streets(
        &self,
        locality_code: &str,
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<String>, DbError> {
        self.enter()?;
        let mut seen = std::collections::BTreeSet::new();
        let streets = self
            .addresses
            .iter()
            .filter(|a| a.locality_code == locality_code)
            .filter_map(|a| a.street.clone())
            .filter(|s| !s.is_empty() && pattern_matches(pattern, s))
            .filter(|s| seen.insert(s.clone()));
        Ok(take(streets, limit, self.ignore_limits))
    }

    async fn find_numbers(
        &self,
        locality_code: &str,
        street_variants: &[String],
        pattern: &str,
        limit: u32,
    ) -> Result<Vec<AddressNumber>, DbError> {
        self.enter()?;
        let numbers = self
            .addresses
            .iter()
            .filter(|a| a.locality_code == locality_code)
            .filter(|a| match a.street.as_deref() {
                None | Some("") => street_variants.is_empty(),
                Some(street) => street_variants.iter().any(|v| v == street),
            })
            .filter(|a| pattern_matches(pattern, &a.number))
            .map(|a| AddressNumber {
                id: a.id,
                street_number: a.number.clone(),
                coordinates: a.coordinates,
            });
        Ok(take(numbers, limit, self.ignore_limits))
    }

    async fn find_coverage_points(
        &self,
        operator_id: i64,
        bbox: &BoundingBox,
        limit: u32,
    ) -> Result<Vec<CoveragePoint>, DbError> {
        self.enter()?;
        let points = self
            .coverage
            .iter()
            .filter(|c| c.operator_id == operator_id && c.active)
            .filter_map(|c| self.addresses.iter().find(|a| a.id == c.address_id))
            .filter_map(|a| a.coordinates.map(|coords| (a, coords)))
            .filter(|(_, coords)| bbox.contains(coords.latitude, coords.longitude))
            .map(|(a, coords)| CoveragePoint {
                locality: a.locality_name.clone(),
                street: a.street.clone(),
                number: a.number.clone(),
                latitude: coords.latitude,
                longitude: coords.longitude,
            });
        Ok(take(points, limit, self.ignore_limits))
    }
}

#[cfg(test)]
mod tests {
    use coverage_map_database::pattern::{contains_pattern, prefix_pattern};

    use super::*;

    #[test]
    fn matches_contains_patterns() {
        assert!(like_matches(&contains_pattern("wiat"), "kwiatowa"));
        assert!(!like_matches(&contains_pattern("wiat"), "lipowa"));
        assert!(like_matches("%", ""));
    }

    #[test]
    fn matches_prefix_patterns() {
        assert!(like_matches(&prefix_pattern("1"), "10A"));
        assert!(!like_matches(&prefix_pattern("1"), "21"));
    }

    #[test]
    fn escaped_wildcards_match_literally() {
        assert!(like_matches(&prefix_pattern("1_"), "1_2"));
        assert!(!like_matches(&prefix_pattern("1_"), "12"));
        assert!(like_matches(&contains_pattern("%"), "100%"));
        assert!(!like_matches(&contains_pattern("%"), "100"));
    }

    #[test]
    fn underscore_matches_a_single_char() {
        assert!(like_matches("1_", "1a"));
        assert!(!like_matches("1_", "1"));
    }
}
