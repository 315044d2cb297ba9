//! Canonical street names.
//!
//! Raw street strings in the address table are inconsistent: `"ul.
//! Kwiatowa"`, `"KWIATOWA"` and `"ulica kwiatowa"` are the same street.
//! [`normalize_street`] maps each of them to one canonical display name and
//! a sort key. The mapping is deterministic, so grouping raw rows by the
//! canonical name is stable across requests.
//!
//! The pipeline:
//! 1. Strip leading classifiers (`ul.`, `ulica`, `os.`, `osiedle`)
//! 2. Detect an estate classifier: a stripped leading `os`/`osiedle`, or
//!    `os.`/`osiedle` anywhere in the raw string
//! 3. Title-case the remainder
//! 4. Prefix `Osiedle` when an estate was detected

use regex::Regex;
use std::sync::LazyLock;

use crate::fold::title_case;

/// Spelled-out estate classifier used in canonical names.
pub const ESTATE_PREFIX: &str = "Osiedle";

/// Leading street or estate classifier, followed by a dot and/or
/// whitespace. `"ul.Kwiatowa"`, `"ulica Kwiatowa"`, `"os Lecha"`.
static LEADING_CLASSIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:ulica|ul|(?P<estate>osiedle|os))(?:\.\s*|\s+)")
        .expect("valid regex")
});

/// Estate classifier as a standalone token anywhere in the string.
static ESTATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:os\.|osiedle\b)").expect("valid regex"));

/// Leading estate token of a lowercased canonical name.
static SORT_KEY_ESTATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^osiedle\s+").expect("valid regex"));

/// A raw street string reduced to its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStreet {
    /// Display name, e.g. `"Osiedle Słoneczne"`.
    pub canonical: String,
    /// Lowercase ordering key with a leading estate classifier removed,
    /// e.g. `"słoneczne"`.
    pub sort_key: String,
}

/// Strips any number of leading classifiers. The flag is set when one of
/// them was an estate classifier, dotted or not.
fn strip_leading_classifiers(raw: &str) -> (&str, bool) {
    let mut rest = raw;
    let mut estate = false;
    while let Some(caps) = LEADING_CLASSIFIER_RE.captures(rest) {
        estate |= caps.name("estate").is_some();
        rest = &rest[caps.get(0).map_or(0, |m| m.end())..];
    }
    (rest, estate)
}

/// Builds the canonical display name for a raw street string.
///
/// Returns an empty string for empty or whitespace-only input.
#[must_use]
pub fn canonical_street_name(raw: &str) -> String {
    let (remainder, leading_estate) = strip_leading_classifiers(raw);

    if !leading_estate && !ESTATE_RE.is_match(raw) {
        return title_case(remainder);
    }

    let remainder = ESTATE_RE.replace_all(remainder, " ");
    let titled = title_case(&remainder);
    if titled.is_empty() {
        ESTATE_PREFIX.to_string()
    } else {
        format!("{ESTATE_PREFIX} {titled}")
    }
}

/// Derives the sort key from a canonical name.
#[must_use]
pub fn street_sort_key(canonical: &str) -> String {
    let lower = canonical.to_lowercase();
    SORT_KEY_ESTATE_RE.replace(&lower, "").into_owned()
}

/// Normalizes a raw street string into its canonical name and sort key.
#[must_use]
pub fn normalize_street(raw: &str) -> NormalizedStreet {
    let canonical = canonical_street_name(raw);
    let sort_key = street_sort_key(&canonical);
    NormalizedStreet {
        canonical,
        sort_key,
    }
}
