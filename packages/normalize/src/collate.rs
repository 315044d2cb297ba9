//! Polish-aware and numeric-aware string ordering.
//!
//! [`locale_cmp`] sorts accented letters directly after their base letter
//! (`a < ą < b`, `l < ł < m`, `z < ź < ż`), which matches Polish
//! dictionary order. [`natural_cmp`] additionally compares digit runs by
//! value so that building numbers sort as `9 < 10 < 10A < 10B < 11`.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::fold::fold_diacritics;

/// Rank given to stroke letters (`ł`), which have no combining mark.
const STROKE_RANK: u32 = u32::MAX;

/// Collation unit: base letter plus a rank that is zero for the plain
/// letter. Accented forms rank by their combining mark, so `ź` (acute)
/// sorts before `ż` (dot above).
type Unit = (char, u32);

fn units(s: &str) -> Vec<Unit> {
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.chars().flat_map(char::to_lowercase) {
        let encoded: &str = c.encode_utf8(&mut buf);
        let folded = fold_diacritics(encoded);
        let rank = encoded
            .nfd()
            .find(|m| is_combining_mark(*m))
            .map_or_else(
                || {
                    if folded.chars().eq(std::iter::once(c)) {
                        0
                    } else {
                        STROKE_RANK
                    }
                },
                u32::from,
            );
        for (i, base) in folded.chars().enumerate() {
            out.push((base, if i == 0 { rank } else { 0 }));
        }
    }
    out
}

/// Letter-level comparison, ignoring case.
fn primary_cmp(a: &str, b: &str) -> Ordering {
    units(a).cmp(&units(b))
}

/// Compares two strings in Polish dictionary order.
///
/// Case is only a tie-breaker, with lowercase first. The ordering is total:
/// strings that compare equal are byte-identical.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_cmp(a, b)
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl<'a> Chunk<'a> {
    const fn new(s: &'a str, digits: bool) -> Self {
        if digits { Self::Digits(s) } else { Self::Text(s) }
    }
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        if let Some(prev) = current
            && prev != digit
        {
            out.push(Chunk::new(&s[start..i], prev));
            start = i;
        }
        current = Some(digit);
    }

    if let Some(prev) = current {
        out.push(Chunk::new(&s[start..], prev));
    }

    out
}

/// Compares digit runs by value without parsing, so arbitrarily long runs
/// cannot overflow.
fn digits_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compares two strings with digit runs ordered by numeric value.
///
/// Digit runs sort before letters at the same position, and a string that
/// is a chunk-prefix of another sorts first (`10 < 10A`). Remaining ties
/// fall back to [`locale_cmp`].
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);

    for (x, y) in left.iter().zip(&right) {
        let ord = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => digits_cmp(x, y),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
            (Chunk::Text(x), Chunk::Text(y)) => primary_cmp(x, y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len()
        .cmp(&right.len())
        .then_with(|| locale_cmp(a, b))
}
