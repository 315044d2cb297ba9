//! Diacritic folding and casing helpers.
//!
//! Folding is NFD decomposition with combining marks dropped. Letters that
//! carry a stroke instead of a combining mark (`ł`, `ø`, `đ`) have no
//! decomposition, so they are mapped explicitly.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Letters without a canonical decomposition and their ASCII stand-ins.
const STROKE_LETTERS: &[(char, &str)] = &[
    ('ł', "l"),
    ('Ł', "L"),
    ('ø', "o"),
    ('Ø', "O"),
    ('đ', "d"),
    ('Đ', "D"),
    ('ß', "ss"),
    ('æ', "ae"),
    ('Æ', "AE"),
];

/// Removes diacritics, preserving case.
///
/// `"Łódź"` becomes `"Lodz"`, `"Słoneczne"` becomes `"Sloneczne"`.
#[must_use]
pub fn fold_diacritics(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.nfd().filter(|c| !is_combining_mark(*c)) {
        match STROKE_LETTERS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Folded, lowercased and trimmed form used for case- and
/// accent-insensitive comparisons.
#[must_use]
pub fn fold_key(input: &str) -> String {
    fold_diacritics(input.trim()).to_lowercase()
}

/// Title-cases a single word: first letter of every hyphen-separated part
/// uppercase, the rest lowercase.
///
/// `"KOŚCIUSZKI"` becomes `"Kościuszki"`, `"skłodowskiej-curie"` becomes
/// `"Skłodowskiej-Curie"`.
#[must_use]
pub fn title_case_word(word: &str) -> String {
    word.split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Title-cases every whitespace-separated word and joins them with single
/// spaces.
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_polish_letters() {
        assert_eq!(fold_diacritics("zażółć gęślą jaźń"), "zazolc gesla jazn");
        assert_eq!(fold_diacritics("ŁÓDŹ"), "LODZ");
    }

    #[test]
    fn folds_other_latin_letters() {
        assert_eq!(fold_diacritics("Ørsted Straße"), "Orsted Strasse");
        assert_eq!(fold_diacritics("Čakovec"), "Cakovec");
    }

    #[test]
    fn fold_key_is_case_insensitive() {
        assert_eq!(fold_key("  Kórnik "), fold_key("KORNIK"));
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case_word("KOŚCIUSZKI"), "Kościuszki");
        assert_eq!(title_case_word("skłodowskiej-curie"), "Skłodowskiej-Curie");
        assert_eq!(title_case_word("3"), "3");
        assert_eq!(title_case_word(""), "");
    }

    #[test]
    fn title_cases_sentences() {
        assert_eq!(title_case("  jana   PAWŁA ii "), "Jana Pawła Ii");
    }
}
