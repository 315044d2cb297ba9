//! Operator display names derived from registered business names.
//!
//! Registry names look like `F.H.U. "NETKOM" JAN KOWALSKI` or `Netia Spółka
//! Akcyjna`. The display name should be `Netkom` and `Netia S.A.`. This is a
//! best-effort heuristic, not a parser: the name is run through
//! [`RULES`] in order, each rule a small rewrite that can be tested on its
//! own, and a final rescue step falls back to the raw text before the first
//! legal-form marker when the rules leave too little behind. Exotic
//! phrasing will occasionally come out wrong.

use regex::Regex;
use std::sync::LazyLock;

use crate::fold::{fold_key, title_case, title_case_word};

/// A single rewrite step of the operator name pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short identifier, used in trace logging.
    pub name: &'static str,
    /// The rewrite.
    pub apply: fn(&str) -> String,
}

/// Ordered rewrite rules applied by [`normalize_operator_name`].
pub static RULES: &[Rule] = &[
    Rule {
        name: "quoted_trade_name",
        apply: quoted_trade_name,
    },
    Rule {
        name: "business_prefix",
        apply: strip_business_prefix,
    },
    Rule {
        name: "trailing_mixed_case_name",
        apply: strip_trailing_mixed_case_name,
    },
    Rule {
        name: "trailing_caps_name",
        apply: strip_trailing_caps_name,
    },
    Rule {
        name: "legal_suffix",
        apply: collapse_legal_suffixes,
    },
    Rule {
        name: "partners_phrase",
        apply: strip_partners_phrase,
    },
    Rule {
        name: "title_case",
        apply: title_case_name,
    },
    Rule {
        name: "tidy",
        apply: tidy,
    },
];

/// Minimum length of a usable display name.
const MIN_NAME_CHARS: usize = 3;

/// Text between a pair of double quotes (straight, typographic or
/// guillemets).
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["„“”«»]([^"„“”«»]+)["„“”«»]"#).expect("valid regex"));

/// Business-type abbreviations registered in front of the actual name.
static BUSINESS_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^\s*(?:
            p\.?\s?p\.?\s?h\.?\s?u\.?
          | p\.?\s?h\.?\s?u\.?
          | f\.?\s?h\.?\s?u\.?
          | f\.?\s?u\.?\s?h\.?
          | z\.?\s?u\.?\s?h\.?
          | p\.?\s?u\.?\s?h\.?
          | p\.\s?w\.
          | f\.\s?h\.
          | p\.\s?h\.
          | przedsiębiorstwo\s+produkcyjno[\s-]+handlowo[\s-]+usługowe
          | przedsiębiorstwo\s+handlowo[\s-]+usługowe
          | przedsiębiorstwo\s+usługowo[\s-]+handlowe
          | firma\s+handlowo[\s-]+usługowa
          | firma\s+usługowo[\s-]+handlowa
          | zakład\s+usługowo[\s-]+handlowy
        )(?:\s+|$)",
    )
    .expect("valid regex")
});

/// Long-form legal suffixes and their spaced or abbreviated spellings,
/// in application order.
static LEGAL_SUFFIXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bspółka\s+komandytowo[\s-]+akcyjna\b", "S.K.A."),
        (
            r"(?i)\bspółka\s+z\s+ograniczoną\s+odpowiedzialnością\b",
            "Sp. z o.o.",
        ),
        (r"(?i)\bsp\.?\s*z\s*o\.?\s*o\b\.?", "Sp. z o.o."),
        (r"(?i)\bspółka\s+jawna\b", "Sp.j."),
        (r"(?i)\bsp\.?\s*j\b\.?", "Sp.j."),
        (r"(?i)\bspółka\s+komandytowa\b", "Sp.k."),
        (r"(?i)\bsp\.?\s*k\b\.?", "Sp.k."),
        (r"(?i)\bspółka\s+cywilna\b", "s.c."),
        (r"(?i)\bs\.\s*c\.", "s.c."),
        (r"(?i)\bspółka\s+akcyjna\b", "S.A."),
        (r"(?i)\bs\.\s*a\.", "S.A."),
    ]
    .into_iter()
    .map(|(pattern, canonical)| (Regex::new(pattern).expect("valid regex"), canonical))
    .collect()
});

/// `i wspólnicy`, `& wspólnik` and friends.
static PARTNERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s+)(?:i|&)\s+wspólni(?:cy|ka|k)\b").expect("valid regex")
});

/// First legal-form marker in a raw name, used by the rescue step.
static LEGAL_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:spółka|sp\.|sp\s+z\s|s\.\s*c\.|s\.\s*a\.)").expect("valid regex")
});

/// A result that starts with a legal form has lost its actual name.
static BARE_LEGAL_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:sp\.|spółka|s\.c\.|s\.a\.|s\.k\.a\.|z\s+o\.o\.|o\.o\.)")
        .expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

static TRAILING_PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;:/\-–]+$").expect("valid regex"));

static LEADING_PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s,;:/\-–]+").expect("valid regex"));

/// Canonical legal-form tokens, kept verbatim by [`title_case_name`].
const LEGAL_TOKENS: &[&str] = &["Sp.", "o.o.", "Sp.j.", "Sp.k.", "S.K.A.", "s.c.", "S.A."];

/// Connectors that stay lowercase inside a name.
const LOWERCASE_TOKENS: &[&str] = &["z", "i", "w", "na", "od", "do", "dla", "pod", "nad", "oraz"];

/// Words that look like a personal name by shape but are part of the
/// business name or its legal form. Compared after [`fold_key`].
const NAME_STOPWORDS: &[&str] = &[
    "akcyjna",
    "computer",
    "cywilna",
    "fiber",
    "fibre",
    "grupa",
    "handel",
    "informatyczne",
    "informatyka",
    "internet",
    "jawna",
    "kablowa",
    "komandytowa",
    "komandytowo",
    "komandytowo-akcyjna",
    "komputery",
    "media",
    "multimedia",
    "net",
    "network",
    "networks",
    "odpowiedzialnoscia",
    "ograniczona",
    "polska",
    "serwis",
    "siec",
    "sieci",
    "spolka",
    "studio",
    "system",
    "systemy",
    "technologie",
    "telecom",
    "telekom",
    "telekomunikacja",
    "telewizja",
    "uslugi",
    "wspolnicy",
    "wspolnik",
    "wireless",
];

/// Common Polish first names, compared after [`fold_key`]. Used to tell
/// an owner's name from a brand written in the same shape.
const FIRST_NAMES: &[&str] = &[
    "adam", "agnieszka", "aleksandra", "andrzej", "anna", "barbara", "beata", "bogdan",
    "dariusz", "dorota", "elzbieta", "ewa", "grzegorz", "halina", "irena", "jacek", "jadwiga",
    "jakub", "jan", "janina", "janusz", "jerzy", "joanna", "jolanta", "jozef", "kamil", "karol",
    "katarzyna", "krystyna", "krzysztof", "lukasz", "magdalena", "malgorzata", "marcin", "marek",
    "maria", "mariusz", "mateusz", "michal", "monika", "pawel", "piotr", "rafal", "robert",
    "ryszard", "stanislaw", "tadeusz", "tomasz", "wieslaw", "wojciech", "zbigniew", "zofia",
];

/// Replaces the working value with a quoted trade name, if any.
#[must_use]
pub fn quoted_trade_name(value: &str) -> String {
    QUOTED_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(value)
        .to_string()
}

/// Strips leading business-type abbreviations (`F.H.U.`, `P.P.H.U.`, ...).
#[must_use]
pub fn strip_business_prefix(value: &str) -> String {
    let mut rest = value;
    while let Some(m) = BUSINESS_PREFIX_RE.find(rest) {
        if m.end() == 0 {
            break;
        }
        rest = &rest[m.end()..];
    }
    rest.trim().to_string()
}

fn is_mixed_case_name_word(word: &str) -> bool {
    word.split('-').all(|part| {
        let mut chars = part.chars();
        chars.next().is_some_and(char::is_uppercase)
            && part.chars().count() >= 2
            && chars.all(char::is_lowercase)
    })
}

fn is_caps_name_word(word: &str) -> bool {
    word.split('-')
        .all(|part| part.chars().count() >= 2 && part.chars().all(char::is_uppercase))
}

fn is_first_name(word: &str) -> bool {
    FIRST_NAMES.contains(&fold_key(word).as_str())
}

fn is_plausible_name_word(word: &str, is_name_word: fn(&str) -> bool) -> bool {
    is_name_word(word) && !NAME_STOPWORDS.contains(&fold_key(word).as_str())
}

/// Removes a trailing `Firstname Lastname` pair whose words satisfy
/// `is_name_word`, leaving at least one word. One more word in front of
/// the pair is taken as well (`Jan Maria Kowalski`) only when it is a
/// known first name and a word still remains before it. With
/// `first_name_required` the pair itself must open with a known first
/// name.
fn strip_trailing_name(
    value: &str,
    is_name_word: fn(&str) -> bool,
    first_name_required: bool,
) -> String {
    let words: Vec<&str> = value.split_whitespace().collect();
    if words.len() <= 2 {
        return value.trim().to_string();
    }

    let mut cut = words.len() - 2;
    let pair = &words[cut..];
    let plausible = pair.iter().all(|w| is_plausible_name_word(w, is_name_word))
        && (!first_name_required || is_first_name(pair[0]));
    if !plausible {
        return value.trim().to_string();
    }

    let extra = words[cut - 1];
    if cut > 1 && is_plausible_name_word(extra, is_name_word) && is_first_name(extra) {
        cut -= 1;
    }

    words[..cut].join(" ")
}

/// Strips a trailing owner name written in mixed case (`Jan Kowalski`).
#[must_use]
pub fn strip_trailing_mixed_case_name(value: &str) -> String {
    strip_trailing_name(value, is_mixed_case_name_word, false)
}

/// Strips a trailing owner name written in capitals (`JAN KOWALSKI`).
///
/// All-caps brand names (`MAX FIBER TELECOM`) share the shape, so the name
/// must open with a known first name.
#[must_use]
pub fn strip_trailing_caps_name(value: &str) -> String {
    strip_trailing_name(value, is_caps_name_word, true)
}

/// Collapses legal-form suffixes to their short canonical spelling.
#[must_use]
pub fn collapse_legal_suffixes(value: &str) -> String {
    LEGAL_SUFFIXES
        .iter()
        .fold(value.to_string(), |acc, (re, canonical)| {
            re.replace_all(&acc, *canonical).into_owned()
        })
}

/// Removes "and partners" phrases.
#[must_use]
pub fn strip_partners_phrase(value: &str) -> String {
    PARTNERS_RE.replace_all(value, "").trim().to_string()
}

/// Title-cases every word except lowercase connectors and canonical legal
/// tokens. The first word is always title-cased unless it is a legal
/// token.
#[must_use]
pub fn title_case_name(value: &str) -> String {
    value
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if let Some(token) = LEGAL_TOKENS.iter().find(|t| t.eq_ignore_ascii_case(word)) {
                return (*token).to_string();
            }
            let lower = word.to_lowercase();
            if i > 0 && LOWERCASE_TOKENS.contains(&lower.as_str()) {
                lower
            } else {
                title_case_word(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the name ends in a token whose final dot is part of it.
fn ends_with_abbreviation(value: &str) -> bool {
    value
        .split_whitespace()
        .last()
        .is_some_and(|last| LEGAL_TOKENS.contains(&last))
}

/// Collapses whitespace and strips leading/trailing punctuation, including
/// stray trailing dots that do not belong to an abbreviation.
#[must_use]
pub fn tidy(value: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    let mut out = LEADING_PUNCTUATION_RE.replace(&collapsed, "").into_owned();

    loop {
        let trimmed = TRAILING_PUNCTUATION_RE.replace(&out, "").into_owned();
        let trimmed = if trimmed.ends_with('.') && !ends_with_abbreviation(&trimmed) {
            trimmed.trim_end_matches('.').to_string()
        } else {
            trimmed
        };
        if trimmed == out {
            return out;
        }
        out = trimmed;
    }
}

/// Whether the pipeline output is unusable and the rescue should run.
fn needs_rescue(name: &str) -> bool {
    name.chars().count() < MIN_NAME_CHARS || BARE_LEGAL_START_RE.is_match(name)
}

/// Falls back to the raw name up to its first legal-form marker.
fn rescue(raw: &str) -> Option<String> {
    let head = LEGAL_MARKER_RE
        .find(raw)
        .map_or(raw, |m| &raw[..m.start()]);
    let head: String = head
        .chars()
        .filter(|c| !matches!(c, '"' | '„' | '“' | '”' | '«' | '»'))
        .collect();
    let name = tidy(&title_case(&head));
    (!name.is_empty()).then_some(name)
}

/// Derives a display name from a registered business name.
///
/// Empty input yields an empty string.
#[must_use]
pub fn normalize_operator_name(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let name = RULES.iter().fold(raw.to_string(), |value, rule| {
        let next = (rule.apply)(&value);
        if next != value {
            log::trace!("operator name rule {}: {value:?} -> {next:?}", rule.name);
        }
        next
    });

    if needs_rescue(&name)
        && let Some(rescued) = rescue(raw)
    {
        log::trace!("operator name rescued: {raw:?} -> {rescued:?}");
        return rescued;
    }

    name
}
