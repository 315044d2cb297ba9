#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Text normalization for address and operator data.
//!
//! Everything here is a pure function of its input:
//!
//! - [`fold`]: diacritic folding and casing helpers
//! - [`collate`]: Polish-aware and numeric-aware string ordering
//! - [`street`]: canonical street names and their sort keys
//! - [`operator`]: display names derived from registered business names

pub mod collate;
pub mod fold;
pub mod operator;
pub mod street;

pub use collate::{locale_cmp, natural_cmp};
pub use fold::{fold_diacritics, fold_key, title_case, title_case_word};
pub use operator::normalize_operator_name;
pub use street::{NormalizedStreet, normalize_street};
