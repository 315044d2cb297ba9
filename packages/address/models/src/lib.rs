#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Locality, street, address and coverage types for address resolution.
//!
//! Row types ([`LocalityRow`], [`AddressNumber`], [`CoveragePoint`]) are the
//! shapes read from the address store. Candidate types
//! ([`LocalityCandidate`], [`StreetCandidate`]) are derived per request and
//! never persisted. All caller-facing types serialize with `camelCase` field
//! names.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A locality row as stored in the address store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityRow {
    /// Stable locality code, the join key into the address table.
    pub code: String,
    /// Locality name, as stored (may or may not carry diacritics).
    pub name: String,
    /// Municipality (gmina) the locality belongs to.
    pub municipality: String,
    /// County (powiat).
    pub county: Option<String>,
    /// Province (województwo).
    pub province: Option<String>,
}

/// A locality suggestion for the autocomplete funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityCandidate {
    /// Locality name shown to the user.
    pub display_name: String,
    /// Formatted municipality context, e.g. `gm. Kórnik, pow. poznański`.
    pub sub_label: String,
    /// Join key for street and number lookups.
    pub locality_code: String,
}

/// A canonical street entry covering one or more raw spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetCandidate {
    /// Human-facing normalized street name.
    pub canonical_name: String,
    /// Lowercase collation key with any leading estate classifier removed.
    pub sort_key: String,
    /// Every raw spelling in the address table that normalizes to
    /// [`Self::canonical_name`]. Number lookups filter on these exactly.
    pub raw_variants: BTreeSet<String>,
}

/// WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// A building number under a locality (and optionally a street).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressNumber {
    /// Address row primary key.
    pub id: i64,
    /// Building number as stored, e.g. `10A`.
    pub street_number: String,
    /// Point location, when the address has been geocoded.
    pub coordinates: Option<Coordinates>,
}

/// A building served by an operator, for map display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveragePoint {
    /// Locality name.
    pub locality: String,
    /// Raw street name, `None` for street-less localities.
    pub street: Option<String>,
    /// Building number.
    pub number: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// Slack applied when comparing spans against a limit, so a box drawn at
/// exactly the limit is not rejected because of floating-point rounding.
pub const SPAN_TOLERANCE_DEG: f64 = 1e-9;

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Southern latitude boundary.
    pub min_lat: f64,
    /// Northern latitude boundary.
    pub max_lat: f64,
    /// Western longitude boundary.
    pub min_lon: f64,
    /// Eastern longitude boundary.
    pub max_lon: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Parses a map viewport string `"west,south,east,north"`.
    ///
    /// Returns `None` unless exactly four numbers are present.
    #[must_use]
    pub fn from_bbox_str(s: &str) -> Option<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse().ok())
            .collect::<Option<_>>()?;
        if parts.len() == 4 {
            Some(Self::new(parts[1], parts[3], parts[0], parts[2]))
        } else {
            None
        }
    }

    /// Latitude span in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Whether all four coordinates are finite and each minimum is not
    /// greater than its maximum.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
    }

    /// Whether either span is larger than `limit_deg`.
    #[must_use]
    pub fn exceeds(&self, limit_deg: f64) -> bool {
        let limit = limit_deg + SPAN_TOLERANCE_DEG;
        self.lat_span() > limit || self.lon_span() > limit
    }

    /// Whether the point lies strictly inside the box.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude > self.min_lat
            && latitude < self.max_lat
            && longitude > self.min_lon
            && longitude < self.max_lon
    }
}

/// Result of a coverage viewport query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageBox {
    /// Set when the requested box exceeded the area limit and no query
    /// was issued. The caller should ask the user to zoom in.
    pub too_large: bool,
    /// Served buildings inside the box.
    pub data: Vec<CoveragePoint>,
}

impl CoverageBox {
    /// The "zoom in" result.
    #[must_use]
    pub const fn too_large() -> Self {
        Self {
            too_large: true,
            data: Vec::new(),
        }
    }
}

/// Outcome of a lookup against the address store.
///
/// Store failures never reach the caller as errors. They come back as
/// [`Lookup::Degraded`], which reads as an empty result through
/// [`Lookup::into_data`] while keeping the reason for telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum Lookup<T> {
    /// The store answered (possibly with nothing).
    Ready(T),
    /// The store could not be reached or the query failed.
    Degraded {
        /// Human-readable failure description.
        reason: String,
    },
}

impl<T> Lookup<T> {
    /// Whether this lookup fell back because of a store failure.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The failure reason, if degraded.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Degraded { reason } => Some(reason),
        }
    }

    /// Applies `f` to the ready value.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Ready(value) => Lookup::Ready(f(value)),
            Self::Degraded { reason } => Lookup::Degraded { reason },
        }
    }
}

impl<T: Default> Lookup<T> {
    /// The data to render: the ready value, or the empty value when
    /// degraded.
    #[must_use]
    pub fn into_data(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Degraded { .. } => T::default(),
        }
    }
}
