//! Raw SQL lookups against the address and coverage tables.
//!
//! All queries are read-only. Text matching uses `ILIKE` on both the stored
//! value and its `unaccent()` form, since the data contains names both
//! with and without Polish diacritics. Patterns are built by the caller
//! with [`crate::pattern`].

use std::fmt::Write as _;

use coverage_map_address_models::{
    AddressNumber, BoundingBox, Coordinates, CoveragePoint, LocalityRow,
};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Looks up localities whose name matches `pattern`.
///
/// Shorter names come first so exact and prefix matches lead the list.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_localities(
    db: &dyn Database,
    pattern: &str,
    limit: u32,
) -> Result<Vec<LocalityRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT code, name, municipality, county, province
             FROM localities
             WHERE name ILIKE $1 OR unaccent(name) ILIKE unaccent($1)
             ORDER BY length(name), name
             LIMIT $2",
            &[
                DatabaseValue::String(pattern.to_string()),
                DatabaseValue::Int64(i64::from(limit)),
            ],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| LocalityRow {
            code: row.to_value("code").unwrap_or_default(),
            name: row.to_value("name").unwrap_or_default(),
            municipality: row.to_value("municipality").unwrap_or_default(),
            county: row.to_value("county").unwrap_or(None),
            province: row.to_value("province").unwrap_or(None),
        })
        .collect())
}

/// Returns the distinct raw street strings under a locality that match
/// `pattern`.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_streets(
    db: &dyn Database,
    locality_code: &str,
    pattern: &str,
    limit: u32,
) -> Result<Vec<String>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT DISTINCT street
             FROM addresses
             WHERE locality_code = $1
               AND street IS NOT NULL AND street <> ''
               AND (street ILIKE $2 OR unaccent(street) ILIKE unaccent($2))
             LIMIT $3",
            &[
                DatabaseValue::String(locality_code.to_string()),
                DatabaseValue::String(pattern.to_string()),
                DatabaseValue::Int64(i64::from(limit)),
            ],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let street: Option<String> = row.to_value("street").unwrap_or(None);
            street
        })
        .collect())
}

/// Builds the building-number query for `variant_count` raw street
/// spellings. Zero variants selects street-less addresses.
///
/// Parameters: `$1` locality code, `$2..` street variants, then the number
/// pattern and the row limit.
#[must_use]
pub fn numbers_sql(variant_count: usize) -> String {
    let mut sql = String::from(
        "SELECT id, number,
                latitude::float8 AS latitude, longitude::float8 AS longitude
         FROM addresses
         WHERE locality_code = $1",
    );

    let mut param_idx = 2usize;

    if variant_count == 0 {
        sql.push_str(" AND (street IS NULL OR street = '')");
    } else {
        let placeholders: Vec<String> = (param_idx..param_idx + variant_count)
            .map(|i| format!("${i}"))
            .collect();
        write!(sql, " AND street IN ({})", placeholders.join(", ")).unwrap();
        param_idx += variant_count;
    }

    write!(sql, " AND number ILIKE ${param_idx}").unwrap();
    param_idx += 1;

    write!(sql, " LIMIT ${param_idx}").unwrap();

    sql
}

/// Returns building numbers under a locality whose number matches
/// `pattern`, restricted to the given raw street spellings (or to
/// street-less addresses when `street_variants` is empty).
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_numbers(
    db: &dyn Database,
    locality_code: &str,
    street_variants: &[String],
    pattern: &str,
    limit: u32,
) -> Result<Vec<AddressNumber>, DbError> {
    let sql = numbers_sql(street_variants.len());

    let mut params: Vec<DatabaseValue> = Vec::with_capacity(street_variants.len() + 3);
    params.push(DatabaseValue::String(locality_code.to_string()));
    params.extend(
        street_variants
            .iter()
            .map(|s| DatabaseValue::String(s.clone())),
    );
    params.push(DatabaseValue::String(pattern.to_string()));
    params.push(DatabaseValue::Int64(i64::from(limit)));

    let rows = db.query_raw_params(&sql, &params).await?;

    Ok(rows
        .iter()
        .map(|row| {
            let latitude: Option<f64> = row.to_value("latitude").unwrap_or(None);
            let longitude: Option<f64> = row.to_value("longitude").unwrap_or(None);
            AddressNumber {
                id: row.to_value("id").unwrap_or(0),
                street_number: row.to_value("number").unwrap_or_default(),
                coordinates: latitude
                    .zip(longitude)
                    .map(|(latitude, longitude)| Coordinates {
                        latitude,
                        longitude,
                    }),
            }
        })
        .collect())
}

/// Returns addresses actively served by `operator_id` strictly inside
/// `bbox`.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_coverage_points(
    db: &dyn Database,
    operator_id: i64,
    bbox: &BoundingBox,
    limit: u32,
) -> Result<Vec<CoveragePoint>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT a.locality_name AS locality, a.street, a.number,
                    a.latitude::float8 AS latitude, a.longitude::float8 AS longitude
             FROM operator_coverage c
             JOIN addresses a ON a.id = c.address_id
             WHERE c.operator_id = $1
               AND c.active = TRUE
               AND a.latitude > $2 AND a.latitude < $3
               AND a.longitude > $4 AND a.longitude < $5
             LIMIT $6",
            &[
                DatabaseValue::Int64(operator_id),
                DatabaseValue::Real64(bbox.min_lat),
                DatabaseValue::Real64(bbox.max_lat),
                DatabaseValue::Real64(bbox.min_lon),
                DatabaseValue::Real64(bbox.max_lon),
                DatabaseValue::Int64(i64::from(limit)),
            ],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| CoveragePoint {
            locality: row.to_value("locality").unwrap_or_default(),
            street: row.to_value("street").unwrap_or(None),
            number: row.to_value("number").unwrap_or_default(),
            latitude: row.to_value("latitude").unwrap_or(0.0),
            longitude: row.to_value("longitude").unwrap_or(0.0),
        })
        .collect())
}
