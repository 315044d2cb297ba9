//! Operator coverage inside a map viewport.
//!
//! Boxes wider or taller than `area_limit_deg` are refused before any
//! query runs, and results are capped at `coverage_row_limit` rows. Both
//! bounds keep a single viewport request from scanning a whole city.

use coverage_map_address_models::{BoundingBox, CoverageBox, Lookup};
use coverage_map_database::store::AddressStore;

use crate::config::ResolverConfig;
use crate::degrade;

/// Returns the buildings actively served by `operator_id` strictly inside
/// `bbox`.
///
/// An invalid box (non-finite or inverted bounds) yields an empty result.
/// A box exceeding the area limit yields [`CoverageBox::too_large`]. In
/// neither case is the store contacted.
pub async fn query_coverage_box(
    store: &dyn AddressStore,
    config: &ResolverConfig,
    operator_id: i64,
    bbox: &BoundingBox,
) -> Lookup<CoverageBox> {
    if !bbox.is_valid() {
        log::debug!("query_coverage_box: invalid box {bbox:?}");
        return Lookup::Ready(CoverageBox::default());
    }

    if bbox.exceeds(config.area_limit_deg) {
        log::debug!(
            "query_coverage_box: box {:.4}x{:.4} deg exceeds {} deg",
            bbox.lat_span(),
            bbox.lon_span(),
            config.area_limit_deg
        );
        return Lookup::Ready(CoverageBox::too_large());
    }

    let limit = config.coverage_row_limit;
    match store.find_coverage_points(operator_id, bbox, limit).await {
        Ok(mut data) => {
            data.truncate(limit as usize);
            log::debug!(
                "query_coverage_box: operator={operator_id} points={}",
                data.len()
            );
            Lookup::Ready(CoverageBox {
                too_large: false,
                data,
            })
        }
        Err(e) => degrade("query_coverage_box", &e),
    }
}
