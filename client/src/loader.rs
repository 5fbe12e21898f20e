use lasithi_shared::dates::DateIndex;
use lasithi_shared::features::{FeatureCollection, LonLat};
use lasithi_shared::geometry::clip_to_boundary;

/// Point dataset: one feature per surveyed location, with per-date
/// population counts in its properties.
pub const POINTS_URL: &str = "generator.geojson";
/// Study-area boundary polygon.
pub const BOUNDARY_URL: &str = "lasithi_boundaries.geojson";

/// Everything the map layers need, fetched once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMap {
    /// Points inside the study area. Features outside the boundary are
    /// dropped before they ever reach a layer source.
    pub points: FeatureCollection,
    pub boundary: FeatureCollection,
    /// Outer ring of the boundary, reused for the coverage mask hole.
    pub ring: Vec<LonLat>,
}

async fn fetch_collection(url: &str) -> Result<FeatureCollection, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<FeatureCollection>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// Fetch both documents and derive the date index and the clipped point
/// set. The index is built from the unclipped point file, so the slider
/// covers every surveyed date even when clipping drops some points.
pub async fn load_map_data() -> Result<(LoadedMap, DateIndex), String> {
    let raw_points = fetch_collection(POINTS_URL)
        .await
        .map_err(|e| format!("{POINTS_URL}: {e}"))?;
    let dates = DateIndex::from_labels(
        raw_points
            .features
            .iter()
            .map(|f| f.properties.date.as_str()),
    );

    let boundary = fetch_collection(BOUNDARY_URL)
        .await
        .map_err(|e| format!("{BOUNDARY_URL}: {e}"))?;
    let ring = boundary
        .first_outer_ring()
        .ok_or_else(|| format!("{BOUNDARY_URL}: no polygon ring in first feature"))?
        .to_vec();

    let points = clip_to_boundary(&raw_points, &ring);
    Ok((
        LoadedMap {
            points,
            boundary,
            ring,
        },
        dates,
    ))
}
