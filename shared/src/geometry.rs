use crate::features::{FeatureCollection, LonLat};

/// Ray-casting point-in-ring test (even-odd rule).
///
/// Accepts rings that do or do not repeat the first vertex as the last:
/// edges pair each vertex with its predecessor wrapping around, so an
/// explicit closing vertex only adds a degenerate edge that never crosses.
///
/// Known limitation: a point exactly on an edge or vertex sits on the
/// discontinuity of the even-odd rule. Which side it lands on is arbitrary
/// but stable for identical inputs.
pub fn point_in_ring(point: LonLat, ring: &[LonLat]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let [px, py] = point;
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        // Horizontal edges fail the straddle check, so the division is safe.
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Keep only the point features that fall inside the ring.
///
/// Non-point geometries are dropped. Interior rings of the source polygon
/// are not consulted, so a boundary with holes filters as if it had none.
pub fn clip_to_boundary(collection: &FeatureCollection, ring: &[LonLat]) -> FeatureCollection {
    let features = collection
        .features
        .iter()
        .filter(|feature| {
            feature
                .geometry
                .point()
                .is_some_and(|point| point_in_ring(point, ring))
        })
        .cloned()
        .collect();
    FeatureCollection { features }
}
