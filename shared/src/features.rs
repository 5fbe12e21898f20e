use serde::{Deserialize, Serialize};

use crate::view::Category;

/// Geographic coordinate pair as stored in GeoJSON: `[longitude, latitude]`.
pub type LonLat = [f64; 2];

/// Feature collection shape shared by both input documents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Outer ring of the first feature's polygon, the way boundary
    /// documents are laid out. `None` when the first feature is missing
    /// or not a polygon.
    pub fn first_outer_ring(&self) -> Option<&[LonLat]> {
        self.features.first().and_then(|f| f.geometry.outer_ring())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: PointProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: LonLat },
    Polygon { coordinates: Vec<Vec<LonLat>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<LonLat>>> },
    // Geometry types the viewer has no use for still need to parse.
    #[serde(other)]
    Other,
}

impl Geometry {
    pub fn point(&self) -> Option<LonLat> {
        match self {
            Geometry::Point { coordinates } => Some(*coordinates),
            _ => None,
        }
    }

    /// Outer ring of a polygon geometry. For a multi-polygon this is the
    /// first polygon's outer ring; interior rings are never exposed.
    pub fn outer_ring(&self) -> Option<&[LonLat]> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.first().map(Vec::as_slice),
            Geometry::MultiPolygon { coordinates } => coordinates
                .first()
                .and_then(|polygon| polygon.first())
                .map(Vec::as_slice),
            _ => None,
        }
    }
}

/// Attributes carried by every point in the population dataset. Boundary
/// features parse with all fields defaulted since only their geometry is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointProperties {
    #[serde(rename = "Date")]
    #[serde(default)]
    pub date: String,
    #[serde(rename = "Female")]
    #[serde(default)]
    pub female: f64,
    #[serde(rename = "Male")]
    #[serde(default)]
    pub male: f64,
    #[serde(rename = "Sum")]
    #[serde(default)]
    pub sum: f64,
}

impl PointProperties {
    /// Numeric value backing a heatmap category.
    pub fn value_for(&self, category: Category) -> f64 {
        match category {
            Category::Sum => self.sum,
            Category::Female => self.female,
            Category::Male => self.male,
        }
    }

    /// Numeric attribute by its dataset key, for style ramps that name
    /// their input property.
    pub fn number(&self, key: &str) -> Option<f64> {
        match key {
            "Sum" => Some(self.sum),
            "Female" => Some(self.female),
            "Male" => Some(self.male),
            _ => None,
        }
    }
}
