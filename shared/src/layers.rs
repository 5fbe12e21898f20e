use crate::dates::DateIndex;
use crate::engine::MapEngine;
use crate::features::{Feature, FeatureCollection, Geometry, LonLat, PointProperties};
use crate::style::{
    ColorRamp, EqualsFilter, FillPaint, HeatmapPaint, LayerKind, LayerSpec, PropertyRamp, Ramp,
    Rgba, Visibility,
};
use crate::view::{Category, ViewState};

/// Zoom window shared by the camera and every zoom-interpolated paint ramp.
pub const MIN_ZOOM: f64 = 7.0;
pub const MAX_ZOOM: f64 = 12.0;

pub const POINTS_SOURCE: &str = "population-points";
pub const BOUNDARY_SOURCE: &str = "lasithi-boundary";
pub const MASK_SOURCE: &str = "boundary-mask";
pub const MASK_LAYER: &str = "mask-layer";

/// Owns the lifecycle of the three category heatmaps and the boundary mask
/// against a [`MapEngine`].
///
/// `initialize` runs the one-time setup, `apply` re-derives filters,
/// visibility and opacity from the current view state. Both are safe to
/// call repeatedly; identical inputs leave the engine configuration
/// unchanged.
#[derive(Debug, Default)]
pub struct LayerController {
    initialized: bool,
}

impl LayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// One-time source and layer setup. Runs only once the engine reports
    /// ready; sources that already exist are left alone so a re-entrant
    /// call cannot duplicate anything. An empty point collection is a
    /// valid source: the layers simply have nothing to draw.
    pub fn initialize(
        &mut self,
        engine: &mut dyn MapEngine,
        points: &FeatureCollection,
        boundary: &FeatureCollection,
        ring: &[LonLat],
        view: &ViewState,
    ) {
        if self.initialized || !engine.is_ready() {
            return;
        }

        if !engine.has_source(POINTS_SOURCE) {
            engine.add_source(POINTS_SOURCE, points.clone());
        }
        if !engine.has_source(BOUNDARY_SOURCE) {
            engine.add_source(BOUNDARY_SOURCE, boundary.clone());
        }
        if !engine.has_source(MASK_SOURCE) {
            engine.add_source(MASK_SOURCE, mask_collection(ring));
        }

        for category in Category::ALL {
            if !engine.has_layer(category.layer_id()) {
                engine.add_layer(heatmap_spec(category, view.opacity));
            }
        }
        if !engine.has_layer(MASK_LAYER) {
            engine.add_layer(mask_spec());
        }

        // The mask must cover the heatmaps whatever order the layers were
        // added in.
        for category in Category::ALL {
            engine.move_layer_below(category.layer_id(), MASK_LAYER);
        }

        self.initialized = true;
    }

    /// Re-derive the full layer configuration from the current view state.
    ///
    /// The active category gets the selected date as its filter, becomes
    /// visible and takes the current opacity setting outright; the
    /// zoom-faded opacity only applies before the first selection.
    /// Inactive categories are hidden with their filter and opacity left
    /// untouched. A no-op until initialization has happened and at least
    /// one date is loaded.
    pub fn apply(&self, engine: &mut dyn MapEngine, view: &ViewState, dates: &DateIndex) {
        if !self.initialized || dates.is_empty() {
            return;
        }
        let Some(selected) = dates.get(view.slider_position) else {
            return;
        };

        for category in Category::ALL {
            let id = category.layer_id();
            if view.is_active(category) {
                engine.set_filter(id, EqualsFilter::date(selected));
                engine.set_visibility(id, Visibility::Visible);
                engine.set_heatmap_opacity(id, Ramp::constant(view.opacity));
            } else {
                engine.set_visibility(id, Visibility::Hidden);
            }
        }
    }
}

/// Initial paint only: opacity fades in with zoom until the first date is
/// selected, after which `apply` pins it to the setting.
fn opacity_ramp(opacity: f64) -> Ramp {
    Ramp::new((MIN_ZOOM, 0.2), (MAX_ZOOM, opacity))
}

fn heatmap_spec(category: Category, opacity: f64) -> LayerSpec {
    LayerSpec {
        id: category.layer_id().to_owned(),
        source: POINTS_SOURCE.to_owned(),
        kind: LayerKind::Heatmap(HeatmapPaint {
            weight: PropertyRamp {
                property: category.property_name().to_owned(),
                ramp: Ramp::new((0.0, 0.0), (10.0, 1.0)),
            },
            intensity: Ramp::new((MIN_ZOOM, 1.0), (MAX_ZOOM, 4.0)),
            radius: Ramp::new((MIN_ZOOM, 80.0), (MAX_ZOOM, 20.0)),
            color: ColorRamp::heat(),
            opacity: opacity_ramp(opacity),
        }),
        // No date selected yet, so filter on a value no feature has.
        filter: Some(EqualsFilter::date("")),
        visibility: Visibility::Visible,
    }
}

fn mask_spec() -> LayerSpec {
    LayerSpec {
        id: MASK_LAYER.to_owned(),
        source: MASK_SOURCE.to_owned(),
        kind: LayerKind::Fill(FillPaint {
            color: Rgba::rgb(255, 255, 255),
        }),
        filter: None,
        visibility: Visibility::Visible,
    }
}

/// Full-extent rectangle with the boundary ring as an interior hole:
/// everything outside the region is painted over, the region itself shows
/// through.
fn mask_collection(ring: &[LonLat]) -> FeatureCollection {
    let world = vec![
        [-180.0, -90.0],
        [180.0, -90.0],
        [180.0, 90.0],
        [-180.0, 90.0],
        [-180.0, -90.0],
    ];
    FeatureCollection {
        features: vec![Feature {
            geometry: Geometry::Polygon {
                coordinates: vec![world, ring.to_vec()],
            },
            properties: PointProperties::default(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineState;

    const RING: [LonLat; 5] = [
        [25.0, 35.0],
        [26.0, 35.0],
        [26.0, 35.5],
        [25.0, 35.5],
        [25.0, 35.0],
    ];

    fn point_feature(lon: f64, lat: f64, date: &str, sum: f64) -> Feature {
        Feature {
            geometry: Geometry::Point {
                coordinates: [lon, lat],
            },
            properties: PointProperties {
                date: date.to_owned(),
                female: sum / 2.0,
                male: sum / 2.0,
                sum,
            },
        }
    }

    fn sample_points() -> FeatureCollection {
        FeatureCollection {
            features: vec![
                point_feature(25.2, 35.1, "2020-01-01", 4.0),
                point_feature(25.8, 35.4, "2020-01-02", 9.0),
            ],
        }
    }

    fn initialized_state() -> (EngineState, LayerController) {
        let mut state = EngineState::new();
        let mut controller = LayerController::new();
        controller.initialize(
            &mut state,
            &sample_points(),
            &FeatureCollection::default(),
            &RING,
            &ViewState::default(),
        );
        (state, controller)
    }

    fn dates() -> DateIndex {
        DateIndex::from_labels(["2020-01-01", "2020-01-02"])
    }

    #[test]
    fn initialize_registers_sources_and_layers() {
        let (state, controller) = initialized_state();
        assert!(controller.is_initialized());
        assert!(state.has_source(POINTS_SOURCE));
        assert!(state.has_source(BOUNDARY_SOURCE));
        assert!(state.has_source(MASK_SOURCE));
        let ids: Vec<&str> = state.layers().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["sum-layer", "female-layer", "male-layer", MASK_LAYER]);
    }

    #[test]
    fn mask_stays_on_top_of_the_heatmaps() {
        let (state, _) = initialized_state();
        let top = state.layers().last().map(|l| l.id.as_str());
        assert_eq!(top, Some(MASK_LAYER));
    }

    #[test]
    fn mask_polygon_carries_the_boundary_hole() {
        let (state, _) = initialized_state();
        let mask = state.source(MASK_SOURCE).expect("mask source registered");
        let Some(Geometry::Polygon { coordinates }) =
            mask.features.first().map(|f| &f.geometry)
        else {
            panic!("mask should be a polygon");
        };
        assert_eq!(coordinates.len(), 2);
        assert_eq!(coordinates[0][0], [-180.0, -90.0]);
        assert_eq!(coordinates[1], RING.to_vec());
    }

    #[test]
    fn new_layers_filter_on_an_impossible_date() {
        let (state, _) = initialized_state();
        for category in Category::ALL {
            let layer = state.layer(category.layer_id()).expect("layer exists");
            assert_eq!(layer.filter, Some(EqualsFilter::date("")));
        }
    }

    #[test]
    fn initialize_twice_changes_nothing() {
        let (mut state, mut controller) = initialized_state();
        let before = state.clone();
        controller.initialize(
            &mut state,
            &sample_points(),
            &FeatureCollection::default(),
            &RING,
            &ViewState::default(),
        );
        assert_eq!(state, before);
    }

    #[test]
    fn initialize_accepts_an_empty_point_collection() {
        let mut state = EngineState::new();
        let mut controller = LayerController::new();
        controller.initialize(
            &mut state,
            &FeatureCollection::default(),
            &FeatureCollection::default(),
            &RING,
            &ViewState::default(),
        );
        assert!(controller.is_initialized());
        assert!(state.source(POINTS_SOURCE).is_some_and(|s| s.is_empty()));
        assert_eq!(state.layers().len(), 4);
    }

    #[test]
    fn apply_configures_the_active_category() {
        let (mut state, controller) = initialized_state();
        let view = ViewState {
            slider_position: 1,
            opacity: 0.5,
            active: Some(Category::Male),
        };
        controller.apply(&mut state, &view, &dates());

        let male = state.layer("male-layer").expect("layer exists");
        assert_eq!(male.filter, Some(EqualsFilter::date("2020-01-02")));
        assert_eq!(male.visibility, Visibility::Visible);
        let LayerKind::Heatmap(paint) = &male.kind else {
            panic!("male layer should be a heatmap");
        };
        assert_eq!(paint.opacity, Ramp::constant(0.5));

        for inactive in ["sum-layer", "female-layer"] {
            let layer = state.layer(inactive).expect("layer exists");
            assert_eq!(layer.visibility, Visibility::Hidden);
            // Filter stays at its initial value.
            assert_eq!(layer.filter, Some(EqualsFilter::date("")));
        }
    }

    #[test]
    fn apply_pins_opacity_to_the_setting_at_every_zoom() {
        let (mut state, controller) = initialized_state();
        let view = ViewState {
            slider_position: 0,
            opacity: 1.0,
            active: Some(Category::Sum),
        };
        controller.apply(&mut state, &view, &dates());

        let layer = state.layer("sum-layer").expect("layer exists");
        let LayerKind::Heatmap(paint) = &layer.kind else {
            panic!("sum layer should be a heatmap");
        };
        // The zoom fade belongs to the pre-selection paint only; once a
        // date is active the user's setting holds across the zoom range.
        for zoom in [MIN_ZOOM, 10.0, MAX_ZOOM] {
            assert_eq!(paint.opacity.eval(zoom), 1.0);
        }
    }

    #[test]
    fn apply_is_deterministic() {
        let (mut state, controller) = initialized_state();
        let view = ViewState {
            slider_position: 1,
            opacity: 0.5,
            active: Some(Category::Male),
        };
        controller.apply(&mut state, &view, &dates());
        let first = state.clone();
        controller.apply(&mut state, &view, &dates());
        assert_eq!(state, first);
    }

    #[test]
    fn apply_with_no_active_category_hides_everything() {
        let (mut state, controller) = initialized_state();
        controller.apply(&mut state, &ViewState::default(), &dates());
        for category in Category::ALL {
            let layer = state.layer(category.layer_id()).expect("layer exists");
            assert_eq!(layer.visibility, Visibility::Hidden);
        }
    }

    #[test]
    fn apply_before_initialize_is_a_no_op() {
        let mut state = EngineState::new();
        let controller = LayerController::new();
        controller.apply(&mut state, &ViewState::default(), &dates());
        assert_eq!(state, EngineState::new());
    }

    #[test]
    fn apply_with_empty_dates_is_a_no_op() {
        let (mut state, controller) = initialized_state();
        let before = state.clone();
        controller.apply(&mut state, &ViewState::default(), &DateIndex::default());
        assert_eq!(state, before);
    }

    #[test]
    fn apply_ignores_an_out_of_range_slider() {
        let (mut state, controller) = initialized_state();
        let before = state.clone();
        let view = ViewState {
            slider_position: 99,
            opacity: 1.0,
            active: Some(Category::Sum),
        };
        controller.apply(&mut state, &view, &dates());
        assert_eq!(state, before);
    }
}
