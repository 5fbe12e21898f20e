use std::collections::HashMap;

use crate::features::FeatureCollection;
use crate::style::{EqualsFilter, LayerKind, LayerSpec, Ramp, Visibility};

/// Capability surface of the map rendering engine.
///
/// The layer controller drives everything through this trait so the drawing
/// backend stays swappable. Surface creation and teardown belong to the
/// concrete engine, which owns its canvas.
pub trait MapEngine {
    /// Whether the engine is ready to accept sources and layers.
    fn is_ready(&self) -> bool;
    fn has_source(&self, id: &str) -> bool;
    /// Register a named feature source. Callers check `has_source` first;
    /// re-registering an existing id replaces its data.
    fn add_source(&mut self, id: &str, data: FeatureCollection);
    fn has_layer(&self, id: &str) -> bool;
    /// Append a styled layer on top of the current stack.
    fn add_layer(&mut self, spec: LayerSpec);
    fn remove_layer(&mut self, id: &str);
    /// Reorder `id` to sit directly beneath `below`. Stacking follows list
    /// order, so adding alone does not guarantee the final order.
    fn move_layer_below(&mut self, id: &str, below: &str);
    fn set_filter(&mut self, id: &str, filter: EqualsFilter);
    fn set_visibility(&mut self, id: &str, visibility: Visibility);
    /// Replace the zoom-interpolated opacity of a heatmap layer. Fill
    /// layers ignore this.
    fn set_heatmap_opacity(&mut self, id: &str, opacity: Ramp);
}

/// Declarative engine state: named sources plus the ordered layer stack.
///
/// This is the bookkeeping half of any engine; a rendering backend wraps it
/// and draws from it, and tests drive it directly to observe the exact
/// configuration a sequence of controller calls produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    sources: HashMap<String, FeatureCollection>,
    layers: Vec<LayerSpec>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self, id: &str) -> Option<&FeatureCollection> {
        self.sources.get(id)
    }

    /// Layers bottom-to-top.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    fn layer_mut(&mut self, id: &str) -> Option<&mut LayerSpec> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }
}

impl MapEngine for EngineState {
    fn is_ready(&self) -> bool {
        true
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, data: FeatureCollection) {
        self.sources.insert(id.to_owned(), data);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id == id)
    }

    fn add_layer(&mut self, spec: LayerSpec) {
        self.layers.push(spec);
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.retain(|layer| layer.id != id);
    }

    fn move_layer_below(&mut self, id: &str, below: &str) {
        if id == below {
            return;
        }
        let Some(from) = self.layers.iter().position(|layer| layer.id == id) else {
            return;
        };
        let moved = self.layers.remove(from);
        match self.layers.iter().position(|layer| layer.id == below) {
            Some(to) => self.layers.insert(to, moved),
            // Without an anchor the layer goes back on top.
            None => self.layers.push(moved),
        }
    }

    fn set_filter(&mut self, id: &str, filter: EqualsFilter) {
        if let Some(layer) = self.layer_mut(id) {
            layer.filter = Some(filter);
        }
    }

    fn set_visibility(&mut self, id: &str, visibility: Visibility) {
        if let Some(layer) = self.layer_mut(id) {
            layer.visibility = visibility;
        }
    }

    fn set_heatmap_opacity(&mut self, id: &str, opacity: Ramp) {
        if let Some(layer) = self.layer_mut(id)
            && let LayerKind::Heatmap(paint) = &mut layer.kind
        {
            paint.opacity = opacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FillPaint, Rgba};

    fn fill_layer(id: &str) -> LayerSpec {
        LayerSpec {
            id: id.to_owned(),
            source: "src".to_owned(),
            kind: LayerKind::Fill(FillPaint {
                color: Rgba::rgb(255, 255, 255),
            }),
            filter: None,
            visibility: Visibility::Visible,
        }
    }

    fn layer_order(state: &EngineState) -> Vec<&str> {
        state.layers().iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn sources_register_and_report() {
        let mut state = EngineState::new();
        assert!(!state.has_source("points"));
        state.add_source("points", FeatureCollection::default());
        assert!(state.has_source("points"));
        assert!(state.source("points").is_some());
    }

    #[test]
    fn layers_stack_in_add_order() {
        let mut state = EngineState::new();
        state.add_layer(fill_layer("a"));
        state.add_layer(fill_layer("b"));
        state.add_layer(fill_layer("c"));
        assert_eq!(layer_order(&state), ["a", "b", "c"]);
    }

    #[test]
    fn move_layer_below_reorders() {
        let mut state = EngineState::new();
        state.add_layer(fill_layer("a"));
        state.add_layer(fill_layer("b"));
        state.add_layer(fill_layer("c"));
        state.move_layer_below("c", "a");
        assert_eq!(layer_order(&state), ["c", "a", "b"]);
        // Already-below stays put relative to the anchor.
        state.move_layer_below("c", "b");
        assert_eq!(layer_order(&state), ["a", "c", "b"]);
    }

    #[test]
    fn move_layer_below_missing_anchor_goes_on_top() {
        let mut state = EngineState::new();
        state.add_layer(fill_layer("a"));
        state.add_layer(fill_layer("b"));
        state.move_layer_below("a", "nope");
        assert_eq!(layer_order(&state), ["b", "a"]);
    }

    #[test]
    fn remove_layer_drops_it() {
        let mut state = EngineState::new();
        state.add_layer(fill_layer("a"));
        state.add_layer(fill_layer("b"));
        state.remove_layer("a");
        assert_eq!(layer_order(&state), ["b"]);
        assert!(!state.has_layer("a"));
    }

    #[test]
    fn paint_mutations_hit_the_named_layer_only() {
        let mut state = EngineState::new();
        state.add_layer(fill_layer("a"));
        state.add_layer(fill_layer("b"));
        state.set_visibility("a", Visibility::Hidden);
        assert_eq!(
            state.layer("a").map(|l| l.visibility),
            Some(Visibility::Hidden)
        );
        assert_eq!(
            state.layer("b").map(|l| l.visibility),
            Some(Visibility::Visible)
        );
        // Opacity is a heatmap paint property; fills ignore it.
        state.set_heatmap_opacity("a", Ramp::new((7.0, 0.2), (12.0, 0.5)));
        assert!(matches!(
            state.layer("a").map(|l| &l.kind),
            Some(LayerKind::Fill(_))
        ));
    }
}
