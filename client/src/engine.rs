use std::cell::RefCell;

use lasithi_shared::engine::{EngineState, MapEngine};
use lasithi_shared::features::{FeatureCollection, Geometry, LonLat};
use lasithi_shared::style::{
    EqualsFilter, FillPaint, HeatmapPaint, LayerKind, LayerSpec, Ramp, Visibility,
};
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement, ImageData};

use crate::canvas::render_scale;
use crate::heatmap::{ColorLut, DensityGrid};
use crate::viewport::Viewport;

/// Fill behind all layers, standing in for a basemap.
const BACKGROUND: &str = "#e9e5de";

/// Canvas 2D realization of [`MapEngine`]. Layer bookkeeping lives in an
/// [`EngineState`]; `render` replays the current layer stack bottom to top
/// onto the attached canvas.
pub struct CanvasEngine {
    state: EngineState,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scratch: RefCell<Option<Scratch>>,
}

impl CanvasEngine {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            state: EngineState::new(),
            canvas,
            ctx,
            scratch: RefCell::new(None),
        })
    }

    /// Redraw the whole frame for the given viewport. Resizes the backing
    /// store to match the canvas's CSS box before drawing.
    pub fn render(&self, viewport: &Viewport) {
        let css_w = f64::from(self.canvas.client_width());
        let css_h = f64::from(self.canvas.client_height());
        if css_w <= 0.0 || css_h <= 0.0 {
            return;
        }
        let scale = render_scale();
        let device_w = ((css_w * scale) as u32).max(1);
        let device_h = ((css_h * scale) as u32).max(1);
        if self.canvas.width() != device_w || self.canvas.height() != device_h {
            self.canvas.set_width(device_w);
            self.canvas.set_height(device_h);
        }

        // Work in CSS units; setting the transform also clears any scale
        // left over from the previous frame.
        self.ctx
            .set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)
            .ok();
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, css_w, css_h);

        for layer in self.state.layers() {
            if !layer.is_visible() {
                continue;
            }
            match &layer.kind {
                LayerKind::Heatmap(paint) => {
                    self.render_heatmap(layer, paint, viewport, css_w, css_h, scale);
                }
                LayerKind::Fill(paint) => {
                    self.render_fill(layer, paint, viewport, css_w, css_h);
                }
            }
        }
    }

    /// Rasterize one heatmap layer: accumulate a density grid at device
    /// resolution, colorize it, and composite the result over the frame.
    fn render_heatmap(
        &self,
        layer: &LayerSpec,
        paint: &HeatmapPaint,
        viewport: &Viewport,
        css_w: f64,
        css_h: f64,
        scale: f64,
    ) {
        let Some(source) = self.state.source(&layer.source) else {
            return;
        };
        let zoom = viewport.zoom;
        let radius = paint.radius.eval(zoom);
        let intensity = paint.intensity.eval(zoom);
        let opacity = paint.opacity.eval(zoom);
        if radius <= 0.0 || opacity <= 0.0 {
            return;
        }

        let device_w = ((css_w * scale) as usize).max(1);
        let device_h = ((css_h * scale) as usize).max(1);
        let mut grid = DensityGrid::new(device_w, device_h);
        for feature in &source.features {
            if let Some(filter) = &layer.filter
                && !filter.matches(&feature.properties)
            {
                continue;
            }
            let Some(point) = feature.geometry.point() else {
                continue;
            };
            let (sx, sy) = viewport.lonlat_to_screen(point, css_w, css_h);
            let amount = paint.weight.eval(&feature.properties) * intensity;
            grid.splat(sx * scale, sy * scale, radius * scale, amount);
        }

        let lut = ColorLut::build(&paint.color);
        let pixels = grid.colorize(&lut, opacity);
        self.blit(&pixels, device_w as u32, device_h as u32, css_w, css_h);
    }

    /// Route colorized pixels through the scratch canvas. `put_image_data`
    /// replaces destination pixels outright, so the image goes to an
    /// offscreen canvas first and is composited from there.
    fn blit(&self, pixels: &[u8], device_w: u32, device_h: u32, css_w: f64, css_h: f64) {
        let mut scratch_ref = self.scratch.borrow_mut();
        if scratch_ref
            .as_ref()
            .is_none_or(|s| s.canvas.width() != device_w || s.canvas.height() != device_h)
        {
            *scratch_ref = Scratch::new(device_w, device_h);
        }
        let Some(scratch) = scratch_ref.as_ref() else {
            return;
        };
        let Ok(image) = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(pixels),
            device_w,
            device_h,
        ) else {
            return;
        };
        if scratch.ctx.put_image_data(&image, 0.0, 0.0).is_err() {
            return;
        }
        self.ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                &scratch.canvas,
                0.0,
                0.0,
                css_w,
                css_h,
            )
            .ok();
    }

    /// Fill polygon sources with even-odd winding so inner rings become
    /// holes. This is what cuts the study area out of the coverage mask.
    fn render_fill(
        &self,
        layer: &LayerSpec,
        paint: &FillPaint,
        viewport: &Viewport,
        css_w: f64,
        css_h: f64,
    ) {
        let Some(source) = self.state.source(&layer.source) else {
            return;
        };
        self.ctx.begin_path();
        for feature in &source.features {
            match &feature.geometry {
                Geometry::Polygon { coordinates } => {
                    self.trace_rings(coordinates, viewport, css_w, css_h);
                }
                Geometry::MultiPolygon { coordinates } => {
                    for polygon in coordinates {
                        self.trace_rings(polygon, viewport, css_w, css_h);
                    }
                }
                _ => {}
            }
        }
        self.ctx.set_fill_style_str(&paint.color.css());
        self.ctx
            .fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
    }

    fn trace_rings(&self, rings: &[Vec<LonLat>], viewport: &Viewport, css_w: f64, css_h: f64) {
        for ring in rings {
            let mut points = ring.iter();
            let Some(&first) = points.next() else {
                continue;
            };
            let (x, y) = viewport.lonlat_to_screen(first, css_w, css_h);
            self.ctx.move_to(x, y);
            for &point in points {
                let (x, y) = viewport.lonlat_to_screen(point, css_w, css_h);
                self.ctx.line_to(x, y);
            }
            self.ctx.close_path();
        }
    }
}

impl MapEngine for CanvasEngine {
    fn is_ready(&self) -> bool {
        true
    }

    fn has_source(&self, id: &str) -> bool {
        self.state.has_source(id)
    }

    fn add_source(&mut self, id: &str, data: FeatureCollection) {
        self.state.add_source(id, data);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.state.has_layer(id)
    }

    fn add_layer(&mut self, spec: LayerSpec) {
        self.state.add_layer(spec);
    }

    fn remove_layer(&mut self, id: &str) {
        self.state.remove_layer(id);
    }

    fn move_layer_below(&mut self, id: &str, below: &str) {
        self.state.move_layer_below(id, below);
    }

    fn set_filter(&mut self, id: &str, filter: EqualsFilter) {
        self.state.set_filter(id, filter);
    }

    fn set_visibility(&mut self, id: &str, visibility: Visibility) {
        self.state.set_visibility(id, visibility);
    }

    fn set_heatmap_opacity(&mut self, id: &str, opacity: Ramp) {
        self.state.set_heatmap_opacity(id, opacity);
    }
}

/// Offscreen canvas the colorized heatmap image lands on before being
/// composited, recreated when the frame size changes.
struct Scratch {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Scratch {
    fn new(width: u32, height: u32) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}
