use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{PointerEvent, WheelEvent};

use lasithi_shared::dates::DateIndex;
use lasithi_shared::layers::LayerController;
use lasithi_shared::view::ViewState;

use crate::app::EngineReady;
use crate::engine::CanvasEngine;
use crate::loader::LoadedMap;
use crate::render_loop::RenderScheduler;
use crate::viewport::Viewport;

/// Backing-store scale for the map canvas. Heatmap cost grows with the
/// square of this, so high-density displays are capped at 2x.
pub fn render_scale() -> f64 {
    let dpr = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);
    dpr.clamp(1.0, 2.0)
}

struct ResizeBinding {
    window: web_sys::Window,
    _handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

fn remove_resize_binding() {
    RESIZE_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old.window.remove_event_listener_with_callback(
                "resize",
                old._handler.as_ref().unchecked_ref(),
            );
        }
    });
}

/// Full-viewport map surface. Owns the canvas engine and the layer
/// controller, repaints through rAF batching, and handles drag-pan and
/// wheel-zoom.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let map_data: RwSignal<Option<LoadedMap>> = expect_context();
    let dates: RwSignal<DateIndex> = expect_context();
    let view_state: RwSignal<ViewState> = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();
    let EngineReady(engine_ready) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    let engine: Rc<RefCell<Option<CanvasEngine>>> = Rc::new(RefCell::new(None));
    let controller: Rc<RefCell<LayerController>> = Rc::new(RefCell::new(LayerController::new()));

    // Paint via rAF batching.
    let engine_render = engine.clone();
    let scheduler = Rc::new(RenderScheduler::new(move || {
        if let Some(engine) = engine_render.borrow().as_ref() {
            engine.render(&viewport.get_untracked());
        }
    }));

    // Acquire the drawing surface once the canvas is mounted.
    let engine_acquire = engine.clone();
    Effect::new(move || {
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        if engine_acquire.borrow().is_some() {
            return;
        }
        match CanvasEngine::new(canvas) {
            Some(built) => {
                *engine_acquire.borrow_mut() = Some(built);
                engine_ready.set(true);
            }
            None => {
                web_sys::console::error_1(&"map surface: 2d context unavailable".into());
            }
        }
    });

    // Push data and UI state into the engine: one-time layer setup when the
    // documents arrive, then filter/visibility/opacity updates on every
    // state change.
    let engine_apply = engine.clone();
    let controller_apply = controller.clone();
    let scheduler_apply = scheduler.clone();
    Effect::new(move || {
        let view_now = view_state.get();
        if !engine_ready.get() {
            return;
        }
        map_data.track();
        dates.track();

        let mut engine_ref = engine_apply.borrow_mut();
        let Some(engine) = engine_ref.as_mut() else {
            return;
        };
        let mut controller = controller_apply.borrow_mut();
        map_data.with_untracked(|data| {
            if let Some(data) = data {
                controller.initialize(engine, &data.points, &data.boundary, &data.ring, &view_now);
            }
        });
        dates.with_untracked(|index| controller.apply(engine, &view_now, index));
        scheduler_apply.mark_dirty();
    });

    // Pan/zoom repaints.
    let scheduler_viewport = scheduler.clone();
    Effect::new(move || {
        viewport.track();
        scheduler_viewport.mark_dirty();
    });

    // Window resizes change the canvas's CSS box; the render pass picks up
    // the new size, it just needs a frame.
    let scheduler_resize = scheduler.clone();
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        remove_resize_binding();
        let scheduler = scheduler_resize.clone();
        let handler = Closure::<dyn Fn()>::new(move || scheduler.mark_dirty());
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    let engine_cleanup = send_wrapper::SendWrapper::new(engine.clone());
    on_cleanup(move || {
        remove_resize_binding();
        *engine_cleanup.borrow_mut() = None;
        engine_ready.set(false);
    });

    // --- Input handlers ---

    let is_dragging = Rc::new(Cell::new(false));
    let last_x = Rc::new(Cell::new(0.0));
    let last_y = Rc::new(Cell::new(0.0));

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let width = f64::from(canvas.client_width());
        let height = f64::from(canvas.client_height());
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        viewport.update(|vp| vp.zoom_at(e.delta_y(), x, y, width, height));
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            if !is_dragging.get() {
                return;
            }
            let dx = e.client_x() as f64 - last_x.get();
            let dy = e.client_y() as f64 - last_y.get();
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);
            viewport.update(|vp| vp.pan(dx, dy));
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        move |e: PointerEvent| {
            is_dragging.set(false);
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    view! {
        <canvas
            node_ref=canvas_ref
            style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; cursor: grab; display: block;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
        />
    }
}
