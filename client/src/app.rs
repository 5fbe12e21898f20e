use leptos::prelude::*;

use lasithi_shared::dates::DateIndex;
use lasithi_shared::view::ViewState;

use crate::canvas::MapCanvas;
use crate::controls::ControlPanel;
use crate::loader::{self, LoadedMap};
use crate::viewport::Viewport;

/// Engine readiness as a distinct context type; a plain `RwSignal<bool>`
/// would collide with any other bool signal in context.
#[derive(Clone, Copy)]
pub(crate) struct EngineReady(pub RwSignal<bool>);

fn loading_shell_element(id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn set_loading_shell_step(step: &str) {
    if let Some(el) = loading_shell_element("app-loading-step") {
        el.set_text_content(Some(step));
    }
}

fn remove_loading_shell() {
    if let Some(shell) = loading_shell_element("app-loading-shell") {
        shell.remove();
    }
}

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    let map_data: RwSignal<Option<LoadedMap>> = RwSignal::new(None);
    let dates: RwSignal<DateIndex> = RwSignal::new(DateIndex::default());
    let view_state: RwSignal<ViewState> = RwSignal::new(ViewState::default());
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let engine_ready: RwSignal<bool> = RwSignal::new(false);
    let load_started: RwSignal<bool> = RwSignal::new(false);

    provide_context(map_data);
    provide_context(dates);
    provide_context(view_state);
    provide_context(viewport);
    provide_context(EngineReady(engine_ready));

    // One-shot startup fetch of both documents. Failures stay in the
    // console; the app renders an empty map either way.
    Effect::new(move || {
        if load_started.get_untracked() {
            return;
        }
        load_started.set(true);
        set_loading_shell_step("Loading survey data");
        wasm_bindgen_futures::spawn_local(async move {
            match loader::load_map_data().await {
                Ok((loaded, index)) => {
                    if index.is_empty() {
                        web_sys::console::warn_1(
                            &"point dataset has no dated features; the slider stays disabled"
                                .into(),
                        );
                    }
                    dates.set(index);
                    map_data.set(Some(loaded));
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("GeoJSON load failed: {e}").into());
                }
            }
            remove_loading_shell();
        });
    });

    // Keep the slider in range if the date index ever changes size.
    Effect::new(move || {
        let count = dates.with(|d| d.len());
        view_state.update(|v| v.clamp_slider(count));
    });

    view! {
        <div style="width: 100%; height: 100%; position: relative; overflow: hidden; background: #e9e5de;">
            <MapCanvas />
            <ControlPanel />
        </div>
    }
}
