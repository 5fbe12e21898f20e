use leptos::prelude::*;

use lasithi_shared::dates::DateIndex;
use lasithi_shared::view::{Category, ViewState};

use crate::time_format::format_date_label;

const HEADING_STYLE: &str = "margin: 0 0 2px; font-size: 0.72rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.05em; color: #6d6a64;";
const VALUE_STYLE: &str = "font-size: 0.85rem; color: #2b2a28; min-height: 1.2em;";
const SLIDER_STYLE: &str = "width: 100%; margin: 6px 0 0; accent-color: #b2372f;";

/// Overlay panel with the date slider, the opacity slider, and the
/// category toggles.
#[component]
pub fn ControlPanel() -> impl IntoView {
    let dates: RwSignal<DateIndex> = expect_context();
    let view_state: RwSignal<ViewState> = expect_context();

    view! {
        <div style="position: absolute; top: 10px; right: 10px; width: 200px; background: rgba(255, 255, 255, 0.94); border-radius: 6px; box-shadow: 0 1px 4px rgba(0, 0, 0, 0.25); padding: 12px 14px; font-family: system-ui, sans-serif; z-index: 2;">
            <DateSection dates=dates view_state=view_state />
            <OpacitySection view_state=view_state />
            <CategoryToggles view_state=view_state />
        </div>
    }
}

#[component]
fn DateSection(dates: RwSignal<DateIndex>, view_state: RwSignal<ViewState>) -> impl IntoView {
    let on_input = move |ev: leptos::ev::Event| {
        if let Ok(position) = event_target_value(&ev).parse::<usize>() {
            view_state.update(|v| v.slider_position = position);
        }
    };
    let selected_label = move || {
        let index = dates.get();
        index
            .get(view_state.get().slider_position)
            .map(format_date_label)
            .unwrap_or_default()
    };

    view! {
        <div style="margin-bottom: 12px;">
            <h2 style=HEADING_STYLE>"Dates"</h2>
            <div style=VALUE_STYLE>{selected_label}</div>
            <input
                type="range"
                style=SLIDER_STYLE
                min="0"
                max=move || dates.get().last_position().to_string()
                step="1"
                prop:value=move || view_state.get().slider_position.to_string()
                disabled=move || dates.get().is_empty()
                on:input=on_input
            />
        </div>
    }
}

#[component]
fn OpacitySection(view_state: RwSignal<ViewState>) -> impl IntoView {
    let on_input = move |ev: leptos::ev::Event| {
        if let Ok(opacity) = event_target_value(&ev).parse::<f64>() {
            view_state.update(|v| v.set_opacity(opacity));
        }
    };

    view! {
        <div style="margin-bottom: 12px;">
            <h2 style=HEADING_STYLE>"Opacity"</h2>
            <div style=VALUE_STYLE>{move || format!("{:.1}", view_state.get().opacity)}</div>
            <input
                type="range"
                style=SLIDER_STYLE
                min="0"
                max="1"
                step="0.1"
                prop:value=move || format!("{:.1}", view_state.get().opacity)
                on:input=on_input
            />
        </div>
    }
}

#[component]
fn CategoryToggles(view_state: RwSignal<ViewState>) -> impl IntoView {
    view! {
        <div style="display: flex; flex-direction: column; gap: 4px; border-top: 1px solid #e2ded6; padding-top: 10px;">
            {Category::ALL
                .into_iter()
                .map(|category| {
                    // Checkboxes act as exclusive toggles: picking one
                    // replaces the selection, re-picking it is a no-op. The
                    // checked prop re-applies on every state change, which
                    // undoes the browser's visual untick.
                    view! {
                        <label style="display: flex; align-items: center; gap: 6px; cursor: pointer; font-size: 0.85rem; color: #2b2a28;">
                            <input
                                type="checkbox"
                                prop:checked=move || view_state.get().is_active(category)
                                on:change=move |_| {
                                    view_state.update(|v| v.select_category(category));
                                }
                            />
                            {category.label()}
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}
