mod app;
mod canvas;
mod controls;
mod engine;
mod heatmap;
mod loader;
mod render_loop;
mod time_format;
mod viewport;

use leptos::mount::mount_to;
use std::any::Any;
use std::cell::RefCell;
use wasm_bindgen::JsCast;

thread_local! {
    static APP_MOUNT_HANDLE: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

fn main() {
    console_error_panic_hook::set_once();
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(target) = document
        .get_element_by_id("app")
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body())
    else {
        return;
    };

    APP_MOUNT_HANDLE.with(|slot| {
        // Re-entry replaces the previous mount so its effects stop running.
        let _old = slot.borrow_mut().take();
        *slot.borrow_mut() = Some(Box::new(mount_to(target, app::App)));
    });
}
