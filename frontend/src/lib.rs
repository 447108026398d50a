//! Browser entry point: hydrates the server-rendered pages so the listing
//! filters, dropdowns and pagination become interactive.

/// Installs console logging and the panic hook, then hydrates the body.
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();

    leptos::mount::hydrate_body(app::component);
}
