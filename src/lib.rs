//! # presu-web
//!
//! Rust + WASM companion for the finance application's server-rendered pages.
//!
//! The server renders complete HTML; this crate attaches behavior to that
//! markup once the document has loaded. The only behavior with real I/O is the
//! category -> subcategory selector on the expense form (`selector`), which
//! refills the child `<select>` from a lookup endpoint. The remaining page
//! modules bind delete-confirmation modals, the custom date range toggle, the
//! budget replacement prompt, and the dashboard charts.
//!
//! Everything browser-specific sits behind the `hydrate` feature. Native builds
//! keep the pure logic (selector controller, wire parsing, chart configuration)
//! so it can be unit tested without a rendered page.

pub mod config;
#[cfg(feature = "hydrate")]
pub mod dom;
pub mod net;
pub mod pages;
pub mod selector;

/// WASM entry point: install logging, then attach every page behavior whose
/// host markup is present in the current document.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("logger already initialised: {err}").into());
    }
    pages::attach_all();
}
