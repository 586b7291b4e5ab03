//! Web UI for blog-rs
//!
//! A Yew client for the hash-routed blog: article list, detail pages and
//! per-article comments kept in local storage.

mod app;
pub mod components;
pub mod fetch;
pub mod storage;

use wasm_bindgen::prelude::*;

/// Entry point for the WASM application.
#[wasm_bindgen(start)]
pub fn run_app() {
    // Initialize panic hook for better error messages
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    yew::Renderer::<app::App>::new().render();
}
