use catalog_grid::app::App;
use catalog_grid::utils::logger;
use leptos::prelude::*;
use log::LevelFilter;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    logger::init(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    let root = document()
        .get_element_by_id("app")
        .expect("Failed to find #app element")
        .unchecked_into::<web_sys::HtmlElement>();

    mount_to(root, App).forget();
}
