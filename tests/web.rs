//! Browser smoke tests for the DOM-backed grid.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use catalog_grid::components::card::DatasetCard;
use catalog_grid::config::GridConfig;
use catalog_grid::core::host::Membership;
use catalog_grid::models::Dataset;
use catalog_grid::platform::GridController;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn element(style: &str) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let el: HtmlElement = document.create_element("div").unwrap().unchecked_into();
    el.style().set_css_text(style);
    el
}

/// Scroll container of 1048x600 holding an empty grid surface.
fn mount_points() -> (HtmlElement, HtmlElement) {
    let container = element("width: 1048px; height: 600px; overflow-y: auto;");
    let grid = element("position: relative; width: 100%;");
    container.append_child(&grid).unwrap();
    let body = web_sys::window().unwrap().document().unwrap().body().unwrap();
    body.append_child(&container).unwrap();
    (grid, container)
}

fn datasets(n: usize) -> Vec<Dataset> {
    (0..n)
        .map(|i| Dataset {
            path: format!("ds/{i}"),
            ..Dataset::default()
        })
        .collect()
}

fn card_paths(grid: &HtmlElement) -> HashSet<String> {
    let cards = grid.query_selector_all(".video-card").unwrap();
    (0..cards.length())
        .filter_map(|i| cards.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .filter_map(|el| el.get_attribute("data-path"))
        .collect()
}

#[wasm_bindgen_test]
fn test_mount_renders_only_the_window() {
    let (grid, container) = mount_points();
    let selection = Rc::new(RefCell::new(HashSet::from(["ds/0".to_string()])));
    let cart: Rc<dyn Membership> = Rc::new(RefCell::new(HashSet::<String>::new()));

    let controller = GridController::mount(
        grid.clone(),
        container.clone(),
        GridConfig::default(),
        Box::new(DatasetCard),
        selection,
        cart,
    )
    .unwrap();
    controller.set_items(datasets(200));

    let paths = card_paths(&grid);
    assert!(!paths.is_empty());
    assert!(paths.len() < 200);
    assert_eq!(paths.len(), controller.materialized());
    assert!(paths.contains("ds/0"));

    let first = grid.query_selector("[data-path='ds/0']").unwrap().unwrap();
    assert!(first.class_list().contains("selected"));

    controller.clear();
    assert!(card_paths(&grid).is_empty());
    container.remove();
}

#[wasm_bindgen_test]
fn test_shrinking_the_list_removes_cards() {
    let (grid, container) = mount_points();
    let none: Rc<dyn Membership> = Rc::new(HashSet::<String>::new());

    let controller = GridController::mount(
        grid.clone(),
        container.clone(),
        GridConfig::default(),
        Box::new(DatasetCard),
        none.clone(),
        none,
    )
    .unwrap();
    controller.set_items(datasets(100));
    controller.set_items(datasets(3));

    let expected: HashSet<String> = (0..3).map(|i| format!("ds/{i}")).collect();
    assert_eq!(card_paths(&grid), expected);
    container.remove();
}

#[wasm_bindgen_test]
fn test_cart_toggle_follows_cart_membership() {
    let (grid, container) = mount_points();
    let cart = Rc::new(RefCell::new(HashSet::<String>::new()));
    let selection: Rc<dyn Membership> = Rc::new(HashSet::<String>::new());

    let controller = GridController::mount(
        grid.clone(),
        container.clone(),
        GridConfig::default(),
        Box::new(DatasetCard),
        selection,
        cart.clone(),
    )
    .unwrap();
    controller.set_items(datasets(4));

    let button = grid
        .query_selector("[data-path='ds/1'] .cart-toggle")
        .unwrap()
        .unwrap();
    assert_eq!(button.text_content().as_deref(), Some("Add to cart"));
    assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("false"));

    cart.borrow_mut().insert("ds/1".to_string());
    assert_eq!(controller.refresh_flags(), 1);
    assert_eq!(button.text_content().as_deref(), Some("In cart"));
    assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("true"));
    let card = grid.query_selector("[data-path='ds/1']").unwrap().unwrap();
    assert!(card.class_list().contains("in-cart"));

    cart.borrow_mut().remove("ds/1");
    controller.refresh_flags();
    assert_eq!(button.text_content().as_deref(), Some("Add to cart"));
    assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("false"));
    container.remove();
}
