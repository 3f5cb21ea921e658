//! Root application module.
//!
//! Contains the App component and the [`AppContext`] shared with the grid:
//! the loaded catalog, the filter query, and the selection and cart sets.

use std::collections::HashSet;

use leptos::prelude::*;

use crate::components::VideoGrid;
use crate::config::{GridConfig, APP_NAME};
use crate::models::Dataset;
use crate::utils::{fetch_catalog, fetch_config};

stylance::import_crate_style!(css, "src/app.module.css");

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Selection and cart are keyed by dataset `path`. The grid only reads them;
/// all mutation goes through [`toggle_selection`](Self::toggle_selection) and
/// [`toggle_cart`](Self::toggle_cart).
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Full catalog as loaded.
    pub datasets: RwSignal<Vec<Dataset>>,
    /// Free-text filter.
    pub query: RwSignal<String>,
    pub selection: RwSignal<HashSet<String>>,
    pub cart: RwSignal<HashSet<String>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            datasets: RwSignal::new(Vec::new()),
            query: RwSignal::new(String::new()),
            selection: RwSignal::new(HashSet::new()),
            cart: RwSignal::new(HashSet::new()),
        }
    }

    pub fn toggle_selection(&self, key: String) {
        self.selection.update(|set| toggle(set, key));
    }

    pub fn toggle_cart(&self, key: String) {
        self.cart.update(|set| toggle(set, key));
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert `key` if absent, remove it if present.
fn toggle(set: &mut HashSet<String>, key: String) {
    if !set.remove(&key) {
        set.insert(key);
    }
}

// ============================================================================
// App
// ============================================================================

/// Root component: loads configuration and catalog, then shows the filter
/// bar and the grid.
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    let config = RwSignal::new(None::<GridConfig>);
    let load_error = RwSignal::new(None::<String>);

    leptos::task::spawn_local(async move {
        config.set(Some(fetch_config().await.grid));
        match fetch_catalog().await {
            Ok(datasets) => {
                log::info!("loaded {} datasets", datasets.len());
                ctx.datasets.set(datasets);
            }
            Err(e) => {
                log::error!("failed to load catalog: {e}");
                load_error.set(Some(e.to_string()));
            }
        }
    });

    let filtered = Memo::new(move |_| {
        let query = ctx.query.get();
        ctx.datasets.with(|all| {
            all.iter()
                .filter(|ds| ds.matches(&query))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let shown = move || filtered.with(Vec::len);
    let selected = move || ctx.selection.with(HashSet::len);
    let in_cart = move || ctx.cart.with(HashSet::len);

    view! {
        <div class=css::page>
            <header class=css::toolbar>
                <h1 class=css::title>{APP_NAME}</h1>
                <input
                    class=css::search
                    type="search"
                    placeholder="Filter datasets"
                    prop:value=move || ctx.query.get()
                    on:input=move |ev| ctx.query.set(event_target_value(&ev))
                />
                <span class=css::counts>
                    {shown}" shown · "{selected}" selected · "{in_cart}" in cart"
                </span>
            </header>
            {move || load_error.get().map(|e| view! {
                <p class=css::error>"Could not load the catalog: "{e}</p>
            })}
            {move || config.get().map(|config| view! {
                <VideoGrid datasets=filtered config=config />
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut set = HashSet::new();
        toggle(&mut set, "a".to_string());
        assert!(set.contains("a"));
        toggle(&mut set, "b".to_string());
        toggle(&mut set, "a".to_string());
        assert!(!set.contains("a"));
        assert!(set.contains("b"));
    }
}
