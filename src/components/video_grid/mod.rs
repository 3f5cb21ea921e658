//! Virtualized dataset grid component.
//!
//! Owns a [`GridController`] for the lifetime of the view and feeds it the
//! filtered list, scroll and resize events, and selection/cart changes.
//! Card clicks are delegated from the scroll container.

use std::collections::HashSet;
use std::rc::Rc;

use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::app::AppContext;
use crate::components::card::DatasetCard;
use crate::config::{classes, GridConfig, GRID_ELEMENT_ID};
use crate::core::host::Membership;
use crate::models::Dataset;
use crate::platform::dom::DATA_PATH;
use crate::platform::{GridController, RenderTrigger};
use crate::utils::dom::closest;

stylance::import_crate_style!(css, "src/components/video_grid/video_grid.module.css");

impl Membership for RwSignal<HashSet<String>> {
    fn contains(&self, key: &str) -> bool {
        self.try_with_untracked(|set| set.contains(key))
            .unwrap_or(false)
    }
}

#[component]
pub fn VideoGrid(
    /// Filtered list, in display order.
    #[prop(into)]
    datasets: Signal<Vec<Dataset>>,
    config: GridConfig,
    /// Keys of cards created by each render, for binding card actions.
    #[prop(optional)]
    on_materialized: Option<Callback<Vec<String>>>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let container_ref = NodeRef::<html::Div>::new();
    let grid_ref = NodeRef::<html::Div>::new();
    let controller = StoredValue::new_local(None::<Rc<GridController>>);

    // Mount once the elements exist, then hand every new list to the grid
    Effect::new(move |_| {
        let items = datasets.get();
        if controller.with_value(Option::is_none) {
            let (Some(container), Some(grid)) = (container_ref.get(), grid_ref.get()) else {
                return;
            };
            let selection: Rc<dyn Membership> = Rc::new(ctx.selection);
            let cart: Rc<dyn Membership> = Rc::new(ctx.cart);
            match GridController::mount(
                grid.into(),
                container.into(),
                config.clone(),
                Box::new(DatasetCard),
                selection,
                cart,
            ) {
                Ok(mounted) => {
                    if let Some(callback) = on_materialized {
                        mounted.set_materialized_listener(move |keys: &[String]| {
                            callback.run(keys.to_vec())
                        });
                    }
                    controller.set_value(Some(mounted));
                }
                Err(e) => {
                    log::error!("failed to mount video grid: {e}");
                    return;
                }
            }
        }
        controller.with_value(|c| {
            if let Some(c) = c {
                c.set_items(items);
            }
        });
    });

    // Recolor on selection/cart changes without re-rendering
    Effect::new(move |_| {
        ctx.selection.track();
        ctx.cart.track();
        controller.with_value(|c| {
            if let Some(c) = c {
                c.request_flag_refresh();
            }
        });
    });

    let render = move |trigger: RenderTrigger| {
        controller.with_value(|c| {
            if let Some(c) = c {
                c.request_render(trigger);
            }
        });
    };

    let resize = window_event_listener(ev::resize, move |_| render(RenderTrigger::Resize));
    on_cleanup(move || {
        resize.remove();
        controller.update_value(|c| {
            if let Some(c) = c.take() {
                c.clear();
            }
        });
    });

    let on_click = move |ev: ev::MouseEvent| {
        let target = ev.target();
        let Some(card) = closest(target.clone(), &format!(".{}", classes::CARD)) else {
            return;
        };
        let Some(key) = card.get_attribute(DATA_PATH) else {
            return;
        };
        if closest(target, &format!(".{}", classes::CART_TOGGLE)).is_some() {
            ev.stop_propagation();
            ctx.toggle_cart(key);
        } else {
            ctx.toggle_selection(key);
        }
    };

    view! {
        <div
            class=css::container
            node_ref=container_ref
            on:scroll=move |_| render(RenderTrigger::Scroll)
            on:click=on_click
        >
            <div id=GRID_ELEMENT_ID class=css::grid node_ref=grid_ref></div>
        </div>
    }
}
