//! Browser implementations of the grid host.
//!
//! - [`dom`] - `GridSurface`/`CardHandle` over `web-sys` elements
//! - [`observer`] - Shared `IntersectionObserver` backend
//! - [`frame`] - `requestAnimationFrame` scheduling
//! - [`GridController`] - Owns the grid and routes browser callbacks into it

mod controller;
pub mod dom;
pub mod frame;
pub mod observer;

pub use controller::{DomGrid, GridController, RenderTrigger};
