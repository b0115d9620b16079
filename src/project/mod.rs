//! Ad project document module.
//!
//! This module provides:
//! - `model`: Data structures for the project aggregate (Shot, Voiceover,
//!   BrandKit, AdProject) and the pipeline status value
//! - `store`: ProjectStore with editing/reporting operations and O(1)
//!   targeted updates
//! - `wasm`: WASM bindings for browser usage (JsProjectStore)

pub mod model;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use model::*;
pub use store::ProjectStore;

#[cfg(feature = "wasm")]
pub use wasm::JsProjectStore;
