//! kubemgr-core — shared library for the kubemgr web UI.
//!
//! Provides:
//! - `tile` — tile model (title + shown/hidden display state)
//! - `page` — host page structure: search input and tile grid
//! - `filter` — search-box filter handler (case-insensitive substring match)
//! - `store` — namespace listing from the generated output directory
//! - `env` — `.env` file loader
//! - `render` — HTML rendering of the index page

pub mod env;
pub mod filter;
pub mod page;
pub mod render;
pub mod store;
pub mod tile;

/// Crate version, reported by the web binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
