//! Front-end pages and the small JSON APIs the viewer page calls.
//!
//! ```text
//! GET /              → pages.rs (index template, optional ?region=)
//! GET /static/*      → ServeDir over site.static_dir (wired in http/server.rs)
//! GET /get-races     → races.rs (fixed name → ID table)
//! GET /item-lookup   → items.rs (item ID → display ID via XML endpoint)
//! GET /broken        → pages.rs (always 500)
//! ```

pub mod items;
pub mod pages;
pub mod races;

pub use items::{ItemLookup, LookupError};
pub use pages::IndexPage;
