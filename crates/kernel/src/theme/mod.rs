//! Menu rendering.
//!
//! Provides Tera-based HTML rendering of generated menus with template
//! suggestion resolution (`menu--{name}.html`, then `menu.html`).

mod engine;

pub use engine::{DEFAULT_TEMPLATE, MenuRenderer};
