//! Wayfinder Menu Kernel Library
//!
//! Generates hierarchical navigation menus from declarative item trees:
//! titles, URLs, active-trail highlighting and per-item access control.
//! The `wayfinder` binary renders configured menus from the command line.

pub mod access;
pub mod config;
pub mod error;
pub mod locale;
pub mod menu;
pub mod routing;
pub mod theme;

pub use config::Config;
pub use error::{MenuError, MenuResult};
pub use menu::{MenuGenerator, MenuItem, MenuItemSpec, MenuItems, MenuRegistry};
