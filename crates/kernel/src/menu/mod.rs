//! Menu system for navigation generation.
//!
//! Menus are declared as ordered item trees and provide:
//! - Titles (literal, translated, or derived from the item id)
//! - URLs resolved from paths, named routes or actions
//! - Active-trail highlighting for the current page
//! - Per-item access rules

mod definition;
mod generator;
mod item;
mod params;
mod registry;
mod title;

pub use definition::{MenuItemSpec, MenuItems, Target};
pub use generator::{
    ActiveUrlResolver, MAX_MENU_DEPTH, MenuGenerator, MenuOptions, PLACEHOLDER_URL,
};
pub use item::{MenuItem, active_trail, find_item};
pub use params::{DYNAMIC_PREFIX, DynamicParams};
pub use registry::{ConfigFormat, MenuFile, MenuRegistry};
pub use title::title_case;
