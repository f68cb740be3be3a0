//! Access control for menu items.
//!
//! The generator hands each item's rules to an [`AccessHandler`]; items whose
//! check fails are dropped together with their submenu. The handler is
//! optional: without one every item is visible.

mod gate;

pub use gate::{Gate, GateAccessHandler, Subject};

use serde::Serialize;

use crate::menu::Target;

/// Access rules of a single menu item, with dynamic parameters already resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessRules {
    pub allows: Option<Target>,
    pub check: Option<Target>,
    pub denies: Option<Target>,
    pub roles: Option<Vec<String>>,
    pub logged: Option<bool>,
}

impl AccessRules {
    /// Check if no rule is set.
    pub fn is_empty(&self) -> bool {
        self.allows.is_none()
            && self.check.is_none()
            && self.denies.is_none()
            && self.roles.is_none()
            && self.logged.is_none()
    }
}

/// Decides whether the current user may see a menu item.
pub trait AccessHandler: Send + Sync {
    fn check(&self, rules: &AccessRules) -> bool;
}

impl<F> AccessHandler for F
where
    F: Fn(&AccessRules) -> bool + Send + Sync,
{
    fn check(&self, rules: &AccessRules) -> bool {
        self(rules)
    }
}
