//! Generated, render-ready menu items.

use serde::{Deserialize, Serialize};

/// A resolved menu item.
///
/// Only the fields needed for rendering survive generation; access rules and
/// raw url/route/action targets stay behind in the [`MenuItemSpec`].
///
/// [`MenuItemSpec`]: super::MenuItemSpec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Key of the item among its siblings.
    pub id: String,
    /// Resolved title.
    pub title: String,
    /// Resolved URL, or `#` when the item has no target.
    pub url: String,
    /// CSS classes, including the active class when active.
    pub class: String,
    /// Whether this item or one of its children is the current page.
    pub active: bool,
    /// Generated children, absent when the item has no submenu.
    pub submenu: Option<Vec<MenuItem>>,
}

impl MenuItem {
    /// Get a direct child by id.
    pub fn child(&self, id: &str) -> Option<&MenuItem> {
        self.submenu.as_ref()?.iter().find(|item| item.id == id)
    }

    /// Check if the item has at least one child.
    pub fn has_children(&self) -> bool {
        self.submenu.as_ref().is_some_and(|items| !items.is_empty())
    }
}

/// Find an item by a slash separated id path (e.g., `"admin/users"`).
pub fn find_item<'a>(items: &'a [MenuItem], path: &str) -> Option<&'a MenuItem> {
    let mut ids = path.split('/').filter(|s| !s.is_empty());
    let first = ids.next()?;
    let mut current = items.iter().find(|item| item.id == first)?;
    for id in ids {
        current = current.child(id)?;
    }
    Some(current)
}

/// Ids of the active items along the active trail, outermost first.
pub fn active_trail(items: &[MenuItem]) -> Vec<&str> {
    let mut trail = Vec::new();
    let mut level = items;
    while let Some(item) = level.iter().find(|item| item.active) {
        trail.push(item.id.as_str());
        match &item.submenu {
            Some(children) => level = children,
            None => break,
        }
    }
    trail
}
