//! URL resolution for menu targets.
//!
//! Menu items point at plain paths, named routes or controller actions. The
//! generator never builds URLs itself; it delegates to a [`UrlResolver`]:
//! - `to` for paths (with an explicit secure flag)
//! - `route` for named routes
//! - `action` for named actions
//!
//! [`RouteUrlResolver`] is the in-process implementation backed by a
//! [`RouteTable`] loaded from the menu configuration file.

mod resolver;

pub use resolver::{RouteTable, RouteUrlResolver};

use thiserror::Error;

/// Errors raised while resolving a menu target into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("missing parameter '{param}' for '{name}'")]
    MissingParameter { name: String, param: String },

    #[error("invalid base url '{url}': {reason}")]
    InvalidBase { url: String, reason: String },
}

/// Resolves menu targets into absolute URLs.
pub trait UrlResolver: Send + Sync {
    /// URL of the page currently being viewed.
    fn current(&self) -> String;

    /// Root URL of the application, equivalent to `to("", [], false)`.
    fn base(&self) -> String;

    /// Build a URL for a plain path, appending `params` as path segments.
    fn to(&self, path: &str, params: &[String], secure: bool) -> Result<String, UrlError>;

    /// Build a URL for a named route.
    fn route(&self, name: &str, params: &[String]) -> Result<String, UrlError>;

    /// Build a URL for a named controller action.
    fn action(&self, name: &str, params: &[String]) -> Result<String, UrlError>;
}
