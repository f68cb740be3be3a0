//! Route table backed URL resolver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use super::{UrlError, UrlResolver};

/// Prefixes that mark a path as already absolute; `to` returns these untouched.
const ABSOLUTE_PREFIXES: &[&str] = &["http://", "https://", "//", "#", "mailto:", "tel:", "sms:"];

/// Named route and action patterns.
///
/// Patterns are slash separated paths whose placeholder segments are written
/// either as `:name` or `{name}`; `{name?}` marks an optional placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Route name -> path pattern (e.g., "users.show" -> "/users/:id").
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
    /// Action name -> path pattern (e.g., "UserController@index" -> "/users").
    #[serde(default)]
    pub actions: BTreeMap<String, String>,
}

impl RouteTable {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named route.
    pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.routes.insert(name.into(), pattern.into());
        self
    }

    /// Add a named action.
    pub fn with_action(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.actions.insert(name.into(), pattern.into());
        self
    }

    /// Check if the table has neither routes nor actions.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.actions.is_empty()
    }
}

/// [`UrlResolver`] that builds absolute URLs from a base URL and a [`RouteTable`].
#[derive(Debug, Clone)]
pub struct RouteUrlResolver {
    base: Url,
    current: Option<String>,
    table: RouteTable,
}

impl RouteUrlResolver {
    /// Create a resolver rooted at `base_url`.
    pub fn new(base_url: &str, table: RouteTable) -> Result<Self, UrlError> {
        let base = Url::parse(base_url).map_err(|e| UrlError::InvalidBase {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(UrlError::InvalidBase {
                url: base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }

        Ok(Self {
            base,
            current: None,
            table,
        })
    }

    /// Set the URL of the page being viewed (defaults to the base URL).
    pub fn with_current(mut self, current: impl Into<String>) -> Self {
        self.current = Some(current.into());
        self
    }

    /// Get the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Root URL without a trailing slash, switched to https when `secure`.
    fn root(&self, secure: bool) -> String {
        let mut base = self.base.clone();
        if secure && base.set_scheme("https").is_err() {
            warn!(base = %self.base, "cannot switch base url to https");
        }
        base.set_query(None);
        base.set_fragment(None);
        base.as_str().trim_end_matches('/').to_string()
    }
}

impl UrlResolver for RouteUrlResolver {
    fn current(&self) -> String {
        self.current.clone().unwrap_or_else(|| self.root(false))
    }

    fn base(&self) -> String {
        self.root(false)
    }

    fn to(&self, path: &str, params: &[String], secure: bool) -> Result<String, UrlError> {
        if ABSOLUTE_PREFIXES.iter().any(|p| path.starts_with(p)) {
            return Ok(path.to_string());
        }

        let mut segments = split_segments(path);
        segments.extend(params.iter().map(|p| urlencoding::encode(p).into_owned()));
        Ok(join(&self.root(secure), &segments))
    }

    fn route(&self, name: &str, params: &[String]) -> Result<String, UrlError> {
        let pattern = self
            .table
            .routes
            .get(name)
            .ok_or_else(|| UrlError::UnknownRoute(name.to_string()))?;

        let segments = fill_pattern(name, pattern, params)?;
        Ok(join(&self.root(false), &segments))
    }

    fn action(&self, name: &str, params: &[String]) -> Result<String, UrlError> {
        let pattern = self
            .table
            .actions
            .get(name)
            .ok_or_else(|| UrlError::UnknownAction(name.to_string()))?;

        let segments = fill_pattern(name, pattern, params)?;
        Ok(join(&self.root(false), &segments))
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn join(root: &str, segments: &[String]) -> String {
    if segments.is_empty() {
        root.to_string()
    } else {
        format!("{root}/{}", segments.join("/"))
    }
}

/// Parse a placeholder segment into its name and whether it is optional.
fn placeholder(segment: &str) -> Option<(&str, bool)> {
    if let Some(name) = segment.strip_prefix(':') {
        return Some((name, false));
    }

    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    match inner.strip_suffix('?') {
        Some(name) => Some((name, true)),
        None => Some((inner, false)),
    }
}

/// Fill placeholders of `pattern` with positional `params`.
///
/// Parameters left over once every placeholder is filled are appended as
/// extra path segments.
fn fill_pattern(name: &str, pattern: &str, params: &[String]) -> Result<Vec<String>, UrlError> {
    let mut remaining = params.iter();
    let mut segments = Vec::new();

    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        let Some((param, optional)) = placeholder(segment) else {
            segments.push(segment.to_string());
            continue;
        };

        match remaining.next() {
            Some(value) => segments.push(urlencoding::encode(value).into_owned()),
            None if optional => {}
            None => {
                return Err(UrlError::MissingParameter {
                    name: name.to_string(),
                    param: param.to_string(),
                });
            }
        }
    }

    segments.extend(remaining.map(|v| urlencoding::encode(v).into_owned()));
    Ok(segments)
}
