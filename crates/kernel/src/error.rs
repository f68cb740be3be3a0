//! Menu error types.

use thiserror::Error;

use crate::routing::UrlError;

/// Errors raised while loading, generating or rendering menus.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("url resolution failed: {0}")]
    Url(#[from] UrlError),

    #[error("unknown menu: {0}")]
    UnknownMenu(String),

    #[error("menu nesting exceeds {max} levels at item '{id}'")]
    TooDeep { id: String, max: usize },

    #[error("invalid menu configuration: {0}")]
    Config(String),

    #[error("failed to render menu: {0}")]
    Render(#[from] tera::Error),
}

/// Result type alias using MenuError.
pub type MenuResult<T> = Result<T, MenuError>;
