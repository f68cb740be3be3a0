//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::menu::MenuOptions;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Menu file with routes and named menus (default: ./menus.yml).
    pub menus_path: PathBuf,

    /// Application root URL (default: http://localhost:3000).
    pub base_url: String,

    /// CSS class appended to active items (default: "active").
    pub active_class: String,

    /// Whether `url` targets default to https (default: false).
    pub default_secure: bool,

    /// Translation catalog for menu titles. When None, titles are not translated.
    pub translations_path: Option<PathBuf>,

    /// Whether titles are translated when a catalog is available (default: true).
    pub translate_texts: bool,

    /// Whether item access rules are enforced (default: true).
    pub control_access: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let menus_path = env::var("WAYFINDER_MENUS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./menus.yml"));

        let base_url =
            env::var("WAYFINDER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let active_class =
            env::var("WAYFINDER_ACTIVE_CLASS").unwrap_or_else(|_| "active".to_string());

        let default_secure = env_flag("WAYFINDER_DEFAULT_SECURE", false)?;

        let translations_path = env::var("WAYFINDER_TRANSLATIONS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let translate_texts = env_flag("WAYFINDER_TRANSLATE_TEXTS", true)?;
        let control_access = env_flag("WAYFINDER_CONTROL_ACCESS", true)?;

        Ok(Self {
            menus_path,
            base_url,
            active_class,
            default_secure,
            translations_path,
            translate_texts,
            control_access,
        })
    }

    /// Presentation options for menu generators.
    pub fn menu_options(&self) -> MenuOptions {
        MenuOptions {
            active_class: self.active_class.clone(),
            default_secure: self.default_secure,
        }
    }
}

/// Read a boolean environment variable, falling back to `default` when unset.
fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value).with_context(|| format!("{name} must be a boolean")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("invalid boolean value '{other}'"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" YES ").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(!parse_flag("").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn menu_options_from_config() {
        let config = Config {
            menus_path: PathBuf::from("menus.yml"),
            base_url: "http://localhost:3000".to_string(),
            active_class: "current".to_string(),
            default_secure: true,
            translations_path: None,
            translate_texts: true,
            control_access: false,
        };
        let options = config.menu_options();
        assert_eq!(options.active_class, "current");
        assert!(options.default_secure);
    }
}
