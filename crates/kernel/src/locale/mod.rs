//! Interface string translation for menu titles.
//!
//! Titles without a literal value are looked up under `menu.<id>`. A
//! [`Translator`] signals a missing translation by echoing the key back.

use std::path::Path;

use anyhow::{Context, Result};
use dashmap::DashMap;
use serde_json::Value;
use tracing::info;

/// Looks up localized strings by key.
pub trait Translator: Send + Sync {
    /// Translation for `key`, or `key` itself when none exists.
    fn get(&self, key: &str) -> String;
}

/// In-memory translation catalog keyed by dotted paths (`menu.home`).
#[derive(Default)]
pub struct CatalogTranslator {
    catalog: DashMap<String, String>,
}

impl CatalogTranslator {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML or JSON file.
    ///
    /// Nested mappings flatten into dotted keys, so `menu: {home: Inicio}`
    /// provides `menu.home`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read translations from {}", path.display()))?;

        let value: Value = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&source)
                .with_context(|| format!("invalid JSON in {}", path.display()))?,
            _ => serde_yml::from_str(&source)
                .with_context(|| format!("invalid YAML in {}", path.display()))?,
        };

        let translator = Self::from_value(&value);
        info!(path = %path.display(), count = translator.len(), "loaded menu translations");
        Ok(translator)
    }

    /// Build a catalog from an already parsed document.
    pub fn from_value(value: &Value) -> Self {
        let translator = Self::new();
        flatten_into(&translator.catalog, "", value);
        translator
    }

    /// Add or replace a translation.
    pub fn insert(&self, key: impl Into<String>, translation: impl Into<String>) {
        self.catalog.insert(key.into(), translation.into());
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn get(&self, key: &str) -> String {
        self.catalog
            .get(key)
            .map(|translation| translation.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CatalogTranslator {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let translator = Self::new();
        for (key, translation) in iter {
            translator.insert(key, translation);
        }
        translator
    }
}

impl std::fmt::Debug for CatalogTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogTranslator")
            .field("catalog_size", &self.catalog.len())
            .finish()
    }
}

fn flatten_into(catalog: &DashMap<String, String>, prefix: &str, value: &Value) {
    let key = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        }
    };

    match value {
        Value::Object(map) => {
            for (name, child) in map {
                flatten_into(catalog, &key(name), child);
            }
        }
        Value::String(s) => {
            catalog.insert(prefix.to_string(), s.clone());
        }
        Value::Number(n) => {
            catalog.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            catalog.insert(prefix.to_string(), b.to_string());
        }
        Value::Null | Value::Array(_) => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_echoed() {
        let translator = CatalogTranslator::new();
        assert_eq!(translator.get("menu.home"), "menu.home");
    }

    #[test]
    fn inserted_translation_returned() {
        let translator: CatalogTranslator = [("menu.home", "Inicio")].into_iter().collect();
        assert_eq!(translator.get("menu.home"), "Inicio");
        assert_eq!(translator.len(), 1);
    }

    #[test]
    fn nested_documents_flatten_to_dotted_keys() {
        let value: Value = serde_yml::from_str(
            "menu:\n  home: Inicio\n  admin:\n    users: Usuarios\n  count: 3\n  empty: ~\n",
        )
        .unwrap();
        let translator = CatalogTranslator::from_value(&value);

        assert_eq!(translator.get("menu.home"), "Inicio");
        assert_eq!(translator.get("menu.admin.users"), "Usuarios");
        assert_eq!(translator.get("menu.count"), "3");
        assert_eq!(translator.get("menu.empty"), "menu.empty");
        assert_eq!(translator.len(), 3);
    }

    #[test]
    fn top_level_scalar_ignored() {
        let translator = CatalogTranslator::from_value(&Value::Array(vec![]));
        assert!(translator.is_empty());
    }
}
