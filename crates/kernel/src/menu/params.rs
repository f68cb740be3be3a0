//! Dynamic parameters for menu targets and gate rules.
//!
//! A parameter written as `:name` is replaced at generation time by the value
//! registered under `name`. Unregistered names are left as the literal string.

use std::collections::BTreeMap;

use super::Target;

/// Marker that introduces a dynamic parameter.
pub const DYNAMIC_PREFIX: char = ':';

/// Table of dynamic parameter values for one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicParams {
    values: BTreeMap<String, String>,
}

impl DynamicParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Register several values at once.
    pub fn extend<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve a single parameter.
    pub fn resolve(&self, param: &str) -> String {
        param
            .strip_prefix(DYNAMIC_PREFIX)
            .and_then(|name| self.get(name))
            .unwrap_or(param)
            .to_string()
    }

    /// Resolve every parameter of a list.
    pub fn substitute(&self, params: &[String]) -> Vec<String> {
        params.iter().map(|p| self.resolve(p)).collect()
    }

    /// Copy of `target` with its parameters resolved; the name is kept as is.
    pub fn substitute_target(&self, target: &Target) -> Target {
        Target {
            name: target.name.clone(),
            params: self.substitute(&target.params),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DynamicParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_value_replaces_placeholder() {
        let mut params = DynamicParams::new();
        params.set("userId", "42");
        assert_eq!(params.resolve(":userId"), "42");
    }

    #[test]
    fn unregistered_placeholder_kept_literally() {
        let params = DynamicParams::new();
        assert_eq!(params.resolve(":userId"), ":userId");
    }

    #[test]
    fn plain_values_untouched() {
        let params: DynamicParams = [("userId", "42")].into_iter().collect();
        assert_eq!(params.resolve("userId"), "userId");
        assert_eq!(params.resolve("a:userId"), "a:userId");
        assert_eq!(params.resolve(""), "");
    }

    #[test]
    fn substitute_keeps_order() {
        let params: DynamicParams = [("a", "1"), ("b", "2")].into_iter().collect();
        let input = vec![":b".to_string(), "x".to_string(), ":a".to_string(), ":c".to_string()];
        assert_eq!(params.substitute(&input), vec!["2", "x", "1", ":c"]);
    }

    #[test]
    fn substitute_target_keeps_name() {
        let params: DynamicParams = [("id", "7")].into_iter().collect();
        let target = Target::with_params(":id", [":id"]);
        let resolved = params.substitute_target(&target);
        assert_eq!(resolved.name, ":id");
        assert_eq!(resolved.params, vec!["7"]);
    }

    #[test]
    fn later_values_override() {
        let mut params = DynamicParams::new();
        params.set("id", "1");
        params.extend([("id", "2")]);
        assert_eq!(params.get("id"), Some("2"));
        assert_eq!(params.len(), 1);
        params.clear();
        assert!(params.is_empty());
    }
}
