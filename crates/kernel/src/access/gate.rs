//! Capability gate and the default access handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{AccessHandler, AccessRules};
use crate::menu::Target;

/// The user a menu is generated for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    /// Whether the user is logged in.
    pub authenticated: bool,
    /// Superusers pass every gate ability.
    pub superuser: bool,
    /// Assigned role names.
    pub roles: Vec<String>,
    /// Granted permission names.
    pub permissions: Vec<String>,
}

impl Subject {
    /// Create a subject for an anonymous visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create a subject for a logged-in user with the given roles.
    pub fn authenticated<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authenticated: true,
            roles: roles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a logged-in superuser.
    pub fn superuser() -> Self {
        Self {
            authenticated: true,
            superuser: true,
            ..Self::default()
        }
    }

    /// Grant permissions.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

type Ability = Box<dyn Fn(&Subject, &[String]) -> bool + Send + Sync>;

/// Named abilities: `name -> predicate(subject, params)`.
///
/// Undefined abilities are denied unless the gate falls back to permissions,
/// in which case an undefined ability is granted when the subject holds a
/// permission of the same name.
#[derive(Default)]
pub struct Gate {
    abilities: HashMap<String, Ability>,
    permission_fallback: bool,
}

impl Gate {
    /// Create a gate without abilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate that maps undefined abilities to subject permissions.
    pub fn permission_based() -> Self {
        Self {
            abilities: HashMap::new(),
            permission_fallback: true,
        }
    }

    /// Define an ability.
    pub fn define<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Subject, &[String]) -> bool + Send + Sync + 'static,
    {
        self.abilities.insert(name.into(), Box::new(predicate));
        self
    }

    /// Check if an ability is defined.
    pub fn has(&self, name: &str) -> bool {
        self.abilities.contains_key(name)
    }

    /// Check if `subject` is allowed the ability named by `rule`.
    pub fn allows(&self, subject: &Subject, rule: &Target) -> bool {
        if subject.superuser {
            return true;
        }

        match self.abilities.get(&rule.name) {
            Some(ability) => ability(subject, &rule.params[..]),
            None if self.permission_fallback => subject.has_permission(&rule.name),
            None => {
                debug!(ability = %rule.name, "undefined gate ability denied");
                false
            }
        }
    }

    /// Inverse of [`allows`](Self::allows).
    pub fn denies(&self, subject: &Subject, rule: &Target) -> bool {
        !self.allows(subject, rule)
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.abilities.keys().collect();
        names.sort();
        f.debug_struct("Gate")
            .field("abilities", &names)
            .field("permission_fallback", &self.permission_fallback)
            .finish()
    }
}

/// [`AccessHandler`] evaluating rules against a [`Gate`] for one [`Subject`].
///
/// Only the first rule present is evaluated, in this order: `logged`,
/// `roles`, `allows`, `check`, `denies`. Items without rules are visible.
#[derive(Debug, Clone)]
pub struct GateAccessHandler {
    gate: Arc<Gate>,
    subject: Subject,
}

impl GateAccessHandler {
    pub fn new(gate: Arc<Gate>, subject: Subject) -> Self {
        Self { gate, subject }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }
}

impl AccessHandler for GateAccessHandler {
    fn check(&self, rules: &AccessRules) -> bool {
        if let Some(logged) = rules.logged {
            return logged == self.subject.authenticated;
        }

        if let Some(roles) = &rules.roles {
            return self.subject.authenticated && roles.iter().any(|r| self.subject.has_role(r));
        }

        if let Some(rule) = &rules.allows {
            return self.gate.allows(&self.subject, rule);
        }

        if let Some(rule) = &rules.check {
            return self.gate.allows(&self.subject, rule);
        }

        if let Some(rule) = &rules.denies {
            return self.gate.denies(&self.subject, rule);
        }

        true
    }
}
