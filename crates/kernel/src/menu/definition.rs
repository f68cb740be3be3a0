//! Declarative menu item definitions.
//!
//! A menu is an ordered mapping of item id -> [`MenuItemSpec`]. Definitions
//! are usually deserialized from a YAML, JSON or TOML file; sibling order in
//! the source document is preserved.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// A name followed by positional parameters.
///
/// Used for `url`, `route` and `action` targets and for gate rules
/// (`allows`, `check`, `denies`). In configuration it is written either as a
/// bare string (`route: home`) or as a sequence whose first element is the
/// name (`route: [users.show, ":userId"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub params: Vec<String>,
}

impl Target {
    /// Create a target without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Create a target with positional parameters.
    pub fn with_params<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.params.is_empty() {
            return serializer.serialize_str(&self.name);
        }

        let mut seq = serializer.serialize_seq(Some(self.params.len() + 1))?;
        seq.serialize_element(&self.name)?;
        for param in &self.params {
            seq.serialize_element(param)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TargetVisitor;

        impl<'de> Visitor<'de> for TargetVisitor {
            type Value = Target;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a name or a sequence of a name followed by parameters")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Target, E> {
                Ok(Target::new(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Target, A::Error> {
                let Some(Scalar(name)) = seq.next_element::<Scalar>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };

                let mut params = Vec::new();
                while let Some(Scalar(param)) = seq.next_element::<Scalar>()? {
                    params.push(param);
                }

                Ok(Target { name, params })
            }
        }

        deserializer.deserialize_any(TargetVisitor)
    }
}

/// A scalar config value (string, number or boolean) read as a string.
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// One menu item as written in configuration.
///
/// The id is not part of the definition; it is the key the item is stored
/// under in its parent [`MenuItems`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItemSpec {
    /// Literal title; when absent the title is translated or derived from the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Absolute URL used verbatim.
    #[serde(default, alias = "fullUrl", skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// Application path resolved through `UrlResolver::to`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Target>,

    /// Named route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Target>,

    /// Named controller action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Target>,

    /// Per-item override of the generator's default secure flag (`url` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,

    /// Only mark the item active on an exact URL match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,

    /// Extra CSS classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Gate ability the current user must be allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows: Option<Target>,

    /// Gate ability checked like `allows`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<Target>,

    /// Gate ability the current user must be denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denies: Option<Target>,

    /// Roles allowed to see the item (a single role or a list).
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub roles: Option<Vec<String>>,

    /// Required authentication state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged: Option<bool>,

    /// Nested items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<MenuItems>,
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(role) => vec![role],
            OneOrMany::Many(roles) => roles,
        }),
    )
}

/// Ordered mapping of item id -> definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItems(Vec<(String, MenuItemSpec)>);

impl MenuItems {
    /// Create an empty item list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, replacing (in place) any sibling with the same id.
    pub fn insert(&mut self, id: impl Into<String>, spec: MenuItemSpec) {
        let id = id.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = spec,
            None => self.0.push((id, spec)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<String>, spec: MenuItemSpec) -> Self {
        self.insert(id, spec);
        self
    }

    /// Get an item by id.
    pub fn get(&self, id: &str) -> Option<&MenuItemSpec> {
        self.0
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, spec)| spec)
    }

    /// Iterate items in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MenuItemSpec)> {
        self.0.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    /// Item ids in declaration order.
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, MenuItemSpec)> for MenuItems {
    fn from_iter<I: IntoIterator<Item = (K, MenuItemSpec)>>(iter: I) -> Self {
        let mut items = Self::new();
        for (id, spec) in iter {
            items.insert(id, spec);
        }
        items
    }
}

impl Serialize for MenuItems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, spec) in &self.0 {
            map.serialize_entry(id, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MenuItems {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemsVisitor;

        impl<'de> Visitor<'de> for ItemsVisitor {
            type Value = MenuItems;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of menu item ids to item definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<MenuItems, A::Error> {
                let mut items = MenuItems::new();
                while let Some((Scalar(id), spec)) = map.next_entry::<Scalar, MenuItemSpec>()? {
                    items.insert(id, spec);
                }
                Ok(items)
            }

            // An empty list is accepted as an empty menu.
            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<MenuItems, A::Error> {
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_type(de::Unexpected::Seq, &self));
                }
                Ok(MenuItems::new())
            }
        }

        deserializer.deserialize_any(ItemsVisitor)
    }
}
