//! Caller-supplied, loosely-typed description of a resource instance

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Scalar {
    /// Name of the value's type, used in schema violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "integer",
            Scalar::String(_) => "string",
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<u16> for Scalar {
    fn from(value: u16) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Flat scalar attributes plus named unordered groups of nested records.
///
/// Group members are themselves `Configuration`s, so groups nest to any
/// depth. Member order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Configuration {
    scalars: BTreeMap<String, Scalar>,
    groups: BTreeMap<String, Vec<Configuration>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar attribute, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an unordered group, builder style
    pub fn with_group(
        mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = Configuration>,
    ) -> Self {
        self.set_group(name, members);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        self.groups.remove(&name);
        self.scalars.insert(name, value.into());
    }

    pub fn set_group(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = Configuration>,
    ) {
        let name = name.into();
        self.scalars.remove(&name);
        self.groups.insert(name, members.into_iter().collect());
    }

    pub fn scalar(&self, name: &str) -> Option<&Scalar> {
        self.scalars.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&[Configuration]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scalars.contains_key(name) || self.groups.contains_key(name)
    }

    /// Names of every attribute and group present
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scalars
            .keys()
            .chain(self.groups.keys())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.groups.is_empty()
    }
}

impl TryFrom<serde_json::Value> for Configuration {
    type Error = Error;

    /// Objects become configurations, arrays of objects become groups and
    /// nulls are treated as absent attributes.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        from_json_value(value, "")
    }
}

fn from_json_value(value: serde_json::Value, path: &str) -> Result<Configuration, Error> {
    use serde_json::Value;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(Error::schema_violation(
                display_path(path),
                format!("expected an object, found {}", other),
            ))
        }
    };

    let mut config = Configuration::new();
    for (name, value) in object {
        let field_path = join_path(path, &name);
        match value {
            Value::Null => {}
            Value::Bool(v) => config.set(name, v),
            Value::String(v) => config.set(name, v),
            Value::Number(n) => match n.as_i64() {
                Some(v) => config.set(name, v),
                None => {
                    return Err(Error::schema_violation(
                        field_path,
                        format!("unsupported number {}", n),
                    ))
                }
            },
            Value::Array(items) => {
                let members = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| from_json_value(item, &format!("{}[{}]", field_path, i)))
                    .collect::<Result<Vec<_>, _>>()?;
                config.set_group(name, members);
            }
            Value::Object(_) => {
                let member = from_json_value(value, &format!("{}[0]", field_path))?;
                config.set_group(name, [member]);
            }
        }
    }
    Ok(config)
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
