//! Declarative field schemas describing which attributes a kind accepts

/// Wire type of a field
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    String,
    Int,
    Bool,
    /// Unordered group of nested records with their own field sequence
    Group(&'static [FieldDef]),
}

/// Value applied when an optional scalar is omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_json(self) -> serde_json::Value {
        match self {
            DefaultValue::Str(v) => serde_json::Value::from(v),
            DefaultValue::Int(v) => serde_json::Value::from(v),
            DefaultValue::Bool(v) => serde_json::Value::from(v),
        }
    }
}

/// Whether a field must be supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Default(DefaultValue),
}

/// One declared field of a kind or group.
///
/// The order of `FieldDef`s in a slice is the canonical field sequence used
/// by the hasher.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    pub presence: Presence,
    /// Redacted from request logs
    pub sensitive: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, ty: FieldType, presence: Presence) -> Self {
        Self {
            name,
            ty,
            presence,
            sensitive: false,
        }
    }

    pub const fn required_string(name: &'static str) -> Self {
        Self::new(name, FieldType::String, Presence::Required)
    }

    pub const fn optional_string(name: &'static str) -> Self {
        Self::new(name, FieldType::String, Presence::Optional)
    }

    pub const fn default_string(name: &'static str, value: &'static str) -> Self {
        Self::new(
            name,
            FieldType::String,
            Presence::Default(DefaultValue::Str(value)),
        )
    }

    pub const fn required_int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int, Presence::Required)
    }

    pub const fn default_bool(name: &'static str, value: bool) -> Self {
        Self::new(
            name,
            FieldType::Bool,
            Presence::Default(DefaultValue::Bool(value)),
        )
    }

    pub const fn required_group(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self::new(name, FieldType::Group(fields), Presence::Required)
    }

    pub const fn optional_group(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self::new(name, FieldType::Group(fields), Presence::Optional)
    }

    /// Mark the field as holding a credential
    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.ty, FieldType::Group(_))
    }
}

/// Replace sensitive fields in a mapped record with a placeholder, recursing
/// into groups. Used before logging request bodies.
pub fn redact(fields: &[FieldDef], record: &mut serde_json::Map<String, serde_json::Value>) {
    for field in fields {
        let Some(value) = record.get_mut(field.name) else {
            continue;
        };
        if field.sensitive && !value.is_null() {
            *value = serde_json::Value::from("<redacted>");
            continue;
        }
        if let (FieldType::Group(nested), serde_json::Value::Array(members)) = (field.ty, value) {
            for member in members.iter_mut() {
                if let serde_json::Value::Object(member) = member {
                    redact(nested, member);
                }
            }
        }
    }
}
