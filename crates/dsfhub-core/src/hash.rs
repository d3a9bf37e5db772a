//! Canonical hashing for unordered groups
//!
//! A record is rendered field by field in its declared sequence. Each scalar
//! is written as `<byte length>:<value>-`, so a value containing `-` cannot
//! shift a field boundary. Nested groups contribute `<count>#` followed by the
//! sorted hashes of their members, so the result never depends on the order
//! members were supplied in. The buffer is digested with SHA-256 and the first
//! four bytes are folded into the non-negative `i32` range.
//!
//! The hash is a 31-bit fingerprint, not an identity: callers that key
//! members by it pair it with [`member_identity`] so that two distinct
//! members sharing a hash are both kept.

use crate::types::{FieldDef, FieldType};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt::Write;

const SEPARATOR: char = '-';

/// Stable, non-negative fingerprint of one group record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupHash(u32);

impl GroupHash {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for GroupHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed record that can be hashed canonically.
///
/// `FIELDS` fixes the field sequence; it is normally the same slice the
/// field mapper uses for the record.
pub trait CanonicalRecord: Serialize {
    const FIELDS: &'static [FieldDef];
}

/// Hash a typed record through its serialized form
pub fn canonical_hash<T: CanonicalRecord>(record: &T) -> Result<GroupHash, serde_json::Error> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(hash_record(T::FIELDS, &map)),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "canonical record must serialize to an object, got {}",
            other
        ))),
    }
}

/// Hash a mapped record using the declared field sequence
pub fn hash_record(fields: &[FieldDef], record: &Map<String, Value>) -> GroupHash {
    let mut buffer = String::new();
    write_record(fields, record, &mut buffer);
    positive_hash(&buffer)
}

fn write_record(fields: &[FieldDef], record: &Map<String, Value>, buffer: &mut String) {
    for field in fields {
        let value = record.get(field.name);
        match field.ty {
            FieldType::Group(nested) => {
                let mut members: Vec<(GroupHash, String)> = group_members(value)
                    .map(|member| (hash_record(nested, member), member_identity(member)))
                    .collect();
                members.sort_unstable();
                members.dedup();
                let _ = write!(buffer, "{}#", members.len());
                for (hash, _) in members {
                    let _ = write!(buffer, "{}{}", hash, SEPARATOR);
                }
            }
            _ => {
                render_scalar(value, buffer);
                buffer.push(SEPARATOR);
            }
        }
    }
}

fn group_members(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn render_scalar(value: Option<&Value>, buffer: &mut String) {
    let rendered = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let _ = write!(buffer, "{}:{}", rendered.len(), rendered);
}

/// Structural identity of a mapped member, used to tell apart members whose
/// hashes collide
pub fn member_identity(record: &Map<String, Value>) -> String {
    Value::Object(record.clone()).to_string()
}

/// Digest a buffer and fold it into a non-negative hash
pub fn positive_hash(buffer: &str) -> GroupHash {
    let digest = Sha256::digest(buffer.as_bytes());
    fold(i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

/// Absolute value of a signed hash; `i32::MIN` has no positive counterpart
/// and maps to zero.
fn fold(raw: i32) -> GroupHash {
    GroupHash(raw.checked_abs().map_or(0, i32::unsigned_abs))
}
