//! Integration kind metadata
//!
//! A [`KindSpec`] is everything the generic resource client needs to know
//! about one kind of integration: where it lives, which envelope shape its
//! endpoints answer with, which fields its payload accepts and which query
//! parameters each operation forwards.

pub mod ciphertrust;
pub mod classification;

use crate::envelope::EnvelopeFamily;
use dsfhub_core::{FieldDef, QueryParam};
use serde_json::Value;

/// Static description of one integration kind
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    /// Name used in logs and errors
    pub name: &'static str,
    /// Collection path segment, e.g. `classification`
    pub collection: &'static str,
    pub envelope: EnvelopeFamily,
    /// Payload schema used by the field mapper and for log redaction
    pub fields: &'static [FieldDef],
    /// Parameters forwarded on create and update
    pub write_params: &'static [QueryParam],
    /// Parameters forwarded on delete
    pub delete_params: &'static [QueryParam],
    /// Which entries of the shared listing belong to this kind
    pub listing: ListingFilter,
}

/// Client-side filter over the heterogeneous bulk listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFilter {
    /// Keep every entry
    All,
    /// Keep entries whose `type` equals the value
    TypeEquals(&'static str),
    /// Keep entries carrying a non-null field
    HasField(&'static str),
}

impl ListingFilter {
    pub fn matches(&self, entry: &Value) -> bool {
        match self {
            ListingFilter::All => entry.is_object(),
            ListingFilter::TypeEquals(expected) => {
                entry.get("type").and_then(Value::as_str) == Some(*expected)
            }
            ListingFilter::HasField(field) => entry.get(*field).is_some_and(|v| !v.is_null()),
        }
    }
}
