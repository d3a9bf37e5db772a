//! # dsfhub-core
//!
//! Core library for the DSF Hub integration client providing:
//! - Hub settings loading (dsfhub.yaml, environment) and validation
//! - The error taxonomy shared by every integration kind
//! - Loosely-typed resource `Configuration` and declarative field schemas
//! - Field mapping from a `Configuration` into a kind-specific payload
//! - Canonical, order-independent hashing for unordered groups

pub mod config;
pub mod error;
pub mod hash;
pub mod mapper;
pub mod types;

pub use config::{HubConfig, HubSettings};
pub use error::{Error, Operation, Result, Subject};
pub use hash::{canonical_hash, hash_record, CanonicalRecord, GroupHash};
pub use mapper::map_fields;
pub use types::{
    Configuration, FieldDef, FieldType, Presence, QueryParam, QueryParams, Scalar, SyncType,
    UnorderedSet,
};
