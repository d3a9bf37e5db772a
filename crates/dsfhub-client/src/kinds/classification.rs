//! Data discovery and classification integration
//!
//! Storage and database details are unordered groups. Each typed group
//! member implements [`CanonicalRecord`] over the same field slice the mapper
//! uses, so a member keeps its key whether it came from a configuration or
//! from a hub response.

use super::{KindSpec, ListingFilter};
use crate::envelope::EnvelopeFamily;
use dsfhub_core::{CanonicalRecord, FieldDef, QueryParam, UnorderedSet};
use serde::{Deserialize, Serialize};

pub const S3_BUCKET_FIELDS: &[FieldDef] = &[
    FieldDef::required_string("bucket_name"),
    FieldDef::default_string("cloud_name", "AWS"),
    FieldDef::required_string("aws_region"),
    FieldDef::optional_string("access_key_id"),
    FieldDef::optional_string("secret_access_key").sensitive(),
];

pub const STORAGE_FIELDS: &[FieldDef] = &[
    FieldDef::default_string("storage_type", "AWS - S3 Bucket"),
    FieldDef::required_group("s3_bucket_configuration", S3_BUCKET_FIELDS),
];

pub const DATABASE_FIELDS: &[FieldDef] = &[
    FieldDef::default_string("database_type", "MongoDB"),
    FieldDef::optional_string("mongo_configuration"),
];

pub const FIELDS: &[FieldDef] = &[
    FieldDef::required_string("type"),
    FieldDef::required_string("display_name"),
    FieldDef::default_string(
        "description",
        "Data discovery and classification service, used to classify all data within your organization.",
    ),
    FieldDef::default_string("status", "N/A"),
    FieldDef::optional_string("last_status_update"),
    FieldDef::optional_group("database_details", DATABASE_FIELDS),
    FieldDef::required_group("storage_details", STORAGE_FIELDS),
];

pub const SPEC: KindSpec = KindSpec {
    name: "classification",
    collection: "classification",
    envelope: EnvelopeFamily::Coded,
    fields: FIELDS,
    write_params: &[QueryParam::SyncType],
    delete_params: &[QueryParam::ForceDelete],
    listing: ListingFilter::HasField("storage_details"),
};

/// Classification-specific attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationAttributes {
    #[serde(default, skip_serializing_if = "UnorderedSet::is_empty")]
    pub database_details: UnorderedSet<DatabaseDetail>,
    pub storage_details: UnorderedSet<StorageDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDetail {
    pub database_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mongo_configuration: Option<String>,
}

impl CanonicalRecord for DatabaseDetail {
    const FIELDS: &'static [FieldDef] = DATABASE_FIELDS;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageDetail {
    pub storage_type: String,
    pub s3_bucket_configuration: UnorderedSet<S3BucketConfiguration>,
}

impl CanonicalRecord for StorageDetail {
    const FIELDS: &'static [FieldDef] = STORAGE_FIELDS;
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct S3BucketConfiguration {
    pub bucket_name: String,
    pub cloud_name: String,
    pub aws_region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
}

impl S3BucketConfiguration {
    pub fn new(bucket_name: impl Into<String>, aws_region: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            cloud_name: "AWS".to_string(),
            aws_region: aws_region.into(),
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

impl CanonicalRecord for S3BucketConfiguration {
    const FIELDS: &'static [FieldDef] = S3_BUCKET_FIELDS;
}

impl std::fmt::Debug for S3BucketConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BucketConfiguration")
            .field("bucket_name", &self.bucket_name)
            .field("cloud_name", &self.cloud_name)
            .field("aws_region", &self.aws_region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
