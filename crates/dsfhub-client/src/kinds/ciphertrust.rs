//! Thales CipherTrust Manager integration

use super::{KindSpec, ListingFilter};
use crate::envelope::EnvelopeFamily;
use dsfhub_core::{FieldDef, QueryParam};
use serde::{Deserialize, Serialize};

pub const CIPHERTRUST_TYPE: &str = "CipherTrust Manager";

pub const FIELDS: &[FieldDef] = &[
    FieldDef::default_string("type", CIPHERTRUST_TYPE),
    FieldDef::default_string(
        "description",
        "Used for integrating with Thales CipherTrust Manager capabilities.",
    ),
    FieldDef::default_string("status", "N/A"),
    FieldDef::optional_string("display_name"),
    FieldDef::optional_string("last_status_update"),
    FieldDef::required_string("hostname"),
    FieldDef::required_int("port"),
    FieldDef::optional_string("username"),
    FieldDef::optional_string("password").sensitive(),
    FieldDef::required_string("cm_name"),
    FieldDef::default_bool("is_load_balancer", false),
    FieldDef::required_string("auth_method"),
    FieldDef::optional_string("registration_token").sensitive(),
];

pub const SPEC: KindSpec = KindSpec {
    name: "ciphertrust",
    collection: "ciphertrust",
    envelope: EnvelopeFamily::Coded,
    fields: FIELDS,
    write_params: &[QueryParam::SyncType],
    delete_params: &[QueryParam::AcknowledgeDeletionImpact],
    listing: ListingFilter::TypeEquals(CIPHERTRUST_TYPE),
};

/// CipherTrust-specific attributes
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CiphertrustAttributes {
    pub hostname: String,
    pub port: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub cm_name: String,
    #[serde(default)]
    pub is_load_balancer: bool,
    pub auth_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_token: Option<String>,
}

impl std::fmt::Debug for CiphertrustAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("CiphertrustAttributes")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &secret(&self.password))
            .field("cm_name", &self.cm_name)
            .field("is_load_balancer", &self.is_load_balancer)
            .field("auth_method", &self.auth_method)
            .field("registration_token", &secret(&self.registration_token))
            .finish()
    }
}
