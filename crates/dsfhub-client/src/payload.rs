//! Typed resource payloads

use serde::{Deserialize, Serialize};

/// A resource as submitted to or returned by the hub
///
/// The common attributes every kind carries sit here; kind-specific ones are
/// flattened in from `A`. `id` is only ever assigned by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePayload<A> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status_update: Option<String>,

    #[serde(flatten)]
    pub attributes: A,
}

impl<A> ResourcePayload<A> {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Same payload without its identifier, as sent on create and update
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }
}
