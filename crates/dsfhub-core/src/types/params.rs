//! Query parameters forwarded to the hub

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// How the hub propagates a change to its gateways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncType {
    SyncGwBlocking,
    SyncGwNonBlocking,
    DoNotSyncGw,
}

impl SyncType {
    pub const ALL: [SyncType; 3] = [
        SyncType::SyncGwBlocking,
        SyncType::SyncGwNonBlocking,
        SyncType::DoNotSyncGw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncType::SyncGwBlocking => "SYNC_GW_BLOCKING",
            SyncType::SyncGwNonBlocking => "SYNC_GW_NON_BLOCKING",
            SyncType::DoNotSyncGw => "DO_NOT_SYNC_GW",
        }
    }
}

impl std::fmt::Display for SyncType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SyncType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = SyncType::ALL.iter().map(SyncType::as_str).collect();
                Error::configuration(format!(
                    "Invalid sync_type. Available values: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// A query parameter an operation may forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParam {
    SyncType,
    AcknowledgeDeletionImpact,
    ForceDelete,
}

impl QueryParam {
    /// Name of the parameter on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            QueryParam::SyncType => "syncType",
            QueryParam::AcknowledgeDeletionImpact => "acknowledgeDeletionImpact",
            QueryParam::ForceDelete => "forceDelete",
        }
    }
}

/// Validated query parameter values. `None` means the parameter is never sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub sync_type: Option<SyncType>,
    pub acknowledge_deletion_impact: Option<bool>,
    pub force_delete: Option<bool>,
}

impl QueryParams {
    /// Rendered value of a single parameter, if set
    pub fn value(&self, param: QueryParam) -> Option<String> {
        match param {
            QueryParam::SyncType => self.sync_type.map(|t| t.as_str().to_string()),
            QueryParam::AcknowledgeDeletionImpact => {
                self.acknowledge_deletion_impact.map(|v| v.to_string())
            }
            QueryParam::ForceDelete => self.force_delete.map(|v| v.to_string()),
        }
    }

    /// Wire pairs for the selected parameters, omitting unset ones entirely
    pub fn pairs(&self, selected: &[QueryParam]) -> Vec<(&'static str, String)> {
        selected
            .iter()
            .filter_map(|param| self.value(*param).map(|v| (param.wire_name(), v)))
            .collect()
    }
}
