//! Validated hub configuration

use super::settings::{redacted, HubSettings};
use crate::error::{Error, Result};
use crate::types::{QueryParams, SyncType};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// API base path used when the host carries no path of its own
pub const DEFAULT_BASE_PATH: &str = "/dsf/api/v2";

/// Hub connection configuration, validated once and read-only afterwards
#[derive(Clone, PartialEq)]
pub struct HubConfig {
    base_url: Url,
    token: String,
    insecure_tls: bool,
    params: QueryParams,
    timeout: Option<Duration>,
}

impl HubConfig {
    /// API root every kind path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn insecure_tls(&self) -> bool {
        self.insecure_tls
    }

    /// Query parameter values forwarded by operations that accept them
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl std::fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &redacted(&self.token))
            .field("insecure_tls", &self.insecure_tls)
            .field("params", &self.params)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TryFrom<HubSettings> for HubConfig {
    type Error = Error;

    fn try_from(settings: HubSettings) -> Result<Self> {
        let token = settings.token.trim();
        if token.is_empty() {
            return Err(Error::configuration("DSF HUB API Token must be provided"));
        }

        let host = settings.host.trim();
        if host.is_empty() {
            return Err(Error::configuration(
                "DSF HUB host/API endpoint must be provided",
            ));
        }

        let base_path = settings.base_path.as_deref().unwrap_or(DEFAULT_BASE_PATH);
        let base_url = parse_base_url(host, base_path)?;

        let sync_type = settings
            .sync_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<SyncType>)
            .transpose()?;

        let params = QueryParams {
            sync_type,
            acknowledge_deletion_impact: parse_flag(
                "acknowledge_deletion_impact",
                settings.acknowledge_deletion_impact.as_ref(),
            )?,
            force_delete: parse_flag("force_delete", settings.force_delete.as_ref())?,
        };

        let timeout = match settings.timeout_secs {
            Some(0) => {
                return Err(Error::configuration(
                    "timeout_secs must be greater than zero; leave it unset for no timeout",
                ))
            }
            secs => secs.map(Duration::from_secs),
        };

        Ok(Self {
            base_url,
            token: token.to_string(),
            insecure_tls: settings.insecure_ssl,
            params,
            timeout,
        })
    }
}

fn parse_base_url(host: &str, base_path: &str) -> Result<Url> {
    let candidate = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };

    let mut url = Url::parse(&candidate).map_err(|e| {
        Error::configuration(format!("Invalid DSF HUB host '{}': {}", host, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "DSF HUB host must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.path().trim_matches('/').is_empty() {
        url.set_path(base_path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Deletion flags must be the strings "true" or "false"; an unset or empty
/// value means the parameter is never sent.
fn parse_flag(name: &str, value: Option<&Value>) -> Result<Option<bool>> {
    let invalid = || {
        Error::configuration(format!(
            "{} must be a string value of 'true' or 'false'",
            name
        ))
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<bool>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
