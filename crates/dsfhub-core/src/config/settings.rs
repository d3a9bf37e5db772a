//! Raw hub settings with layered loading
//!
//! Settings are gathered with the following precedence (low to high):
//! 1. Values set in code (`HubSettings::default()` plus field assignment)
//! 2. Settings file (dsfhub.yaml / dsfhub.yml, searched upwards from the cwd)
//! 3. Environment variables (DSFHUB_* prefix)
//!
//! Nothing here validates; see [`HubConfig`](super::HubConfig).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file names, in search order
const SETTINGS_FILE_NAMES: &[&str] = &["dsfhub.yaml", "dsfhub.yml"];

pub const ENV_HOST: &str = "DSFHUB_HOST";
pub const ENV_TOKEN: &str = "DSFHUB_TOKEN";
pub const ENV_INSECURE_SSL: &str = "DSFHUB_INSECURE_SSL";
pub const ENV_SYNC_TYPE: &str = "DSFHUB_SYNC_TYPE";
pub const ENV_ACKNOWLEDGE_DELETION_IMPACT: &str = "DSFHUB_ACKNOWLEDGE_DELETION_IMPACT";
pub const ENV_FORCE_DELETE: &str = "DSFHUB_FORCE_DELETE";

/// Unvalidated hub connection settings
///
/// The deletion flags are kept as raw values so that a YAML boolean or a
/// number can be reported as a configuration error instead of being coerced.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    /// Hub host or API endpoint, with or without scheme
    pub host: String,

    /// API token sent as a bearer credential
    pub token: String,

    /// Skip TLS certificate verification (lab endpoints only)
    pub insecure_ssl: bool,

    pub sync_type: Option<String>,

    pub acknowledge_deletion_impact: Option<Value>,

    pub force_delete: Option<Value>,

    /// API base path appended to a host given without a path
    pub base_path: Option<String>,

    /// Whole-request timeout applied by the transport
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for HubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSettings")
            .field("host", &self.host)
            .field("token", &redacted(&self.token))
            .field("insecure_ssl", &self.insecure_ssl)
            .field("sync_type", &self.sync_type)
            .field("acknowledge_deletion_impact", &self.acknowledge_deletion_impact)
            .field("force_delete", &self.force_delete)
            .field("base_path", &self.base_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

pub(crate) fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl HubSettings {
    /// Load settings from the given file, or search for one, then apply
    /// environment overrides. A missing search result is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::find_settings_file()? {
                Some(found) => Self::from_file(&found)?,
                None => {
                    debug!("No settings file found, using environment only");
                    Self::default()
                }
            },
        };

        settings.with_env_overrides()
    }

    /// Parse a YAML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::configuration(format!("Settings file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        debug!("Loading hub settings from {}", path.display());
        let settings: HubSettings = serde_yaml_ng::from_str(&content)?;
        Ok(settings)
    }

    /// Settings taken from the environment alone
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Overlay DSFHUB_* environment variables. Empty values are ignored.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(val) = env_value(ENV_HOST) {
            self.host = val;
        }

        if let Some(val) = env_value(ENV_TOKEN) {
            self.token = val;
        }

        if let Some(val) = env_value(ENV_INSECURE_SSL) {
            self.insecure_ssl = match val.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(Error::configuration(format!(
                        "{} must be 'true' or 'false', got '{}'",
                        ENV_INSECURE_SSL, val
                    )))
                }
            };
        }

        if let Some(val) = env_value(ENV_SYNC_TYPE) {
            self.sync_type = Some(val);
        }

        // Environment values are always strings, so they go through the same
        // flag validation as a quoted YAML value
        if let Some(val) = env_value(ENV_ACKNOWLEDGE_DELETION_IMPACT) {
            self.acknowledge_deletion_impact = Some(Value::String(val));
        }

        if let Some(val) = env_value(ENV_FORCE_DELETE) {
            self.force_delete = Some(Value::String(val));
        }

        Ok(self)
    }

    /// Find a settings file in the current directory or its parents
    fn find_settings_file() -> Result<Option<PathBuf>> {
        let cwd = env::current_dir()?;
        let mut current = cwd.as_path();

        loop {
            for name in SETTINGS_FILE_NAMES {
                let path = current.join(name);
                if path.is_file() {
                    return Ok(Some(path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
