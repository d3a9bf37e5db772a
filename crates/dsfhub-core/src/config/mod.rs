//! Hub settings loading and validation

mod hub;
mod settings;

pub use hub::{HubConfig, DEFAULT_BASE_PATH};
pub use settings::{
    HubSettings, ENV_ACKNOWLEDGE_DELETION_IMPACT, ENV_FORCE_DELETE, ENV_HOST, ENV_INSECURE_SSL,
    ENV_SYNC_TYPE, ENV_TOKEN,
};
