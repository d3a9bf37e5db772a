//! Entry point tying configuration, transport and kinds together

use crate::client::{interpret, ResourceClient};
use crate::context::CallContext;
use crate::envelope::EnvelopeFamily;
use crate::kinds::ciphertrust::{self, CiphertrustAttributes};
use crate::kinds::classification::{self, ClassificationAttributes};
use crate::kinds::KindSpec;
use crate::transport::{HttpTransport, HubRequest, Method, Transport};
use dsfhub_core::{Error, HubConfig, HubSettings, Operation, Result, Subject};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Path listing the gateways visible to the token
pub const GATEWAYS_PATH: &str = "gateways";

/// Client for one hub, handing out per-kind resource clients
#[derive(Clone)]
pub struct HubClient {
    config: HubConfig,
    transport: Arc<dyn Transport>,
    context: CallContext,
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("config", &self.config)
            .field("context", &self.context)
            .finish()
    }
}

impl HubClient {
    /// Build a client over HTTP. No request is made until an operation runs.
    pub fn new(config: HubConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Validate raw settings and build a client over HTTP
    pub fn from_settings(settings: HubSettings) -> Result<Self> {
        Self::new(HubConfig::try_from(settings)?)
    }

    pub fn with_transport(config: HubConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            context: CallContext::default(),
        }
    }

    /// A client whose calls, including those of the resource clients it
    /// hands out, run under `context`
    pub fn with_context(&self, context: CallContext) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn ciphertrust(&self) -> ResourceClient<CiphertrustAttributes> {
        self.resource(&ciphertrust::SPEC)
    }

    pub fn classification(&self) -> ResourceClient<ClassificationAttributes> {
        self.resource(&classification::SPEC)
    }

    /// Resource client for any kind described by `spec`
    pub fn resource<A>(&self, spec: &'static KindSpec) -> ResourceClient<A>
    where
        A: Serialize + DeserializeOwned,
    {
        ResourceClient::new(Arc::clone(&self.transport), *self.config.params(), spec)
            .with_context(self.context.clone())
    }

    /// Check the token against the hub by listing its gateways
    pub async fn verify(&self) -> Result<Vec<Value>> {
        info!("Verifying credentials against {}", self.config.base_url());

        let subject = Subject::new(GATEWAYS_PATH, None);
        let request = HubRequest::new(Method::Get, [GATEWAYS_PATH]);
        let response = self
            .context
            .run(self.transport.send(request))
            .await
            .map_err(|e| Error::transport(subject.clone(), Operation::Verify, e.to_string()))?;

        match interpret(EnvelopeFamily::Coded, subject.clone(), Operation::Verify, &response)? {
            None => Ok(Vec::new()),
            Some(Value::Array(gateways)) => Ok(gateways),
            Some(other) => Err(Error::malformed_response(
                subject,
                Operation::Verify,
                "gateway listing is not an array",
                other.to_string().as_bytes(),
            )),
        }
    }
}
