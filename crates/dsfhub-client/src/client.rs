//! Generic resource client
//!
//! One [`ResourceClient`] serves every integration kind. The kind's
//! [`KindSpec`] supplies the collection path, envelope shape, field schema
//! and query parameter selection; `A` is the typed kind-specific part of the
//! payload.
//!
//! Error classification for a single response:
//! - transport failure, deadline or cancellation: `Transport`
//! - HTTP 404, or an envelope code of 404, on an item path: `NotFound`
//! - body that is not an envelope: `MalformedResponse` (or `Api` when the
//!   HTTP status already declared failure)
//! - envelope failure, or a non-2xx status with a well-formed body: `Api`

use crate::context::CallContext;
use crate::envelope::{self, EnvelopeFamily, Verdict};
use crate::kinds::KindSpec;
use crate::payload::ResourcePayload;
use crate::transport::{HubRequest, Method, RawResponse, Transport};
use dsfhub_core::types::redact;
use dsfhub_core::{
    map_fields, Configuration, Error, FieldDef, Operation, QueryParams, Result, Subject,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared bulk listing path
pub const LISTING_PATH: &str = "get-config";

/// The shared listing answers in the coded shape whatever kind asks
pub const LISTING_ENVELOPE: EnvelopeFamily = EnvelopeFamily::Coded;

/// Create, read, update and delete resources of one kind
pub struct ResourceClient<A> {
    transport: Arc<dyn Transport>,
    params: QueryParams,
    spec: &'static KindSpec,
    context: CallContext,
    _attributes: PhantomData<fn() -> A>,
}

impl<A> Clone for ResourceClient<A> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            params: self.params,
            spec: self.spec,
            context: self.context.clone(),
            _attributes: PhantomData,
        }
    }
}

impl<A> std::fmt::Debug for ResourceClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("kind", &self.spec.name)
            .field("params", &self.params)
            .field("context", &self.context)
            .finish()
    }
}

impl<A> ResourceClient<A>
where
    A: Serialize + DeserializeOwned,
{
    pub fn new(transport: Arc<dyn Transport>, params: QueryParams, spec: &'static KindSpec) -> Self {
        Self {
            transport,
            params,
            spec,
            context: CallContext::default(),
            _attributes: PhantomData,
        }
    }

    pub fn spec(&self) -> &'static KindSpec {
        self.spec
    }

    /// A client whose calls run under `context`
    pub fn with_context(&self, context: CallContext) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }

    /// Map a loosely-typed configuration into this kind's payload
    pub fn map(&self, config: &Configuration) -> Result<ResourcePayload<A>> {
        let mapped = map_fields(self.spec.fields, config)?;
        serde_json::from_value(Value::Object(mapped)).map_err(|e| {
            Error::schema_violation(self.spec.name, format!("mapped payload rejected: {}", e))
        })
    }

    /// Create a resource; the returned payload carries the hub-assigned id
    pub async fn create(&self, payload: &ResourcePayload<A>) -> Result<ResourcePayload<A>> {
        info!(
            "Creating {} '{}'",
            self.spec.name,
            payload.display_name.as_deref().unwrap_or("<unnamed>")
        );

        let body = self.encode(payload)?;
        let request = HubRequest::new(Method::Post, [self.spec.collection])
            .with_query(self.params.pairs(self.spec.write_params))
            .with_body(body);

        let data = self.call(Operation::Create, None, request).await?;
        let created = self.require_payload(Operation::Create, None, data)?;
        if created.id().is_none() {
            return Err(Error::malformed_response(
                self.subject(None),
                Operation::Create,
                "created resource carries no identifier",
                &[],
            ));
        }
        Ok(created)
    }

    /// Map `config` and create the resulting payload
    pub async fn create_from(&self, config: &Configuration) -> Result<ResourcePayload<A>> {
        let payload = self.map(config)?;
        self.create(&payload).await
    }

    pub async fn read(&self, id: &str) -> Result<ResourcePayload<A>> {
        info!("Reading {} '{}'", self.spec.name, id);

        let request = HubRequest::new(Method::Get, [self.spec.collection, id]);
        let data = self.call(Operation::Read, Some(id), request).await?;
        self.require_payload(Operation::Read, Some(id), data)
    }

    /// List this kind's resources from the shared listing
    pub async fn read_all(&self) -> Result<Vec<ResourcePayload<A>>> {
        info!("Reading all {} resources", self.spec.name);

        let request = HubRequest::new(Method::Get, [LISTING_PATH]);
        let entries = match self.call(Operation::ReadAll, None, request).await? {
            None => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(Error::malformed_response(
                    self.subject(None),
                    Operation::ReadAll,
                    "listing data is not an array",
                    other.to_string().as_bytes(),
                ))
            }
        };

        let total = entries.len();
        let mut resources = Vec::new();
        for entry in entries {
            if !self.spec.listing.matches(&entry) {
                continue;
            }
            match serde_json::from_value::<ResourcePayload<A>>(entry) {
                Ok(resource) => resources.push(resource),
                Err(e) => warn!("Skipping {} listing entry: {}", self.spec.name, e),
            }
        }

        debug!(
            "Kept {} of {} listing entries for {}",
            resources.len(),
            total,
            self.spec.name
        );
        Ok(resources)
    }

    /// Replace a resource with the full payload
    pub async fn update(&self, id: &str, payload: &ResourcePayload<A>) -> Result<ResourcePayload<A>> {
        info!("Updating {} '{}'", self.spec.name, id);

        let body = self.encode(payload)?;
        let request = HubRequest::new(Method::Put, [self.spec.collection, id])
            .with_query(self.params.pairs(self.spec.write_params))
            .with_body(body);

        let data = self.call(Operation::Update, Some(id), request).await?;
        self.require_payload(Operation::Update, Some(id), data)
    }

    /// Map `config` and replace the resource with the result
    pub async fn update_from(&self, id: &str, config: &Configuration) -> Result<ResourcePayload<A>> {
        let payload = self.map(config)?;
        self.update(id, &payload).await
    }

    /// Delete a resource. `None` means the hub answered without a resource,
    /// which is taken as already deleted.
    pub async fn delete(&self, id: &str) -> Result<Option<ResourcePayload<A>>> {
        info!("Deleting {} '{}'", self.spec.name, id);

        let request = HubRequest::new(Method::Delete, [self.spec.collection, id])
            .with_query(self.params.pairs(self.spec.delete_params));

        match self.call(Operation::Delete, Some(id), request).await? {
            None => {
                debug!("{} '{}' already deleted", self.spec.name, id);
                Ok(None)
            }
            Some(data) => self.decode_payload(Operation::Delete, Some(id), data).map(Some),
        }
    }

    /// Confirm a resource exists and return its identifier
    pub async fn lookup(&self, id: &str) -> Result<String> {
        let resource = self.read(id).await?;
        Ok(resource.id.unwrap_or_else(|| id.to_string()))
    }

    fn subject(&self, id: Option<&str>) -> Subject {
        Subject::new(self.spec.name, id)
    }

    fn encode(&self, payload: &ResourcePayload<A>) -> Result<Vec<u8>> {
        let mut value = serde_json::to_value(payload)?;
        if let Value::Object(map) = &mut value {
            map.remove("id");
        }
        let body = envelope::encode(&value)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Value::Object(map) = &mut value {
                redact(self.spec.fields, map);
            }
            debug!("{} request body: {}", self.spec.name, value);
        }

        Ok(body)
    }

    async fn call(
        &self,
        operation: Operation,
        id: Option<&str>,
        request: HubRequest,
    ) -> Result<Option<Value>> {
        let path = request.path();
        let response = self
            .context
            .run(self.transport.send(request))
            .await
            .map_err(|e| Error::transport(self.subject(id), operation, e.to_string()))?;

        debug!("{} {} responded {}", operation, path, response.status);

        if operation == Operation::Delete
            && response.is_success()
            && response.body.iter().all(u8::is_ascii_whitespace)
        {
            return Ok(None);
        }

        let family = match operation {
            Operation::ReadAll => LISTING_ENVELOPE,
            _ => self.spec.envelope,
        };
        let data = interpret(family, self.subject(id), operation, &response)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Some(data) = &data {
                debug!(
                    "{} response data: {}",
                    self.spec.name,
                    redact_data(self.spec.fields, data)
                );
            }
        }

        Ok(data)
    }



    fn require_payload(
        &self,
        operation: Operation,
        id: Option<&str>,
        data: Option<Value>,
    ) -> Result<ResourcePayload<A>> {
        match data {
            Some(data) => self.decode_payload(operation, id, data),
            None => Err(Error::malformed_response(
                self.subject(id),
                operation,
                "response carried no data",
                &[],
            )),
        }
    }

    fn decode_payload(
        &self,
        operation: Operation,
        id: Option<&str>,
        data: Value,
    ) -> Result<ResourcePayload<A>> {
        serde_json::from_value(data.clone()).map_err(|e| {
            Error::malformed_response(
                self.subject(id),
                operation,
                format!("data does not match the {} payload: {}", self.spec.name, e),
                data.to_string().as_bytes(),
            )
        })
    }
}

/// Copy of response data with sensitive fields masked, for a single
/// resource or a listing
fn redact_data(fields: &[FieldDef], data: &Value) -> Value {
    let mut data = data.clone();
    match &mut data {
        Value::Object(map) => redact(fields, map),
        Value::Array(entries) => {
            for entry in entries.iter_mut() {
                if let Value::Object(map) = entry {
                    redact(fields, map);
                }
            }
        }
        _ => {}
    }
    data
}

/// Classify a raw response and extract its `data`
pub(crate) fn interpret(
    family: EnvelopeFamily,
    subject: Subject,
    operation: Operation,
    response: &RawResponse,
) -> Result<Option<Value>> {
    let addressed = subject.id.is_some();
    if addressed && response.status == 404 {
        return Err(Error::not_found(subject));
    }

    let envelope = match family.decode(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !response.is_success() => {
            return Err(Error::api(
                subject,
                operation,
                response.status,
                None,
                &response.body,
            ))
        }
        Err(e) => {
            return Err(Error::malformed_response(
                subject,
                operation,
                e.to_string(),
                &response.body,
            ))
        }
    };

    match envelope.verdict {
        Verdict::Success if response.is_success() => Ok(envelope.data),
        Verdict::Failure { code: Some(404) } if addressed => Err(Error::not_found(subject)),
        verdict => {
            let code = match verdict {
                Verdict::Success => None,
                Verdict::Failure { code } => code,
            };
            Err(Error::api(
                subject,
                operation,
                response.status,
                code,
                &response.body,
            ))
        }
    }
}
