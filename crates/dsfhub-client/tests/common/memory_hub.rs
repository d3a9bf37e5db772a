//! In-memory hub for round-trip tests
//!
//! Stores submitted payloads under generated identifiers and echoes them back
//! in the coded envelope shape the hub uses. Every request is recorded for
//! later inspection.

use async_trait::async_trait;
use dsfhub_client::{HubRequest, Method, RawResponse, Transport, TransportError};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    next_id: u64,
    resources: BTreeMap<String, BTreeMap<String, Value>>,
    requests: Vec<HubRequest>,
}

#[derive(Default)]
pub struct MemoryHub {
    state: Mutex<State>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<HubRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Decoded `data` of the most recent request carrying a body
    pub fn last_submitted(&self) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .requests
            .iter()
            .rev()
            .find_map(|r| r.body.as_ref())
            .map(|body| {
                let value: Value = serde_json::from_slice(body).unwrap();
                value["data"].clone()
            })
    }

    /// Stored resource, bypassing the client
    pub fn stored(&self, collection: &str, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .resources
            .get(collection)
            .and_then(|items| items.get(id))
            .cloned()
    }

    fn ok(data: Value) -> RawResponse {
        respond(200, json!({"data": data, "error": {"code": 200, "message": "OK"}}))
    }

    fn missing(id: &str) -> RawResponse {
        let message = format!("{} not found", id);
        respond(404, json!({"data": null, "error": {"code": 404, "message": message}}))
    }
}

fn respond(status: u16, body: Value) -> RawResponse {
    RawResponse {
        status,
        headers: vec![("content-type".into(), "application/json".into())],
        body: body.to_string().into_bytes(),
    }
}

fn submitted(request: &HubRequest) -> Map<String, Value> {
    let body = request.body.as_deref().unwrap_or(b"{}");
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    match value.get("data") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

#[async_trait]
impl Transport for MemoryHub {
    async fn send(&self, request: HubRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let response = match (request.method, segments.as_slice()) {
            (Method::Get, ["get-config"]) => {
                let all: Vec<Value> = state
                    .resources
                    .values()
                    .flat_map(|items| items.values().cloned())
                    .collect();
                Self::ok(Value::Array(all))
            }
            (Method::Post, [collection]) => {
                state.next_id += 1;
                let id = format!("{}-{:04}", collection, state.next_id);
                let mut record = submitted(&request);
                record.insert("id".into(), Value::from(id.clone()));
                let record = Value::Object(record);
                state
                    .resources
                    .entry(collection.to_string())
                    .or_default()
                    .insert(id, record.clone());
                Self::ok(record)
            }
            (Method::Get, [collection, id]) => {
                match state.resources.get(*collection).and_then(|items| items.get(*id)) {
                    Some(record) => Self::ok(record.clone()),
                    None => Self::missing(id),
                }
            }
            (Method::Put, [collection, id]) => {
                let exists = state
                    .resources
                    .get(*collection)
                    .is_some_and(|items| items.contains_key(*id));
                if exists {
                    let mut record = submitted(&request);
                    record.insert("id".into(), Value::from(id.to_string()));
                    let record = Value::Object(record);
                    state
                        .resources
                        .entry(collection.to_string())
                        .or_default()
                        .insert(id.to_string(), record.clone());
                    Self::ok(record)
                } else {
                    Self::missing(id)
                }
            }
            (Method::Delete, [collection, id]) => {
                match state
                    .resources
                    .get_mut(*collection)
                    .and_then(|items| items.remove(*id))
                {
                    Some(record) => Self::ok(record),
                    None => Self::missing(id),
                }
            }
            _ => respond(400, json!({"data": null, "error": {"code": 400, "message": "unsupported request"}})),
        };

        Ok(response)
    }
}
