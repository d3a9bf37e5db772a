//! Envelope codec
//!
//! Every request body is `{"data": <payload>}`. Responses arrive in one of
//! two shapes, both translated into the same [`Verdict`]:
//!
//! - coded: `{"data": ..., "error": {"code": 200, ...}}`, where only code 200
//!   is success
//! - nullable: `{"data": ..., "errors": null}`, where any populated `errors`
//!   value is failure
//!
//! Whichever family a kind declares, a failure stated in the other shape is
//! still a failure: an `error.code` other than 200 fails a nullable decode,
//! and a populated `errors` fails a coded one.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Status code the coded shape uses for success
pub const CODE_OK: i64 = 200;

/// Wire shape a kind's endpoints answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeFamily {
    Coded,
    Nullable,
}

/// Normalized success indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// `code` is the status the envelope reported, when it reported one
    Failure { code: Option<i64> },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            Verdict::Success => Some(CODE_OK),
            Verdict::Failure { code } => *code,
        }
    }
}

/// Decoded response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Payload under `data`; `None` when absent or null
    pub data: Option<Value>,
    pub verdict: Verdict,
}

/// The body did not have the shape of an envelope
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("error.code is not an integer: {0}")]
    InvalidCode(Value),
}

impl EnvelopeFamily {
    /// Parse a response body and apply this family's success predicate
    pub fn decode(self, body: &[u8]) -> Result<Envelope, DecodeError> {
        let mut object = match serde_json::from_slice::<Value>(body)? {
            Value::Object(map) => map,
            other => return Err(DecodeError::NotAnObject(json_type(&other))),
        };

        let coded = coded_verdict(&object)?;
        let nullable = nullable_verdict(&object);
        let verdict = match self {
            EnvelopeFamily::Coded => match (coded, nullable) {
                (Verdict::Success, Verdict::Failure { code }) => Verdict::Failure { code },
                (coded, _) => coded,
            },
            EnvelopeFamily::Nullable => match (nullable, coded) {
                (Verdict::Success, Verdict::Failure { code: Some(code) }) => {
                    Verdict::Failure { code: Some(code) }
                }
                (nullable, _) => nullable,
            },
        };

        let data = match object.remove("data") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        };

        Ok(Envelope { data, verdict })
    }
}

fn coded_verdict(object: &Map<String, Value>) -> Result<Verdict, DecodeError> {
    let code = match object.get("error").and_then(|e| e.get("code")) {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_i64()
                .ok_or_else(|| DecodeError::InvalidCode(value.clone()))?,
        ),
    };

    Ok(match code {
        Some(CODE_OK) => Verdict::Success,
        code => Verdict::Failure { code },
    })
}

fn nullable_verdict(object: &Map<String, Value>) -> Verdict {
    let populated = match object.get("errors") {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };

    if populated {
        let code = object
            .get("errors")
            .and_then(|e| e.get("code"))
            .and_then(Value::as_i64);
        Verdict::Failure { code }
    } else {
        Verdict::Success
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Serialize)]
struct Outgoing<'a, T: ?Sized> {
    data: &'a T,
}

/// Wrap a payload in the request envelope
pub fn encode<T: Serialize + ?Sized>(payload: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&Outgoing { data: payload })
}
