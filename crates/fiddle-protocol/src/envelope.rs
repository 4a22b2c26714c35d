//! JSON envelope encoding: `{ "type": <tag>, "data": <payload> }`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::MODULE_STATUS;
use crate::error::ProtocolError;
use crate::message::{
    MessageKind, ModuleEvent, Request, Response, StatusUpdate, TerminationDetails, WorkPhase,
};

#[derive(Serialize)]
struct OutEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

#[derive(Deserialize)]
struct InEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

fn to_json(kind: MessageKind, data: Option<Value>) -> Result<String, ProtocolError> {
    serde_json::to_string(&OutEnvelope {
        kind: kind.tag(),
        data,
    })
    .map_err(|e| ProtocolError::Encode(e.to_string()))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(value).map_err(|e| ProtocolError::Encode(e.to_string()))
}

fn parse(json: &str) -> Result<InEnvelope, ProtocolError> {
    serde_json::from_str(json).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

fn invalid(kind: MessageKind, reason: impl Into<String>) -> ProtocolError {
    ProtocolError::InvalidPayload {
        kind: kind.tag(),
        reason: reason.into(),
    }
}

/// Encode a page → worker message
pub fn encode_request(request: &Request) -> Result<String, ProtocolError> {
    match request {
        Request::ShellExec(text) => to_json(
            request.kind(),
            Some(text.clone().map(Value::String).unwrap_or(Value::Null)),
        ),
    }
}

/// Decode a page → worker message
pub fn decode_request(json: &str) -> Result<Request, ProtocolError> {
    let envelope = parse(json)?;
    match MessageKind::from_tag(&envelope.kind) {
        Some(MessageKind::ShellExec) => match envelope.data {
            Value::Null => Ok(Request::ShellExec(None)),
            Value::String(text) => Ok(Request::ShellExec(Some(text))),
            other => Err(invalid(
                MessageKind::ShellExec,
                format!("expected string or null, got {}", other),
            )),
        },
        _ => Err(ProtocolError::UnknownType(envelope.kind)),
    }
}

/// Encode a worker → page message
pub fn encode_response(response: &Response) -> Result<String, ProtocolError> {
    let kind = response.kind();
    let data = match response {
        Response::Stdout(text) | Response::Stderr(text) => Some(Value::String(text.clone())),
        Response::Module(ModuleEvent::Status(update)) => Some(serde_json::json!({
            "type": MODULE_STATUS,
            "data": to_value(update)?,
        })),
        Response::Module(ModuleEvent::Unrecognized(sub)) => Some(serde_json::json!({
            "type": sub,
            "data": Value::Null,
        })),
        Response::Working(phase) => Some(to_value(phase)?),
        Response::Error(details) => Some(to_value(details)?),
        Response::FiddleReady => None,
    };
    to_json(kind, data)
}

/// Decode a worker → page message
pub fn decode_response(json: &str) -> Result<Response, ProtocolError> {
    let envelope = parse(json)?;
    let kind = match MessageKind::from_tag(&envelope.kind) {
        Some(MessageKind::ShellExec) | None => {
            return Err(ProtocolError::UnknownType(envelope.kind))
        }
        Some(kind) => kind,
    };

    match kind {
        MessageKind::Stdout => output_line(kind, envelope.data).map(Response::Stdout),
        MessageKind::Stderr => output_line(kind, envelope.data).map(Response::Stderr),
        MessageKind::Module => module_event(envelope.data).map(Response::Module),
        MessageKind::Working => serde_json::from_value::<WorkPhase>(envelope.data)
            .map(Response::Working)
            .map_err(|e| invalid(kind, e.to_string())),
        MessageKind::Error => serde_json::from_value::<TerminationDetails>(envelope.data)
            .map(Response::Error)
            .map_err(|e| invalid(kind, e.to_string())),
        MessageKind::FiddleReady => Ok(Response::FiddleReady),
        MessageKind::ShellExec => Err(ProtocolError::UnknownType(envelope.kind)),
    }
}

/// Output payloads are a string, or a list of arguments joined by one space.
fn output_line(kind: MessageKind, data: Value) -> Result<String, ProtocolError> {
    match data {
        Value::String(text) => Ok(text),
        Value::Array(parts) => Ok(parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")),
        other => Err(invalid(kind, format!("expected string, got {}", other))),
    }
}

fn module_event(data: Value) -> Result<ModuleEvent, ProtocolError> {
    let Value::Object(mut obj) = data else {
        return Err(invalid(MessageKind::Module, "expected object"));
    };
    let sub = match obj.remove("type") {
        Some(Value::String(sub)) => sub,
        _ => return Err(invalid(MessageKind::Module, "missing sub-type")),
    };
    if sub != MODULE_STATUS {
        return Ok(ModuleEvent::Unrecognized(sub));
    }
    let payload = obj.remove("data").unwrap_or(Value::Null);
    serde_json::from_value::<StatusUpdate>(payload)
        .map(ModuleEvent::Status)
        .map_err(|e| invalid(MessageKind::Module, e.to_string()))
}
