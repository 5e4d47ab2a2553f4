//! Request and response envelopes for a single operation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use catalog_core::ErrorKind;

use crate::error::QueryError;

/// One operation invocation: a name plus its arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    #[serde(alias = "operationName")]
    pub operation: String,

    #[serde(default, alias = "variables")]
    pub arguments: Map<String, Value>,
}

impl Request {
    pub fn new(operation: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            operation: operation.into(),
            arguments,
        }
    }
}

/// Decode a request document: one request object, or an array of them run
/// in order. An entry that does not decode becomes a failure response in its
/// position, so the remaining entries still run.
pub fn parse_document(input: &str) -> Vec<std::result::Result<Request, Response>> {
    let document: Value = match serde_json::from_str(input) {
        Ok(document) => document,
        Err(e) => {
            let err = QueryError::MalformedRequest(e.to_string());
            return vec![Err(Response::rejected(None, &err))];
        }
    };

    let entries = match document {
        Value::Array(entries) => entries,
        other => vec![other],
    };

    entries
        .into_iter()
        .map(|entry| {
            let operation = entry
                .get("operation")
                .or_else(|| entry.get("operationName"))
                .and_then(Value::as_str)
                .map(str::to_string);
            serde_json::from_value::<Request>(entry).map_err(|e| {
                let err = QueryError::MalformedRequest(e.to_string());
                Response::rejected(operation.as_deref(), &err)
            })
        })
        .collect()
}

/// A structured error entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
    pub path: Vec<String>,
}

/// The result of one operation: `data` keyed by operation name, plus any errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorPayload>,
}

impl Response {
    pub fn success(operation: &str, value: Value) -> Self {
        Self {
            data: Some(keyed(operation, value)),
            errors: Vec::new(),
        }
    }

    /// Build the failure envelope. A partial mutation still reports what it
    /// produced under `data`.
    pub fn failure(operation: &str, err: &QueryError) -> Self {
        let data = match err {
            QueryError::PartialMutation { partial, .. } => Some(keyed(operation, partial.clone())),
            _ => None,
        };
        Self {
            data,
            errors: vec![ErrorPayload {
                kind: err.kind(),
                message: err.to_string(),
                path: vec![operation.to_string()],
            }],
        }
    }

    /// Failure for a request that never reached an operation. The path names
    /// the operation only when the request carried a readable one.
    pub fn rejected(operation: Option<&str>, err: &QueryError) -> Self {
        Self {
            data: None,
            errors: vec![ErrorPayload {
                kind: err.kind(),
                message: err.to_string(),
                path: operation.map(|op| vec![op.to_string()]).unwrap_or_default(),
            }],
        }
    }

    /// True when the operation completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The value returned for `operation`, if any.
    pub fn value(&self, operation: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.get(operation))
    }
}

fn keyed(operation: &str, value: Value) -> Value {
    let mut data = Map::new();
    data.insert(operation.to_string(), value);
    Value::Object(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_accepts_graphql_style_aliases() {
        let req: Request = serde_json::from_str(
            r#"{"operationName": "user", "variables": {"id": "abc"}}"#,
        )
        .unwrap();
        assert_eq!(req, Request::new("user", json!({"id": "abc"})));
    }

    #[test]
    fn request_arguments_default_to_empty() {
        let req: Request = serde_json::from_str(r#"{"operation": "users"}"#).unwrap();
        assert!(req.arguments.is_empty());
    }

    #[test]
    fn document_accepts_single_request_or_batch() {
        let one = parse_document(r#"{"operation": "users"}"#);
        assert_eq!(one.len(), 1);
        assert!(one[0].is_ok());

        let many = parse_document(r#"[{"operation": "users"}, {"operation": "products"}]"#);
        assert_eq!(many.len(), 2);
        assert!(many.iter().all(|entry| entry.is_ok()));
    }

    #[test]
    fn malformed_entry_is_rejected_in_place() {
        let entries = parse_document(
            r#"[{"operation": "addUser", "arguments": {"name": "A", "age": 1}},
                {"operation": "addUser", "arguments": []},
                {"arguments": {}}]"#,
        );
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_ok());

        let bad = entries[1].as_ref().unwrap_err();
        assert_eq!(bad.data, None);
        assert_eq!(bad.errors[0].kind, ErrorKind::ValidationError);
        assert_eq!(bad.errors[0].path, vec!["addUser".to_string()]);

        let nameless = entries[2].as_ref().unwrap_err();
        assert!(nameless.errors[0].path.is_empty());
    }

    #[test]
    fn unparseable_document_yields_one_rejection() {
        let entries = parse_document("not json");
        assert_eq!(entries.len(), 1);
        let resp = entries[0].as_ref().unwrap_err();
        assert_eq!(resp.errors[0].kind, ErrorKind::ValidationError);
        assert!(!resp.is_ok());
    }

    #[test]
    fn success_omits_errors() {
        let resp = Response::success("product", Value::Null);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, json!({"data": {"product": null}}));
        assert!(resp.is_ok());
    }

    #[test]
    fn failure_names_kind_and_path() {
        let resp = Response::failure("frobnicate", &QueryError::UnknownOperation("frobnicate".into()));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["data"], Value::Null);
        assert_eq!(json["errors"][0]["kind"], "UNKNOWN_OPERATION");
        assert_eq!(json["errors"][0]["path"], json!(["frobnicate"]));
        assert!(!resp.is_ok());
    }
}
