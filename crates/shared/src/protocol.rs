use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, ErrorCode};

pub const SEARCH_ACTION: &str = "search";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Error desconocido.";

/// Record returned by a successful lookup, keyed by field id.
pub type PrefillRecord = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub cedula: String,
    /// Id of the national-ID field that triggered the lookup.
    pub search_type: String,
}

impl SearchRequest {
    pub fn new(cedula: impl Into<String>, search_type: impl Into<String>) -> Self {
        Self {
            cedula: cedula.into(),
            search_type: search_type.into(),
        }
    }

    /// Multipart text parts, in the order the endpoint expects them.
    pub fn form_parts(&self) -> Vec<(&'static str, String)> {
        vec![
            ("action", SEARCH_ACTION.to_string()),
            ("cedula", self.cedula.clone()),
            ("searchType", self.search_type.clone()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: String,
    /// Only an object carries fields; any other shape prefills nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(PrefillRecord),
    NotFound,
    /// The endpoint created a record while asked to search; its deployment is stale.
    DeploymentMismatch,
    Failed(ApiError),
}

impl SearchResponse {
    pub fn into_outcome(self) -> LookupOutcome {
        match self.result.as_str() {
            "found" => LookupOutcome::Found(match self.data {
                Some(Value::Object(record)) => record,
                _ => PrefillRecord::new(),
            }),
            "not_found" | "not_found_debug" => LookupOutcome::NotFound,
            "success" => LookupOutcome::DeploymentMismatch,
            _ => LookupOutcome::Failed(ApiError::new(
                ErrorCode::Backend,
                self.error
                    .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            )),
        }
    }
}

/// Whole form serialized as ordered `(name, value)` text parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success,
    Failure(ApiError),
}

impl SubmitResponse {
    pub fn into_outcome(self) -> SubmitOutcome {
        if self.result == "success" {
            SubmitOutcome::Success
        } else {
            SubmitOutcome::Failure(ApiError::new(
                ErrorCode::Backend,
                self.error
                    .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            ))
        }
    }
}

/// Work the form hands to the backend bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Search(SearchRequest),
    Submit(SubmitRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Search(_) => "search",
            BackendCommand::Submit(_) => "submit",
        }
    }
}

/// Completion of a [`BackendCommand`], delivered back to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    LookupCompleted {
        search_type: String,
        outcome: LookupOutcome,
    },
    SubmitCompleted(SubmitOutcome),
}
