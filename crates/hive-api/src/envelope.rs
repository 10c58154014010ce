// Uniform result of every client operation.
//
// Serializes to the two-field envelope `{original, parsed}` that Hive
// integrations consume: `original` is the HTTP status, `parsed` the decoded
// body (or an extracted sub-field). Failures serialize both fields as the
// fixed marker string.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Marker written to both envelope fields when a call fails.
pub const ERROR_MARKER: &str = "Error making API call";

/// Outcome of one API call. A fresh value per call.
///
/// Non-2xx statuses with a decodable body are still `Ok`: the status is
/// reported as-is and interpretation is left to the caller. `Failed` does not
/// say why; the cause is logged when it is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Ok { status: u16, parsed: Value },
    Failed,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The `original` field: status code, or the marker.
    pub fn original(&self) -> Value {
        match self {
            Self::Ok { status, .. } => Value::from(*status),
            Self::Failed => Value::from(ERROR_MARKER),
        }
    }

    /// The `parsed` field: decoded payload, or the marker.
    pub fn parsed(&self) -> Value {
        match self {
            Self::Ok { parsed, .. } => parsed.clone(),
            Self::Failed => Value::from(ERROR_MARKER),
        }
    }

    /// HTTP status, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Ok { status, .. } => Some(*status),
            Self::Failed => None,
        }
    }

    /// Consume into the decoded payload.
    pub fn into_parsed(self) -> Option<Value> {
        match self {
            Self::Ok { parsed, .. } => Some(parsed),
            Self::Failed => None,
        }
    }

    /// The envelope as a JSON object.
    pub fn to_envelope(&self) -> Value {
        serde_json::json!({
            "original": self.original(),
            "parsed": self.parsed(),
        })
    }
}

impl Serialize for ApiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiResponse", 2)?;
        match self {
            Self::Ok { status, parsed } => {
                state.serialize_field("original", status)?;
                state.serialize_field("parsed", parsed)?;
            }
            Self::Failed => {
                state.serialize_field("original", ERROR_MARKER)?;
                state.serialize_field("parsed", ERROR_MARKER)?;
            }
        }
        state.end()
    }
}
