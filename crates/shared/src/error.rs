use serde::{Deserialize, Serialize};

/// Error body returned by the service-request endpoint on non-2xx responses.
/// The `message` field is optional; callers fall back to the HTTP status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
