use serde::{Deserialize, Serialize};

/// Server-owned lifecycle state of a service request.
///
/// The REST endpoint reports status as a display string; anything outside the
/// known set deserializes to [`RequestStatus::Unknown`] rather than failing
/// the whole list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
    #[serde(other)]
    Unknown,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "New",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Closed => "Closed",
            RequestStatus::Unknown => "Unknown",
        }
    }
}
