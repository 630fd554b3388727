use serde::{Deserialize, Serialize};

use crate::domain::RequestStatus;

/// One element of the GET collection response, exactly as the endpoint
/// serializes it. Subject and description may be absent on sparse records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestRecord {
    #[serde(rename = "Subject__c")]
    pub subject: Option<String>,
    #[serde(rename = "Description__c")]
    pub description: Option<String>,
    #[serde(rename = "Status__c")]
    pub status: RequestStatus,
    #[serde(rename = "CreatedDate")]
    pub created_date: String,
}

/// POST body for creating a new service request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequestBody {
    pub subject: String,
    pub description: String,
}

/// POST success response; the server may attach a human-readable message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub message: Option<String>,
}
