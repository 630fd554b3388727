//! Derived display fields for fetched service requests.

use chrono::{DateTime, FixedOffset};
use shared::{domain::RequestStatus, protocol::ServiceRequestRecord};

/// A fetched request plus the display fields a presentation layer binds to.
/// Immutable once built; every refresh replaces the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequestView {
    pub subject: String,
    pub description: String,
    pub status: RequestStatus,
    /// Raw wire timestamp, kept verbatim.
    pub created_at: String,
    pub status_display_class: &'static str,
    pub created_at_formatted: String,
}

impl ServiceRequestView {
    /// Substring match against an already-lowercased search term. Empty
    /// fields never match a non-empty term.
    pub(crate) fn matches(&self, term: &str) -> bool {
        self.subject.to_lowercase().contains(term)
            || self.description.to_lowercase().contains(term)
    }
}

/// Presentation tag for a status value. Total: unrecognized statuses map to
/// the empty tag.
pub fn status_display_class(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::New => "error-color",
        RequestStatus::InProgress => "warning-color",
        RequestStatus::Closed => "success-color",
        RequestStatus::Unknown => "",
    }
}

/// Long-date-with-time rendering, e.g. "January 1, 2024, 10:00 AM". Falls
/// back to the raw wire string when the timestamp cannot be parsed.
pub fn format_created_at(raw: &str) -> String {
    parse_created_date(raw)
        .map(|timestamp| timestamp.format("%B %-d, %Y, %-I:%M %p").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_created_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    // RFC 3339 first; the endpoint also emits offsets without a colon
    // ("2024-01-01T10:00:00.000+0000"), which need the %z form.
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

pub(crate) fn present(record: ServiceRequestRecord) -> ServiceRequestView {
    let created_at_formatted = format_created_at(&record.created_date);
    ServiceRequestView {
        subject: record.subject.unwrap_or_default(),
        description: record.description.unwrap_or_default(),
        status: record.status,
        status_display_class: status_display_class(record.status),
        created_at_formatted,
        created_at: record.created_date,
    }
}
