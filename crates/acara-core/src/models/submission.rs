use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::EventId;

/// Unique identifier for a submission row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub i64);

/// Moderation status of an event submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Waiting,
    Verified,
    Rejected,
    Takedown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Waiting => "waiting",
            Status::Verified => "verified",
            Status::Rejected => "rejected",
            Status::Takedown => "takedown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(Status::Waiting),
            "verified" => Some(Status::Verified),
            "rejected" => Some(Status::Rejected),
            "takedown" => Some(Status::Takedown),
            _ => None,
        }
    }

    /// A terminal status accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Rejected | Status::Takedown)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an event's moderation audit trail.
///
/// Rows are append-only: every transition inserts a new row and prior rows
/// are never mutated. The newest row is the event's current status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedEvent {
    pub id: SubmissionId,
    pub event_id: EventId,
    pub status: Status,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
