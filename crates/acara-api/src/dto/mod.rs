mod request;
mod response;

pub use request::{EventQueryParams, SubmitRequest, TransitionRequest};
pub use response::{
    EventDetailResponse, HealthResponse, HistoryEntry, OrganizerEventResponse, SubmitResponse,
};
