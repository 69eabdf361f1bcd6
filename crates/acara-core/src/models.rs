pub mod event;
pub mod geometry;
pub mod submission;

pub use event::{
    Category, CategoryId, Event, EventDetail, EventDraft, EventId, EventRecord, NewEvent,
    Organizer, OrganizerId, PlaceId,
};
pub use geometry::GeoPoint;
pub use submission::{Status, SubmissionId, SubmittedEvent};
