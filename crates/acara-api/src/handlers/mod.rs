mod boundary;
mod categories;
mod events;
mod health;
mod moderation;

pub use boundary::get_boundary;
pub use categories::list_categories;
pub use events::{event_detail, events_by_organizer, query_events, submit_event, withdraw_event};
pub use health::health_check;
pub use moderation::{event_history, transition_event};
