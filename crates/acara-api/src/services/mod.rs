mod events;

pub use events::{boundary_feature_collection, EventQueryService};
