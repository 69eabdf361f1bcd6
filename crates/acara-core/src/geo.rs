pub mod boundary;
pub mod spatial;

pub use boundary::Boundary;
pub use spatial::distance_km;
