//! Geometry intake: everything between raw author text and a sanitized,
//! hashable list of GeoJSON items.

pub mod error;
pub mod external;
pub mod hash;
pub mod intake;
pub mod item;
pub mod json;
pub mod markers;
pub mod sanitize;
pub mod schema;

pub use error::EmbedError;
pub use intake::GeometryIntake;
