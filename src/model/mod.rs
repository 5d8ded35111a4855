pub mod catalog;
pub mod rock;
pub mod system;

pub use catalog::{catalog, companion, BodyDescriptor};
pub use system::{Body, BodyID, BuildError, PivotID, System};
