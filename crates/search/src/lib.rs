pub mod collections;
pub mod results;
pub mod store;

pub use collections::{Axis, Collection, InvalidAxisError};
pub use results::{CodeResult, CommitResult, ExperienceResult, Lesson, MemoryResult, RootCause, ValueResult};
pub use store::SearchResult;
