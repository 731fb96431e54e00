pub mod events;
pub mod university;

pub use events::{DecodedLog, EventWatcher, WatchHandle};
pub use university::UniversityDataSource;
