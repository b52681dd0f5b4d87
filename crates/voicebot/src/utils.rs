pub mod snapshot;
pub mod time;

pub use snapshot::SnapshotCell;
