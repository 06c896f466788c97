pub mod store;

pub use store::{SnapshotStore, StoreError};
