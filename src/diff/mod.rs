pub mod classifier;
pub mod differ;

pub use classifier::{is_relevant_asset_type, RELEVANT_ASSET_TYPES};
pub use differ::{diff_snapshots, ProgramScopes, ScopeChanges};
