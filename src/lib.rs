//! bounty-watch - HackerOne scope monitor
//!
//! Periodically fetches the public `bounty-targets-data` HackerOne dataset,
//! diffs it against the last persisted snapshot, and reports new programs and
//! new in-scope targets. The diff engine is pure; fetching, caching, and
//! notification delivery live behind collaborator seams.

pub mod config;
pub mod diff;
pub mod directory;
pub mod monitor;
pub mod notify;
pub mod report;
pub mod snapshot;
