pub mod text;

pub use text::{render_report, render_snapshot_summary};
