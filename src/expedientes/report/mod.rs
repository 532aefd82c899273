mod summary;
pub mod views;

pub use summary::{build_report, filter, group_by_asesor, summarize};
