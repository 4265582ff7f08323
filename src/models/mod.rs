pub mod document;
pub mod run_report;
pub mod run_summary;

pub use document::{Classification, Document};
pub use run_report::{DateFolder, IssuerBreakdown, RunReport, RunStats};
pub use run_summary::{ArchiveChoice, RunSummary};
