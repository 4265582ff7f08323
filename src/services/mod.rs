pub mod archiver;
pub mod classifier;
pub mod placement;
pub mod report_writer;

pub use archiver::{ArchiveSummary, Archiver};
pub use classifier::DocumentClassifier;
pub use placement::{Placement, PlacementResolver};
pub use report_writer::ReportWriter;
