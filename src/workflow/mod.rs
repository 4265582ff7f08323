pub mod document_flow;

pub use document_flow::{DocumentFlow, DocumentOutcome};
