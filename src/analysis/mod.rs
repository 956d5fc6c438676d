pub mod annotator;
pub mod engine;

pub use annotator::{annotate, Annotator};
pub use engine::{AnalysisEngine, AnalysisReport, AnalysisSummary, Snapshot};
