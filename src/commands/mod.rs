mod analyze;
mod serve;

pub use analyze::{AnalysisSummary, analyze, run};
pub use serve::serve;
