use serde::Serialize;

/// Data-sufficiency failures of the analytics engine.
///
/// These are deterministic functions of the input sample. The report keeps
/// them per section so the presentation layer can print "no data" instead of
/// a misleading zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum AnalysisError {
    /// A statistic needing at least one record was asked for on an empty set.
    #[error("no data in sample")]
    EmptySample,

    /// The forecast needs three distinct months of merges.
    #[error("insufficient history: {months} month(s) available, {required} required")]
    InsufficientHistory { months: usize, required: usize },
}
