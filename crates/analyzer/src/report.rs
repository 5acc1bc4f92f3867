use analytics::{AnalysisMetrics, FlaggedDay, ValidationVerdict};
use core_types::Client;
use ingestion::SkippedRow;
use serde::Serialize;

/// The complete outcome of analysing one trader's export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub client: Client,
    pub metrics: AnalysisMetrics,
    pub validation: ValidationVerdict,
    pub violations: Vec<FlaggedDay>,
    pub warnings: Vec<FlaggedDay>,
    pub ingestion: IngestionSummary,
}

/// How many export rows made it into the analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_skipped: usize,
    pub skipped: Vec<SkippedRow>,
}
