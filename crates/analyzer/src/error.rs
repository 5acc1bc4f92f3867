use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Ingestion(#[from] ingestion::IngestionError),

    #[error("Cannot evaluate the export: {0}")]
    Evaluation(analytics::AnalyticsError),

    #[error("Invalid analysis policy: {0}")]
    Policy(#[from] analytics::AnalyticsError),

    #[error("Invalid risk configuration: {0}")]
    Risk(#[from] risk::RiskError),
}
