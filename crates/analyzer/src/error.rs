use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Scoring error: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Shift planning error: {0}")]
    Scheduler(#[from] scheduler::SchedulerError),
}
