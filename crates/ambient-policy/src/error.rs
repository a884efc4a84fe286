use thiserror::Error;

/// Policy configuration errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error(
        "thresholds must rise with tier: low {low} <= medium {medium} <= high {high} violated"
    )]
    NonMonotonicThresholds { low: f64, medium: f64, high: f64 },

    #[error("threshold {0} outside 0.0..=1.0")]
    ThresholdOutOfRange(f64),
}

/// Failure reported by a domain writer's persistence layer.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("persistence layer error: {0}")]
    Persistence(String),

    #[error("writer rejected the record: {0}")]
    Rejected(String),
}
