use thiserror::Error;

/// Failure reading a pre/post state aggregate.
#[derive(Error, Debug)]
pub enum ObserveError {
    #[error("aggregate read failed: {0}")]
    Read(String),
}
