use thiserror::Error;

/// Failure from the injected history/memory interfaces.
///
/// These never cross the engine boundary: callers of the engine see an
/// empty or shorter deduction list instead.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("history lookup failed: {0}")]
    Lookup(String),

    #[error("memory store failed: {0}")]
    Store(String),

    #[error("profile write failed: {0}")]
    Profile(String),
}
