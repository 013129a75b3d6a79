use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElprisError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Error identified during price comparison: {0}")]
    FailureInComparison(#[from] ComparisonError),
    #[error("Error while writing out comparison results: {0}")]
    ErrorInOutput(OutputError),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ComparisonError {
    error: anyhow::Error,
}

impl ComparisonError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}
