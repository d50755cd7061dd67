use thiserror::Error;

/// Failure extracting component records from a spawned model scene.
///
/// Callers treat any extraction failure as "no components" plus the error,
/// never as a partially populated set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("model root entity no longer exists")]
    MissingRoot,
    #[error("model root has no spawned scene instance yet")]
    SceneNotSpawned,
}

/// Per-category material swap failure. Reported through `SwapFailedEvent`
/// and the RPC bridge; never aborts other categories.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("invalid colour literal '{0}'")]
    InvalidColor(String),
}
