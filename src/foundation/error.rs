/// Convenience result type used across casemap.
pub type CasemapResult<T> = Result<T, CasemapError>;

/// Top-level error taxonomy used by loading, pipeline and playback APIs.
#[derive(thiserror::Error, Debug)]
pub enum CasemapError {
    /// Malformed or incomplete input. Fatal to loading.
    #[error("parse error: {0}")]
    Parse(String),

    /// No population record for a municipality. Absorbed by the pipeline as "no data".
    #[error("missing population for municipality '{municipality_code}'")]
    MissingPopulation { municipality_code: String },

    /// Day index outside `[0, len)`.
    #[error("day index {index} out of range (number of days: {len})")]
    OutOfRange { index: usize, len: usize },

    /// Invalid configuration or construction parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration and output.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CasemapError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn missing_population(municipality_code: impl Into<String>) -> Self {
        Self::MissingPopulation {
            municipality_code: municipality_code.into(),
        }
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Recoverable errors are absorbed by the stage that raised them.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingPopulation { .. })
    }
}
