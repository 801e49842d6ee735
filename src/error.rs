use std::error::Error;
use std::fmt;

/// Error taxonomy for the classification pipeline.
///
/// `Data` and `ResourceUnavailable` abort a run before any model work.
/// `ModelFit` is fatal only to the affected candidate, which is excluded from
/// model selection. `UnsupportedModel` is fatal only to the feature-importance
/// reporting step that requested it.
#[derive(Debug)]
pub enum PipelineError {
    /// Malformed or missing label, empty dataset, or unparseable record.
    Data {
        /// 1-based line number in the source corpus, when known.
        line: Option<usize>,
        reason: String,
    },
    /// A required normalization resource (stop-word list, lemma table) is missing.
    ResourceUnavailable { resource: String },
    /// A candidate model failed to fit or converge.
    ModelFit { model: String, reason: String },
    /// Feature importance was requested on a model exposing neither linear
    /// coefficients nor class-conditional log-probabilities.
    UnsupportedModel { model: String },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Data { line: Some(line), reason } => {
                write!(f, "invalid record at line {}: {}", line, reason)
            }
            PipelineError::Data { line: None, reason } => {
                write!(f, "invalid dataset: {}", reason)
            }
            PipelineError::ResourceUnavailable { resource } => {
                write!(f, "normalization resource unavailable: {}", resource)
            }
            PipelineError::ModelFit { model, reason } => {
                write!(f, "model '{}' failed to fit: {}", model, reason)
            }
            PipelineError::UnsupportedModel { model } => {
                write!(
                    f,
                    "model '{}' does not support feature importance extraction",
                    model
                )
            }
        }
    }
}

impl Error for PipelineError {}

impl PipelineError {
    pub fn data(reason: impl Into<String>) -> Self {
        PipelineError::Data {
            line: None,
            reason: reason.into(),
        }
    }

    pub fn data_at(line: usize, reason: impl Into<String>) -> Self {
        PipelineError::Data {
            line: Some(line),
            reason: reason.into(),
        }
    }

    pub fn model_fit(model: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::ModelFit {
            model: model.into(),
            reason: reason.into(),
        }
    }
}
