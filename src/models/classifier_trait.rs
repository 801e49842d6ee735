use crate::error::PipelineError;
use crate::math::CsrMatrix;

/// How a fitted model exposes per-column importance scores.
///
/// Resolved once per model rather than via runtime type inspection: a model
/// either carries linear coefficients, class-conditional log-probabilities,
/// or supports no importance extraction at all.
#[derive(Debug, Clone)]
pub enum ImportanceSource {
    /// One signed coefficient per vocabulary column.
    LinearWeighted(Vec<f32>),
    /// Per-class log-probabilities; the importance score of a column is
    /// `spam[col] - ham[col]`.
    LogProbWeighted { spam: Vec<f32>, ham: Vec<f32> },
    Unsupported,
}

impl ImportanceSource {
    /// Collapse to one signed score per vocabulary column, or `None` for
    /// unsupported models.
    pub fn scores(&self) -> Option<Vec<f32>> {
        match self {
            ImportanceSource::LinearWeighted(coefs) => Some(coefs.clone()),
            ImportanceSource::LogProbWeighted { spam, ham } => Some(
                spam.iter()
                    .zip(ham.iter())
                    .map(|(s, h)| s - h)
                    .collect(),
            ),
            ImportanceSource::Unsupported => None,
        }
    }
}

/// Contract for candidate classifiers over the TF-IDF feature matrix.
///
/// `y` uses the crate convention: 0 for ham, 1 for spam. Implementations are
/// `Send` so independent candidates can be fitted in parallel.
pub trait SpamClassifier: Send {
    /// Fit the model. A convergence or conditioning failure is reported as
    /// `PipelineError::ModelFit` and excludes this candidate only.
    fn fit(&mut self, x: &CsrMatrix, y: &[i32]) -> Result<(), PipelineError>;

    /// Hard 0/1 label per row via the model's decision rule.
    fn predict(&self, x: &CsrMatrix) -> Vec<i32>;

    /// Positive-class (spam) probability per row, in [0, 1].
    fn predict_proba(&self, x: &CsrMatrix) -> Vec<f32>;

    /// How this model exposes feature importance, resolved once after fitting.
    fn importance(&self) -> ImportanceSource;

    /// Human readable name for the model.
    fn name(&self) -> &str {
        "classifier"
    }
}
