//! Per-class most-influential vocabulary terms from a fitted model.
use serde::Serialize;

use crate::error::PipelineError;
use crate::models::classifier_trait::SpamClassifier;
use crate::vectorize::TfidfVectorizer;

/// One vocabulary term with its importance weight.
#[derive(Debug, Clone, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f32,
}

/// Top spam-indicative and ham-indicative terms for one model.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportanceTable {
    /// Highest-scoring terms, descending. Raw signed scores.
    pub spam: Vec<TermWeight>,
    /// Lowest-scoring terms, ascending by score; weights are absolute-valued.
    pub ham: Vec<TermWeight>,
}

/// Derive the importance table from a fitted model and its vectorizer.
///
/// The model must expose either linear coefficients or class-conditional
/// log-probabilities; anything else is an `UnsupportedModel` error rather
/// than a silent empty table.
pub fn extract(
    model: &dyn SpamClassifier,
    vectorizer: &TfidfVectorizer,
    top_n: usize,
) -> Result<FeatureImportanceTable, PipelineError> {
    let scores = model
        .importance()
        .scores()
        .ok_or_else(|| PipelineError::UnsupportedModel {
            model: model.name().to_string(),
        })?;

    let names = vectorizer.feature_names();
    assert_eq!(
        scores.len(),
        names.len(),
        "model importance scores do not match the vocabulary size"
    );

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let take = top_n.min(order.len());
    let spam = order[..take]
        .iter()
        .map(|&idx| TermWeight {
            term: names[idx].clone(),
            weight: scores[idx],
        })
        .collect();
    let ham = order
        .iter()
        .rev()
        .take(take)
        .map(|&idx| TermWeight {
            term: names[idx].clone(),
            weight: scores[idx].abs(),
        })
        .collect();

    Ok(FeatureImportanceTable { spam, ham })
}
