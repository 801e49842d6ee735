use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::SpamClassifier;
use crate::models::logistic::LogisticRegression;
use crate::models::naive_bayes::MultinomialNb;

/// Build a boxed classifier from a `ModelConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(config: &ModelConfig) -> Box<dyn SpamClassifier> {
    match &config.model_type {
        ModelType::MultinomialNb { alpha } => {
            Box::new(MultinomialNb::new(config.name.clone(), *alpha))
        }
        ModelType::LogisticRegression {
            learning_rate,
            l2,
            max_iter,
            tol,
        } => Box::new(LogisticRegression::new(
            config.name.clone(),
            *learning_rate,
            *l2,
            *max_iter,
            *tol,
        )),
    }
}
