use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for a pipeline run.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PipelineConfig {
    /// Single seed driving every random draw (split, oversampling, fold shuffle).
    pub seed: u64,
    /// Fraction of records held out for the test split.
    pub test_fraction: f64,
    /// Number of stratified cross-validation folds.
    pub n_folds: usize,
    /// How many spam- and ham-indicative terms to report per model.
    pub top_features: usize,
    pub vectorizer: VectorizerConfig,
    /// Candidate models, evaluated in order. Ties in test F1 go to the
    /// earlier entry.
    pub candidates: Vec<ModelConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            n_folds: 5,
            top_features: 15,
            vectorizer: VectorizerConfig::default(),
            candidates: vec![
                ModelConfig::new("Multinomial Naive Bayes", ModelType::default()),
                ModelConfig::new(
                    "Logistic Regression",
                    ModelType::LogisticRegression {
                        learning_rate: 0.5,
                        l2: 1e-4,
                        max_iter: 1000,
                        tol: 1e-5,
                    },
                ),
            ],
        }
    }
}

/// TF-IDF vocabulary and weighting parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct VectorizerConfig {
    /// Minimum number of training documents a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of training documents a term may appear in.
    pub max_df: f64,
    /// Largest n-gram size; 2 means unigrams and bigrams.
    pub ngram_max: usize,
    /// Use `1 + ln(tf)` instead of raw term frequency.
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            min_df: 2,
            max_df: 0.95,
            ngram_max: 2,
            sublinear_tf: true,
        }
    }
}

/// One candidate model with its display name.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    pub name: String,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    MultinomialNb {
        /// Additive (Laplace/Lidstone) smoothing.
        alpha: f32,
    },
    LogisticRegression {
        learning_rate: f32,
        /// L2 regularization strength.
        l2: f32,
        max_iter: usize,
        /// Convergence tolerance on the gradient norm.
        tol: f32,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::MultinomialNb { alpha: 0.5 }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nb" | "naive_bayes" | "multinomial_nb" => Ok(ModelType::MultinomialNb { alpha: 0.5 }),
            "logistic" | "logistic_regression" => Ok(ModelType::LogisticRegression {
                learning_rate: 0.5,
                l2: 1e-4,
                max_iter: 1000,
                tol: 1e-5,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Expected 'naive_bayes' or 'logistic_regression'",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(name: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            name: name.into(),
            model_type,
        }
    }
}
