//! End-to-end training pipeline and model selection.
//!
//! Stages run in strict data-dependency order: normalize, split, balance
//! (train only), vectorize, cross-validate and fit each candidate, evaluate
//! on the held-out test split, extract feature importance, select the best
//! model by test F1. Parallelism is confined to cross-validation folds,
//! which are independent and combined by a mean.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ModelConfig, PipelineConfig};
use crate::data_handling::{balance, stratified_split, Dataset, Label, NormalizedRecord};
use crate::error::PipelineError;
use crate::feature_importance::{self, FeatureImportanceTable};
use crate::math::{Array1, CsrMatrix};
use crate::models::classifier_trait::SpamClassifier;
use crate::models::factory;
use crate::normalize::{LanguageResources, TextNormalizer};
use crate::stats::{self, ConfusionMatrix, MetricSet, RocCurve};
use crate::vectorize::TfidfVectorizer;

/// Stratified k-fold assignment over 0/1 labels.
///
/// Each class is shuffled independently with the given seed and dealt
/// round-robin across folds, so every row lands in exactly one validation
/// fold and per-fold class ratios track the input ratio.
pub struct StratifiedKFold {
    n_folds: usize,
    seed: u64,
}

impl StratifiedKFold {
    pub fn new(n_folds: usize, seed: u64) -> Self {
        assert!(n_folds >= 2, "cross-validation requires at least 2 folds");
        StratifiedKFold { n_folds, seed }
    }

    /// Validation index sets, one per fold.
    pub fn split(&self, labels: &[i32]) -> Vec<Vec<usize>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); self.n_folds];

        let mut offset = 0;
        for class in [0, 1] {
            let mut class_indices: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter_map(|(i, &l)| if l == class { Some(i) } else { None })
                .collect();
            class_indices.shuffle(&mut rng);
            let count = class_indices.len();
            for (i, idx) in class_indices.into_iter().enumerate() {
                folds[(offset + i) % self.n_folds].push(idx);
            }
            // Continue dealing where the previous class stopped so remainder
            // rows do not all pile onto the first folds.
            offset = (offset + count) % self.n_folds;
        }
        folds
    }
}

/// Everything measured for one candidate model. Created once, never mutated.
#[derive(Debug, Serialize)]
pub struct EvaluationResult {
    pub name: String,
    /// Metric means across the cross-validation folds.
    pub cv_metrics: MetricSet,
    /// Metrics from the single held-out test evaluation.
    pub test_metrics: MetricSet,
    pub confusion: ConfusionMatrix,
    pub roc: RocCurve,
    /// Absent when importance extraction failed; the failure is logged and
    /// fatal only to this reporting step.
    pub feature_importance: Option<FeatureImportanceTable>,
}

/// One demo inference row.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub message: String,
    /// "SPAM" or "HAM".
    pub prediction: String,
    /// Positive-class probability in [0, 1].
    pub probability: f32,
}

/// Artifacts of a completed run: per-candidate results plus the frozen
/// vectorizer, normalizer and best model for downstream inference.
pub struct PipelineOutcome {
    pub results: Vec<EvaluationResult>,
    pub best_name: String,
    pub vectorizer: TfidfVectorizer,
    normalizer: TextNormalizer,
    best_model: Box<dyn SpamClassifier>,
}

impl PipelineOutcome {
    /// Classify new raw messages with the selected model and frozen
    /// vectorizer.
    pub fn predict(&self, texts: &[String]) -> Vec<Prediction> {
        let cleaned: Vec<String> = texts.iter().map(|t| self.normalizer.normalize(t)).collect();
        let features = self.vectorizer.transform(&cleaned);
        let labels = self.best_model.predict(&features);
        let probs = self.best_model.predict_proba(&features);

        texts
            .iter()
            .zip(labels.iter().zip(probs.iter()))
            .map(|(message, (&label, &prob))| {
                let prediction = Label::from_i32(label).as_str().to_string();
                log::info!("Message: {} => {} (p={:.3})", message, prediction, prob);
                Prediction {
                    message: message.clone(),
                    prediction,
                    probability: prob,
                }
            })
            .collect()
    }
}

/// The pipeline driver. One instance runs one configuration.
pub struct SpamPipeline {
    config: PipelineConfig,
}

impl SpamPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        SpamPipeline { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default())
    }

    /// Run the full pipeline on a loaded dataset.
    ///
    /// Candidates that fail to fit are logged and excluded; the run aborts
    /// only when no candidate survives.
    pub fn run(&self, dataset: &Dataset) -> Result<PipelineOutcome, PipelineError> {
        if dataset.is_empty() {
            return Err(PipelineError::data("dataset contains no records"));
        }
        dataset.log_summary();

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let (train, test) = stratified_split(dataset, self.config.test_fraction, &mut rng);
        if train.is_empty() || test.is_empty() {
            return Err(PipelineError::data(
                "train/test split produced an empty half; dataset too small",
            ));
        }

        let normalizer = TextNormalizer::new(LanguageResources::embedded());
        let train_norm: Vec<NormalizedRecord> = train
            .records()
            .iter()
            .map(|r| NormalizedRecord {
                clean_text: normalizer.normalize(&r.message),
                label: r.label,
            })
            .collect();
        let test_norm: Vec<NormalizedRecord> = test
            .records()
            .iter()
            .map(|r| NormalizedRecord {
                clean_text: normalizer.normalize(&r.message),
                label: r.label,
            })
            .collect();

        let balanced = balance(&train_norm, &mut rng);
        let train_texts: Vec<String> = balanced.iter().map(|r| r.clean_text.clone()).collect();
        let y_train: Vec<i32> = balanced.iter().map(|r| r.label.as_i32()).collect();
        let test_texts: Vec<String> = test_norm.iter().map(|r| r.clean_text.clone()).collect();
        let y_test: Vec<i32> = test_norm.iter().map(|r| r.label.as_i32()).collect();

        let vectorizer = TfidfVectorizer::fit(self.config.vectorizer.clone(), &train_texts)?;
        let x_train = vectorizer.transform(&train_texts);
        let x_test = vectorizer.transform(&test_texts);

        let folds =
            StratifiedKFold::new(self.config.n_folds, self.config.seed).split(&y_train);

        let mut results = Vec::new();
        let mut fitted: Vec<Box<dyn SpamClassifier>> = Vec::new();
        for candidate in &self.config.candidates {
            log::info!("Evaluating candidate: {}", candidate.name);
            match self.evaluate_candidate(
                candidate,
                &x_train,
                &y_train,
                &x_test,
                &y_test,
                &folds,
                &vectorizer,
            ) {
                Ok((result, model)) => {
                    results.push(result);
                    fitted.push(model);
                }
                Err(err) => {
                    log::warn!("Candidate '{}' excluded from selection: {}", candidate.name, err);
                }
            }
        }

        // Highest test F1 wins; strict comparison keeps ties on the earlier
        // candidate.
        let best_idx = results
            .iter()
            .enumerate()
            .fold(None::<(usize, f32)>, |best, (idx, r)| match best {
                Some((_, f1)) if r.test_metrics.f1 <= f1 => best,
                _ => Some((idx, r.test_metrics.f1)),
            })
            .map(|(idx, _)| idx)
            .ok_or_else(|| {
                PipelineError::model_fit("pipeline", "every candidate model failed to fit")
            })?;

        let best_name = results[best_idx].name.clone();
        let best_model = fitted.swap_remove(best_idx);
        log::info!("Best classifier by test F1: {}", best_name);

        Ok(PipelineOutcome {
            results,
            best_name,
            vectorizer,
            normalizer,
            best_model,
        })
    }

    fn evaluate_candidate(
        &self,
        candidate: &ModelConfig,
        x_train: &CsrMatrix,
        y_train: &[i32],
        x_test: &CsrMatrix,
        y_test: &[i32],
        folds: &[Vec<usize>],
        vectorizer: &TfidfVectorizer,
    ) -> Result<(EvaluationResult, Box<dyn SpamClassifier>), PipelineError> {
        let cv_metrics = cross_validate(candidate, x_train, y_train, folds)?;

        let mut model = factory::build_model(candidate);
        model.fit(x_train, y_train)?;

        let (test_metrics, confusion, roc) = evaluate(model.as_ref(), x_test, y_test);
        log::info!(
            "{}: test accuracy={:.3} precision={:.3} recall={:.3} f1={:.3} auc={:.3}",
            candidate.name,
            test_metrics.accuracy,
            test_metrics.precision,
            test_metrics.recall,
            test_metrics.f1,
            test_metrics.roc_auc
        );

        let feature_importance =
            match feature_importance::extract(model.as_ref(), vectorizer, self.config.top_features)
            {
                Ok(table) => Some(table),
                Err(err) => {
                    log::error!("Feature importance unavailable for '{}': {}", candidate.name, err);
                    None
                }
            };

        Ok((
            EvaluationResult {
                name: candidate.name.clone(),
                cv_metrics,
                test_metrics,
                confusion,
                roc,
                feature_importance,
            },
            model,
        ))
    }
}

/// Mean metrics across stratified folds for one candidate.
///
/// Folds are evaluated in parallel; each fold fits a fresh model on the
/// complement rows and scores the held-out fold. A fit failure in any fold
/// fails the candidate.
pub fn cross_validate(
    candidate: &ModelConfig,
    x: &CsrMatrix,
    y: &[i32],
    folds: &[Vec<usize>],
) -> Result<MetricSet, PipelineError> {
    let per_fold: Vec<MetricSet> = folds
        .par_iter()
        .map(|val_indices| {
            let in_val = {
                let mut mask = vec![false; y.len()];
                for &i in val_indices {
                    mask[i] = true;
                }
                mask
            };
            let train_indices: Vec<usize> =
                (0..y.len()).filter(|&i| !in_val[i]).collect();

            let x_fold_train = x.select_rows(&train_indices);
            let y_fold_train: Vec<i32> = train_indices.iter().map(|&i| y[i]).collect();
            let x_fold_val = x.select_rows(val_indices);
            let y_fold_val: Vec<i32> = val_indices.iter().map(|&i| y[i]).collect();

            let mut model = factory::build_model(candidate);
            model.fit(&x_fold_train, &y_fold_train)?;

            let (metrics, _, _) = evaluate(model.as_ref(), &x_fold_val, &y_fold_val);
            Ok(metrics)
        })
        .collect::<Result<_, PipelineError>>()?;

    Ok(MetricSet {
        accuracy: stats::mean(&per_fold.iter().map(|m| m.accuracy).collect::<Vec<_>>()),
        precision: stats::mean(&per_fold.iter().map(|m| m.precision).collect::<Vec<_>>()),
        recall: stats::mean(&per_fold.iter().map(|m| m.recall).collect::<Vec<_>>()),
        f1: stats::mean(&per_fold.iter().map(|m| m.f1).collect::<Vec<_>>()),
        roc_auc: stats::mean(&per_fold.iter().map(|m| m.roc_auc).collect::<Vec<_>>()),
    })
}

/// Single evaluation of a fitted model: hard labels via the decision rule,
/// probabilities for ROC, and the full metric set.
pub fn evaluate(
    model: &dyn SpamClassifier,
    x: &CsrMatrix,
    y: &[i32],
) -> (MetricSet, ConfusionMatrix, RocCurve) {
    let pred = model.predict(x);
    let probs = Array1::from_vec(model.predict_proba(x));

    let accuracy = stats::accuracy(y, &pred);
    let (precision, recall, f1) = stats::precision_recall_f1(y, &pred);
    let roc_auc = stats::roc_auc(y, &probs);
    let confusion = stats::confusion_matrix(y, &pred);
    let roc = stats::roc_curve(y, &probs);

    (
        MetricSet {
            accuracy,
            precision,
            recall,
            f1,
            roc_auc,
        },
        confusion,
        roc,
    )
}
