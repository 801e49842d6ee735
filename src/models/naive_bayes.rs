//! Multinomial naive Bayes over TF-IDF features.
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::math::CsrMatrix;
use crate::models::classifier_trait::{ImportanceSource, SpamClassifier};

/// Multinomial naive Bayes with additive smoothing.
///
/// Per-class feature weights are estimated from summed feature values, so
/// fractional TF-IDF weights are accepted the same way raw counts are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    name: String,
    alpha: f32,
    state: Option<FittedNb>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FittedNb {
    /// log P(class), index 0 = ham, 1 = spam.
    class_log_prior: [f32; 2],
    /// log P(feature | class) per column.
    feature_log_prob: [Vec<f32>; 2],
}

impl MultinomialNb {
    pub fn new(name: impl Into<String>, alpha: f32) -> Self {
        MultinomialNb {
            name: name.into(),
            alpha,
            state: None,
        }
    }

    /// Per-row joint log likelihood for both classes.
    fn joint_log_likelihood(&self, x: &CsrMatrix) -> Vec<[f32; 2]> {
        let fitted = self.state.as_ref().expect("predict called before fit");
        (0..x.nrows())
            .map(|row| {
                let (cols, vals) = x.row(row);
                let mut jll = fitted.class_log_prior;
                for (&col, &val) in cols.iter().zip(vals.iter()) {
                    jll[0] += val * fitted.feature_log_prob[0][col];
                    jll[1] += val * fitted.feature_log_prob[1][col];
                }
                jll
            })
            .collect()
    }
}

impl SpamClassifier for MultinomialNb {
    fn fit(&mut self, x: &CsrMatrix, y: &[i32]) -> Result<(), PipelineError> {
        if x.nrows() != y.len() {
            return Err(PipelineError::model_fit(
                &self.name,
                format!("{} rows but {} labels", x.nrows(), y.len()),
            ));
        }

        let n_ham = y.iter().filter(|&&l| l == 0).count();
        let n_spam = y.len() - n_ham;
        if n_ham == 0 || n_spam == 0 {
            return Err(PipelineError::model_fit(
                &self.name,
                "training data contains a single class",
            ));
        }

        let ncols = x.ncols();
        let mut feature_totals = [vec![0.0f32; ncols], vec![0.0f32; ncols]];
        for (row, &label) in y.iter().enumerate() {
            let class = (label == 1) as usize;
            let (cols, vals) = x.row(row);
            for (&col, &val) in cols.iter().zip(vals.iter()) {
                feature_totals[class][col] += val;
            }
        }

        let n = y.len() as f32;
        let class_log_prior = [(n_ham as f32 / n).ln(), (n_spam as f32 / n).ln()];

        let mut feature_log_prob = [vec![0.0f32; ncols], vec![0.0f32; ncols]];
        for class in 0..2 {
            let total: f32 =
                feature_totals[class].iter().sum::<f32>() + self.alpha * ncols as f32;
            for col in 0..ncols {
                feature_log_prob[class][col] =
                    ((feature_totals[class][col] + self.alpha) / total).ln();
            }
        }

        self.state = Some(FittedNb {
            class_log_prior,
            feature_log_prob,
        });
        Ok(())
    }

    fn predict(&self, x: &CsrMatrix) -> Vec<i32> {
        self.joint_log_likelihood(x)
            .into_iter()
            .map(|jll| (jll[1] > jll[0]) as i32)
            .collect()
    }

    fn predict_proba(&self, x: &CsrMatrix) -> Vec<f32> {
        self.joint_log_likelihood(x)
            .into_iter()
            .map(|jll| {
                // log-sum-exp over the two classes
                let max = jll[0].max(jll[1]);
                let denom = (jll[0] - max).exp() + (jll[1] - max).exp();
                (jll[1] - max).exp() / denom
            })
            .collect()
    }

    fn importance(&self) -> ImportanceSource {
        match &self.state {
            Some(fitted) => ImportanceSource::LogProbWeighted {
                spam: fitted.feature_log_prob[1].clone(),
                ham: fitted.feature_log_prob[0].clone(),
            },
            None => ImportanceSource::Unsupported,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
