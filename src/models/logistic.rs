//! L2-regularized logistic regression with balanced class weighting.
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::math::CsrMatrix;
use crate::models::classifier_trait::{ImportanceSource, SpamClassifier};

/// Binary logistic regression fitted by full-batch gradient descent on the
/// sparse feature matrix.
///
/// Class weights are balanced (`n / (2 * n_class)`) so the oversampled
/// training split and the skewed CV folds both contribute comparable
/// gradients per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    name: String,
    learning_rate: f32,
    l2: f32,
    max_iter: usize,
    tol: f32,
    weights: Vec<f32>,
    bias: f32,
}

impl LogisticRegression {
    pub fn new(
        name: impl Into<String>,
        learning_rate: f32,
        l2: f32,
        max_iter: usize,
        tol: f32,
    ) -> Self {
        LogisticRegression {
            name: name.into(),
            learning_rate,
            l2,
            max_iter,
            tol,
            weights: Vec::new(),
            bias: 0.0,
        }
    }

    fn decision_function(&self, x: &CsrMatrix) -> Vec<f32> {
        (0..x.nrows())
            .map(|row| x.row_dot(row, &self.weights) + self.bias)
            .collect()
    }
}

fn sigmoid(z: f32) -> f32 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl SpamClassifier for LogisticRegression {
    fn fit(&mut self, x: &CsrMatrix, y: &[i32]) -> Result<(), PipelineError> {
        if x.nrows() != y.len() {
            return Err(PipelineError::model_fit(
                &self.name,
                format!("{} rows but {} labels", x.nrows(), y.len()),
            ));
        }

        let n = y.len() as f32;
        let n_spam = y.iter().filter(|&&l| l == 1).count() as f32;
        let n_ham = n - n_spam;
        if n_spam == 0.0 || n_ham == 0.0 {
            return Err(PipelineError::model_fit(
                &self.name,
                "training data contains a single class",
            ));
        }

        // Balanced class weights, sklearn style: n / (n_classes * n_c).
        let weight_ham = n / (2.0 * n_ham);
        let weight_spam = n / (2.0 * n_spam);

        let ncols = x.ncols();
        self.weights = vec![0.0; ncols];
        self.bias = 0.0;

        let mut converged = false;
        for iter in 0..self.max_iter {
            let mut grad_w = vec![0.0f32; ncols];
            let mut grad_b = 0.0f32;

            for row in 0..x.nrows() {
                let z = x.row_dot(row, &self.weights) + self.bias;
                let target = (y[row] == 1) as i32 as f32;
                let sample_weight = if y[row] == 1 { weight_spam } else { weight_ham };
                let residual = sample_weight * (sigmoid(z) - target);

                let (cols, vals) = x.row(row);
                for (&col, &val) in cols.iter().zip(vals.iter()) {
                    grad_w[col] += residual * val;
                }
                grad_b += residual;
            }

            grad_b /= n;
            let mut grad_norm = grad_b * grad_b;
            for col in 0..ncols {
                grad_w[col] = grad_w[col] / n + self.l2 * self.weights[col];
                grad_norm += grad_w[col] * grad_w[col];
                self.weights[col] -= self.learning_rate * grad_w[col];
            }
            self.bias -= self.learning_rate * grad_b;

            if !grad_norm.is_finite() {
                return Err(PipelineError::model_fit(
                    &self.name,
                    format!("gradient diverged at iteration {}", iter),
                ));
            }
            if grad_norm.sqrt() < self.tol {
                log::debug!("{} converged after {} iterations", self.name, iter + 1);
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "{} reached max_iter={} without meeting tol={}",
                self.name,
                self.max_iter,
                self.tol
            );
        }
        Ok(())
    }

    fn predict(&self, x: &CsrMatrix) -> Vec<i32> {
        self.decision_function(x)
            .into_iter()
            .map(|z| (z > 0.0) as i32)
            .collect()
    }

    fn predict_proba(&self, x: &CsrMatrix) -> Vec<f32> {
        self.decision_function(x).into_iter().map(sigmoid).collect()
    }

    fn importance(&self) -> ImportanceSource {
        if self.weights.is_empty() {
            ImportanceSource::Unsupported
        } else {
            ImportanceSource::LinearWeighted(self.weights.clone())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_and_separate_toy_classes() {
        let x = CsrMatrix::from_rows(
            vec![
                vec![(0, 1.0)],
                vec![(1, 1.0)],
                vec![(0, 1.0), (2, 0.2)],
                vec![(1, 1.0), (2, 0.2)],
                vec![(0, 0.8)],
                vec![(1, 0.9)],
            ],
            3,
        )
        .unwrap();
        let y = vec![0, 1, 0, 1, 0, 1];

        let mut lr = LogisticRegression::new("lr", 0.5, 1e-4, 1000, 1e-5);
        lr.fit(&x, &y).unwrap();

        assert_eq!(lr.predict(&x), y);
        let probs = lr.predict_proba(&x);
        for p in &probs {
            assert!(*p >= 0.0 && *p <= 1.0);
        }
    }

    #[test]
    fn importance_exposes_linear_coefficients() {
        let x = CsrMatrix::from_rows(
            vec![vec![(0, 1.0)], vec![(1, 1.0)], vec![(0, 1.0)], vec![(1, 1.0)]],
            2,
        )
        .unwrap();
        let y = vec![0, 1, 0, 1];
        let mut lr = LogisticRegression::new("lr", 0.5, 1e-4, 500, 1e-6);
        assert!(matches!(lr.importance(), ImportanceSource::Unsupported));

        lr.fit(&x, &y).unwrap();
        match lr.importance() {
            ImportanceSource::LinearWeighted(coefs) => {
                assert_eq!(coefs.len(), 2);
                assert!(coefs[1] > 0.0, "spam column should have positive weight");
                assert!(coefs[0] < 0.0, "ham column should have negative weight");
            }
            other => panic!("expected linear coefficients, got {:?}", other),
        }
    }

    #[test]
    fn single_class_training_is_a_fit_error() {
        let x = CsrMatrix::from_rows(vec![vec![(0, 1.0)]], 1).unwrap();
        let mut lr = LogisticRegression::new("lr", 0.5, 1e-4, 10, 1e-5);
        let err = lr.fit(&x, &[1]).unwrap_err();
        assert!(matches!(err, PipelineError::ModelFit { .. }));
    }
}
