//! Binary classification metrics: confusion counts, accuracy, precision,
//! recall, F1, ROC curve and ROC-AUC. Spam (1) is the positive class.
use serde::Serialize;

use crate::math::Array1;

/// 2x2 confusion counts; rows are truth, columns are prediction,
/// index 0 = ham, index 1 = spam.
pub type ConfusionMatrix = [[usize; 2]; 2];

/// The named metrics reported for both cross-validation and test evaluation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricSet {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub roc_auc: f32,
}

/// ROC curve points: parallel false-positive-rate, true-positive-rate and
/// decision-threshold arrays.
#[derive(Debug, Clone, Serialize)]
pub struct RocCurve {
    pub fpr: Array1<f32>,
    pub tpr: Array1<f32>,
    pub thresholds: Array1<f32>,
}

/// Count confusion cells for 0/1 truth and prediction vectors.
pub fn confusion_matrix(truth: &[i32], pred: &[i32]) -> ConfusionMatrix {
    assert_eq!(truth.len(), pred.len(), "truth and prediction length mismatch");
    let mut m = [[0usize; 2]; 2];
    for (&t, &p) in truth.iter().zip(pred.iter()) {
        m[(t == 1) as usize][(p == 1) as usize] += 1;
    }
    m
}

pub fn accuracy(truth: &[i32], pred: &[i32]) -> f32 {
    assert_eq!(truth.len(), pred.len(), "truth and prediction length mismatch");
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth.iter().zip(pred.iter()).filter(|(t, p)| t == p).count();
    correct as f32 / truth.len() as f32
}

/// Binary precision, recall and F1 for the positive (spam) class.
///
/// Undefined ratios (zero denominators, as in an all-ham evaluation where no
/// spam is ever predicted) are reported as 0.0 rather than raised.
pub fn precision_recall_f1(truth: &[i32], pred: &[i32]) -> (f32, f32, f32) {
    let m = confusion_matrix(truth, pred);
    let tp = m[1][1] as f32;
    let fp = m[0][1] as f32;
    let fn_ = m[1][0] as f32;

    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    (precision, recall, f1)
}

/// Compute the full ROC curve from positive-class scores.
///
/// Points are emitted at every distinct score threshold, scanned from the
/// highest score down, starting from the (0, 0) corner with an infinite
/// threshold. With a degenerate truth vector (all one class) the undefined
/// rate axis stays at zero for every point.
///
/// # Arguments
///
/// * `truth` - 0/1 truth labels.
/// * `scores` - positive-class scores, one per row, higher means more spam-like.
pub fn roc_curve(truth: &[i32], scores: &Array1<f32>) -> RocCurve {
    assert_eq!(truth.len(), scores.len(), "truth and score length mismatch");

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n_pos = truth.iter().filter(|&&t| t == 1).count() as f32;
    let n_neg = truth.len() as f32 - n_pos;

    let mut fpr = vec![0.0f32];
    let mut tpr = vec![0.0f32];
    let mut thresholds = vec![f32::INFINITY];

    let mut tp = 0.0f32;
    let mut fp = 0.0f32;
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        // Consume every row sharing this score so tied scores yield one point.
        while i < order.len() && scores[order[i]] == threshold {
            if truth[order[i]] == 1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        fpr.push(if n_neg > 0.0 { fp / n_neg } else { 0.0 });
        tpr.push(if n_pos > 0.0 { tp / n_pos } else { 0.0 });
        thresholds.push(threshold);
    }

    RocCurve {
        fpr: Array1::from_vec(fpr),
        tpr: Array1::from_vec(tpr),
        thresholds: Array1::from_vec(thresholds),
    }
}

/// Area under the ROC curve by trapezoidal integration.
pub fn roc_auc(truth: &[i32], scores: &Array1<f32>) -> f32 {
    let curve = roc_curve(truth, scores);
    let mut auc = 0.0f32;
    for i in 1..curve.fpr.len() {
        let dx = curve.fpr[i] - curve.fpr[i - 1];
        auc += dx * (curve.tpr[i] + curve.tpr[i - 1]) / 2.0;
    }
    auc
}

/// Mean of per-fold metric values.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}
