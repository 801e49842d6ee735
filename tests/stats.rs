//! Integration tests for classification metrics.

use spamsieve::math::Array1;
use spamsieve::stats::{
    accuracy, confusion_matrix, precision_recall_f1, roc_auc, roc_curve,
};

// ---------------------------------------------------------------------------
// Confusion matrix and threshold metrics
// ---------------------------------------------------------------------------

#[test]
fn confusion_matrix_orientation() {
    // rows = truth, columns = prediction, index 1 = spam
    let truth = vec![0, 0, 1, 1, 1];
    let pred = vec![0, 1, 1, 1, 0];
    let m = confusion_matrix(&truth, &pred);
    assert_eq!(m[0][0], 1, "true negatives");
    assert_eq!(m[0][1], 1, "false positives");
    assert_eq!(m[1][0], 1, "false negatives");
    assert_eq!(m[1][1], 2, "true positives");
}

#[test]
fn accuracy_counts_matches() {
    let truth = vec![0, 1, 0, 1];
    assert!((accuracy(&truth, &[0, 1, 0, 1]) - 1.0).abs() < 1e-6);
    assert!((accuracy(&truth, &[1, 0, 1, 0]) - 0.0).abs() < 1e-6);
    assert!((accuracy(&truth, &[0, 1, 1, 0]) - 0.5).abs() < 1e-6);
}

#[test]
fn perfect_predictions_give_unit_f1() {
    let truth = vec![0, 1, 0, 1, 1];
    let (p, r, f1) = precision_recall_f1(&truth, &truth);
    assert!((p - 1.0).abs() < 1e-6);
    assert!((r - 1.0).abs() < 1e-6);
    assert!((f1 - 1.0).abs() < 1e-6);
}

#[test]
fn all_ham_dataset_yields_zero_precision_without_panicking() {
    // No spam in truth and none predicted: the spam column of the confusion
    // matrix stays empty and the undefined precision is reported as 0.
    let truth = vec![0, 0, 0, 0];
    let pred = vec![0, 0, 0, 0];

    let m = confusion_matrix(&truth, &pred);
    assert_eq!(m[0][1], 0, "top-right cell must be zero");
    assert_eq!(m[1][1], 0, "bottom-right cell must be zero");

    let (p, r, f1) = precision_recall_f1(&truth, &pred);
    assert_eq!(p, 0.0);
    assert_eq!(r, 0.0);
    assert_eq!(f1, 0.0);
}

// ---------------------------------------------------------------------------
// ROC curve and AUC
// ---------------------------------------------------------------------------

#[test]
fn roc_curve_starts_at_origin_and_ends_at_one_one() {
    let truth = vec![0, 0, 1, 1];
    let scores = Array1::from_vec(vec![0.1, 0.4, 0.35, 0.8]);
    let curve = roc_curve(&truth, &scores);

    assert_eq!(curve.fpr[0], 0.0);
    assert_eq!(curve.tpr[0], 0.0);
    assert!(curve.thresholds[0].is_infinite());

    let last = curve.fpr.len() - 1;
    assert!((curve.fpr[last] - 1.0).abs() < 1e-6);
    assert!((curve.tpr[last] - 1.0).abs() < 1e-6);

    assert_eq!(curve.fpr.len(), curve.tpr.len());
    assert_eq!(curve.fpr.len(), curve.thresholds.len());
}

#[test]
fn auc_is_one_for_perfectly_separated_scores() {
    let truth = vec![0, 0, 0, 1, 1];
    let scores = Array1::from_vec(vec![0.1, 0.2, 0.3, 0.8, 0.9]);
    assert!((roc_auc(&truth, &scores) - 1.0).abs() < 1e-6);
}

#[test]
fn auc_is_zero_for_perfectly_inverted_scores() {
    let truth = vec![1, 1, 0, 0];
    let scores = Array1::from_vec(vec![0.1, 0.2, 0.8, 0.9]);
    assert!(roc_auc(&truth, &scores).abs() < 1e-6);
}

#[test]
fn auc_is_half_for_tied_scores() {
    let truth = vec![0, 1, 0, 1];
    let scores = Array1::from_vec(vec![0.5, 0.5, 0.5, 0.5]);
    assert!((roc_auc(&truth, &scores) - 0.5).abs() < 1e-6);
}

#[test]
fn roc_handles_single_class_truth() {
    // Degenerate truth: no positives. The tpr axis stays at zero and nothing
    // panics.
    let truth = vec![0, 0, 0];
    let scores = Array1::from_vec(vec![0.2, 0.5, 0.9]);
    let curve = roc_curve(&truth, &scores);
    for v in curve.tpr.iter() {
        assert_eq!(*v, 0.0);
    }
}
