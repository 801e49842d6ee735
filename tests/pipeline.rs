//! End-to-end pipeline tests: fold construction, deterministic training runs,
//! model selection and demo inference.

use spamsieve::config::{ModelConfig, ModelType, PipelineConfig};
use spamsieve::data_handling::{Dataset, Label, Record};
use spamsieve::pipeline::{SpamPipeline, StratifiedKFold};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The scenario corpus: two message templates repeated at a 3:1 ham:spam
/// ratio.
fn scenario_dataset(n_ham: usize, n_spam: usize) -> Dataset {
    let mut records = Vec::new();
    for _ in 0..n_ham {
        records.push(Record {
            message: "Call me when free".to_string(),
            label: Label::Ham,
        });
    }
    for _ in 0..n_spam {
        records.push(Record {
            message: "WIN a FREE prize call now 09061".to_string(),
            label: Label::Spam,
        });
    }
    Dataset::new(records).unwrap()
}

// ---------------------------------------------------------------------------
// Stratified k-fold
// ---------------------------------------------------------------------------

#[test]
fn each_record_lands_in_exactly_one_validation_fold() {
    let labels: Vec<i32> = (0..20).map(|i| (i % 4 == 0) as i32).collect();
    let folds = StratifiedKFold::new(5, 42).split(&labels);
    assert_eq!(folds.len(), 5);

    let mut seen = vec![0usize; labels.len()];
    for fold in &folds {
        for &idx in fold {
            seen[idx] += 1;
        }
    }
    assert!(
        seen.iter().all(|&count| count == 1),
        "every record must appear in exactly one validation fold: {:?}",
        seen
    );
}

#[test]
fn folds_preserve_class_ratio() {
    // 15 ham, 5 spam over 5 folds: 3 ham + 1 spam per fold.
    let labels: Vec<i32> = (0..20).map(|i| (i % 4 == 0) as i32).collect();
    let folds = StratifiedKFold::new(5, 7).split(&labels);

    for (i, fold) in folds.iter().enumerate() {
        let spam = fold.iter().filter(|&&idx| labels[idx] == 1).count();
        assert_eq!(fold.len(), 4, "fold {} size", i);
        assert_eq!(spam, 1, "fold {} spam count", i);
    }
}

#[test]
fn fold_sizes_stay_even_when_both_classes_leave_remainders() {
    // 7 ham, 6 spam over 5 folds: neither class divides evenly.
    let labels: Vec<i32> = (0..13).map(|i| (i < 6) as i32).collect();
    let folds = StratifiedKFold::new(5, 42).split(&labels);

    let sizes: Vec<usize> = folds.iter().map(|f| f.len()).collect();
    let max = *sizes.iter().max().unwrap();
    let min = *sizes.iter().min().unwrap();
    assert!(max - min <= 1, "fold sizes too uneven: {:?}", sizes);
    assert_eq!(sizes.iter().sum::<usize>(), 13);
}

#[test]
fn fold_assignment_is_deterministic() {
    let labels: Vec<i32> = (0..30).map(|i| (i % 3 == 0) as i32).collect();
    let a = StratifiedKFold::new(5, 11).split(&labels);
    let b = StratifiedKFold::new(5, 11).split(&labels);
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Full pipeline runs
// ---------------------------------------------------------------------------

#[test]
fn scenario_run_is_deterministic_for_a_fixed_seed() {
    init_logging();
    let dataset = scenario_dataset(12, 4);

    let first = SpamPipeline::with_defaults().run(&dataset).unwrap();
    let second = SpamPipeline::with_defaults().run(&dataset).unwrap();

    assert_eq!(first.best_name, second.best_name);
    for (a, b) in first.results.iter().zip(second.results.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.confusion, b.confusion, "confusion matrix must be reproducible");
        assert_eq!(a.test_metrics.f1, b.test_metrics.f1, "F1 must be reproducible");
        assert_eq!(a.cv_metrics.f1, b.cv_metrics.f1);
    }
}

#[test]
fn scenario_run_evaluates_both_candidates_and_selects_one() {
    init_logging();
    let dataset = scenario_dataset(12, 4);
    let outcome = SpamPipeline::with_defaults().run(&dataset).unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert!(outcome
        .results
        .iter()
        .any(|r| r.name == outcome.best_name));

    for result in &outcome.results {
        // Confusion cells must account for the whole test split (20% of 16).
        let total: usize = result.confusion.iter().flatten().sum();
        assert_eq!(total, 3);

        let table = result
            .feature_importance
            .as_ref()
            .expect("both candidate families support importance extraction");
        assert!(!table.spam.is_empty());
        assert!(!table.ham.is_empty());

        for m in [&result.cv_metrics, &result.test_metrics] {
            assert!(m.accuracy >= 0.0 && m.accuracy <= 1.0);
            assert!(m.f1 >= 0.0 && m.f1 <= 1.0);
            assert!(m.roc_auc >= 0.0 && m.roc_auc <= 1.0);
        }
    }
}

#[test]
fn separable_corpus_is_classified_cleanly() {
    init_logging();
    let dataset = scenario_dataset(24, 8);
    let outcome = SpamPipeline::with_defaults().run(&dataset).unwrap();

    let best = outcome
        .results
        .iter()
        .find(|r| r.name == outcome.best_name)
        .unwrap();
    assert!(
        best.test_metrics.f1 > 0.99,
        "perfectly separable templates should reach F1 ~ 1.0, got {}",
        best.test_metrics.f1
    );
}

#[test]
fn predict_matches_the_demo_contract() {
    init_logging();
    let dataset = scenario_dataset(24, 8);
    let outcome = SpamPipeline::with_defaults().run(&dataset).unwrap();

    let samples = vec![
        "WIN a FREE prize call now".to_string(),
        "Call me when free".to_string(),
    ];
    let predictions = outcome.predict(&samples);

    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].message, samples[0]);
    assert_eq!(predictions[0].prediction, "SPAM");
    assert_eq!(predictions[1].prediction, "HAM");
    for p in &predictions {
        assert!(
            p.probability >= 0.0 && p.probability <= 1.0,
            "probability out of range: {}",
            p.probability
        );
    }
}

#[test]
fn failing_candidate_is_excluded_without_aborting_the_run() {
    init_logging();
    let dataset = scenario_dataset(12, 4);

    let mut config = PipelineConfig::default();
    config.candidates = vec![
        ModelConfig::new(
            "Broken Logistic",
            ModelType::LogisticRegression {
                learning_rate: f32::NAN,
                l2: 1e-4,
                max_iter: 10,
                tol: 1e-5,
            },
        ),
        ModelConfig::new("Multinomial Naive Bayes", ModelType::MultinomialNb { alpha: 0.5 }),
    ];

    let outcome = SpamPipeline::new(config).run(&dataset).unwrap();
    assert_eq!(outcome.results.len(), 1, "diverging candidate must be excluded");
    assert_eq!(outcome.best_name, "Multinomial Naive Bayes");
}

#[test]
fn empty_dataset_is_fatal_before_any_model_work() {
    let err = Dataset::new(vec![])
        .and_then(|ds| SpamPipeline::with_defaults().run(&ds).map(|_| ()))
        .unwrap_err();
    assert!(err.to_string().contains("no records"));
}

#[test]
fn tiny_dataset_fails_cleanly_instead_of_panicking() {
    init_logging();
    let dataset = scenario_dataset(2, 1);
    // 5-fold CV over a handful of rows cannot give every fold both classes;
    // the run must end in an error, not a panic.
    assert!(SpamPipeline::with_defaults().run(&dataset).is_err());
}
