//! Data structures and helpers for labeled message datasets.
//!
//! This module defines `Record` and `Dataset` and contains helpers for
//! summarizing a corpus, creating the stratified train/test split, and
//! oversampling the minority class in the training split.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Message class. Spam is the positive class throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// Parse a corpus label column value ("ham" / "spam", case-insensitive).
    pub fn parse(s: &str) -> Result<Self, PipelineError> {
        match s.trim().to_lowercase().as_str() {
            "ham" => Ok(Label::Ham),
            "spam" => Ok(Label::Spam),
            other => Err(PipelineError::data(format!(
                "unknown label '{}', expected 'ham' or 'spam'",
                other
            ))),
        }
    }

    /// Numeric encoding used by the models: ham = 0, spam = 1.
    pub fn as_i32(self) -> i32 {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn from_i32(value: i32) -> Self {
        if value == 1 {
            Label::Spam
        } else {
            Label::Ham
        }
    }

    /// Upper-case display form used in prediction output.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ham => "HAM",
            Label::Spam => "SPAM",
        }
    }
}

/// One raw labeled message. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub message: String,
    pub label: Label,
}

/// A message with its normalized text, derived 1:1 from a `Record`.
/// `clean_text` is never empty; the normalizer substitutes a sentinel
/// placeholder when all content is filtered out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub clean_text: String,
    pub label: Label,
}

/// Ordered sequence of records. Every record has non-empty raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

/// Key corpus statistics, logged at the start of a run.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub spam: usize,
    pub ham: usize,
    pub spam_pct: f64,
    pub ham_pct: f64,
    pub avg_length: f64,
    pub max_length: usize,
}

impl Dataset {
    /// Wrap records, rejecting empty messages. Positions are reported as
    /// record indices; file line numbers are the reader's concern.
    pub fn new(records: Vec<Record>) -> Result<Self, PipelineError> {
        for (i, record) in records.iter().enumerate() {
            if record.message.trim().is_empty() {
                return Err(PipelineError::data(format!(
                    "empty message text at record {}",
                    i + 1
                )));
            }
        }
        Ok(Dataset { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn labels(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.label.as_i32()).collect()
    }

    /// (ham, spam) record counts.
    pub fn class_counts(&self) -> (usize, usize) {
        let spam = self
            .records
            .iter()
            .filter(|r| r.label == Label::Spam)
            .count();
        (self.records.len() - spam, spam)
    }

    pub fn summarize(&self) -> DatasetSummary {
        let total = self.records.len();
        let (ham, spam) = self.class_counts();
        let lengths: Vec<usize> = self.records.iter().map(|r| r.message.chars().count()).collect();
        let avg_length = if total == 0 {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / total as f64
        };
        let max_length = lengths.iter().copied().max().unwrap_or(0);

        DatasetSummary {
            total,
            spam,
            ham,
            spam_pct: if total == 0 { 0.0 } else { spam as f64 / total as f64 * 100.0 },
            ham_pct: if total == 0 { 0.0 } else { ham as f64 / total as f64 * 100.0 },
            avg_length,
            max_length,
        }
    }

    pub fn log_summary(&self) {
        let summary = self.summarize();
        log::info!(
            "Corpus: {} messages ({} spam / {:.2}%, {} ham / {:.2}%), avg length {:.1}, max length {}",
            summary.total,
            summary.spam,
            summary.spam_pct,
            summary.ham,
            summary.ham_pct,
            summary.avg_length,
            summary.max_length
        );
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }
}

/// Split a dataset into disjoint train/test halves, preserving class
/// proportions.
///
/// Records of each class are shuffled independently and the first
/// `test_fraction` of each class goes to the test half, so the class ratio in
/// both halves stays within rounding of the original. The halves partition
/// the input: `|train| + |test| == |dataset|`.
pub fn stratified_split(
    dataset: &Dataset,
    test_fraction: f64,
    rng: &mut StdRng,
) -> (Dataset, Dataset) {
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for class in [Label::Ham, Label::Spam] {
        let mut class_indices: Vec<usize> = dataset
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| if r.label == class { Some(i) } else { None })
            .collect();
        class_indices.shuffle(rng);

        let n_test = (class_indices.len() as f64 * test_fraction).round() as usize;
        test_indices.extend_from_slice(&class_indices[..n_test]);
        train_indices.extend_from_slice(&class_indices[n_test..]);
    }

    // Keep the halves shuffled rather than grouped by class.
    train_indices.shuffle(rng);
    test_indices.shuffle(rng);

    let train = dataset.select(&train_indices);
    let test = dataset.select(&test_indices);
    log::info!("Split sizes -- train: {}, test: {}", train.len(), test.len());
    (train, test)
}

/// Balance the training split by random oversampling with replacement.
///
/// The minority class is duplicated up to exact parity with the majority
/// class, and the combined result is shuffled. Applied to the training split
/// only; test data keeps its natural class ratio.
pub fn balance(records: &[NormalizedRecord], rng: &mut StdRng) -> Vec<NormalizedRecord> {
    let spam: Vec<&NormalizedRecord> =
        records.iter().filter(|r| r.label == Label::Spam).collect();
    let ham: Vec<&NormalizedRecord> = records.iter().filter(|r| r.label == Label::Ham).collect();

    if spam.is_empty() || ham.is_empty() {
        log::warn!("Cannot balance a single-class training split; leaving it unchanged");
        return records.to_vec();
    }

    let (minority, majority) = if spam.len() < ham.len() {
        (&spam, &ham)
    } else {
        (&ham, &spam)
    };

    let mut balanced = records.to_vec();
    for _ in 0..(majority.len() - minority.len()) {
        let pick = minority[rng.gen_range(0..minority.len())];
        balanced.push(pick.clone());
    }
    balanced.shuffle(rng);

    let n_spam = balanced.iter().filter(|r| r.label == Label::Spam).count();
    log::info!(
        "Balanced training split: ham={}, spam={}",
        balanced.len() - n_spam,
        n_spam
    );
    balanced
}
