//! TF-IDF feature vectorization over unigrams and bigrams.
//!
//! The vocabulary is built once from the (balanced) training texts; every
//! later `transform` projects into that frozen vocabulary, so test columns
//! can never exceed the training columns. Terms must appear in at least
//! `min_df` training documents and in at most `max_df` of them.
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::error::PipelineError;
use crate::math::CsrMatrix;

/// A fitted TF-IDF vectorizer owning its vocabulary and idf weights.
///
/// There is no unfitted state: `fit` is an associated constructor, so a
/// vocabulary can never be rebuilt underneath matrices that reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Build the vocabulary and idf weights from training texts.
    ///
    /// Called exactly once per pipeline run. Fails if no term satisfies the
    /// document-frequency bounds.
    pub fn fit(config: VectorizerConfig, train_texts: &[String]) -> Result<Self, PipelineError> {
        if train_texts.is_empty() {
            return Err(PipelineError::data("cannot fit vectorizer on zero documents"));
        }

        let n_docs = train_texts.len();
        // Floor matches the usual "strictly more than max_df of documents is
        // too common" reading: a term in every document is dropped.
        let max_df_count = (config.max_df * n_docs as f64).floor() as usize;

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for text in train_texts {
            let terms = ngrams(text, config.ngram_max);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Deterministic column order: surviving terms sorted lexicographically.
        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= config.min_df && *df <= max_df_count)
            .collect();
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        if kept.is_empty() {
            return Err(PipelineError::data(format!(
                "no term satisfies the document-frequency bounds (min_df={}, max_df={})",
                config.min_df, config.max_df
            )));
        }

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, (term, df)) in kept.into_iter().enumerate() {
            vocabulary.insert(term, idx);
            // Smoothed idf: ln((1 + n) / (1 + df)) + 1
            idf.push(((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0);
        }

        log::info!("TF-IDF vocabulary size: {}", idf.len());
        Ok(TfidfVectorizer {
            config,
            vocabulary,
            idf,
        })
    }

    /// Project texts into the frozen vocabulary. Unseen terms contribute
    /// nothing; they are never an error.
    pub fn transform(&self, texts: &[String]) -> CsrMatrix {
        let rows: Vec<Vec<(usize, f32)>> = texts.iter().map(|t| self.transform_one(t)).collect();
        CsrMatrix::from_rows(rows, self.idf.len())
            .expect("vocabulary indices are bounded by construction")
    }

    fn transform_one(&self, text: &str) -> Vec<(usize, f32)> {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in ngrams(text, self.config.ngram_max) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.config.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (col, tf * self.idf[col])
            })
            .collect();
        row.sort_by_key(|&(col, _)| col);

        // L2 row normalization
        let norm = row.iter().map(|&(_, v)| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, v) in row.iter_mut() {
                *v /= norm;
            }
        }
        row
    }

    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    /// Vocabulary terms ordered by column index.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![String::new(); self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            names[idx] = term.clone();
        }
        names
    }
}

/// Whitespace tokens plus all n-grams up to `ngram_max`, joined by spaces.
fn ngrams(text: &str, ngram_max: usize) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut terms = Vec::new();
    for n in 1..=ngram_max.max(1) {
        if tokens.len() < n {
            break;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}
