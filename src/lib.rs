//! spamsieve: supervised spam/ham classification for short text messages.
//!
//! This crate provides the full training pipeline: deterministic text
//! normalization, stratified splitting, minority-class oversampling, TF-IDF
//! vectorization, cross-validated model fitting (multinomial naive Bayes and
//! L2 logistic regression), metric-driven model selection, and per-class
//! feature-importance extraction.
//!
//! The design favors small, testable modules. Dataset retrieval, plotting and
//! report rendering are collaborator concerns; the pipeline consumes labeled
//! records and produces a fitted vectorizer, a fitted best model, and one
//! structured `EvaluationResult` per candidate.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod feature_importance;
pub mod io;
pub mod math;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod stats;
pub mod vectorize;
