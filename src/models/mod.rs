pub mod classifier_trait;
pub mod factory;
pub mod logistic;
pub mod naive_bayes;
