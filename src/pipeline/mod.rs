//! Prediction pipeline: validation, preprocessing, inference

pub mod inference;
pub mod preprocessor;
pub mod validator;

pub use inference::{InferenceEngine, Scored};
pub use preprocessor::Preprocessor;
pub use validator::{FeatureValidator, ValidatedFeatures};
