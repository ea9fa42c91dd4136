//! Request and response types for the prediction service

pub mod request;
pub mod response;

pub use request::PredictRequest;
pub use response::{MetadataResponse, PredictResponse};
