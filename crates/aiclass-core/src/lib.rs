pub mod category;
pub mod result;
pub mod text;
pub mod wire;

pub use category::{Category, UnknownCategory};
pub use result::{ClassificationResult, Method};
pub use wire::{
    BatchPredictItem, CategoryEntry, ErrorResponse, HealthResponse, PredictRequest,
    PredictResponse, RootResponse,
};
