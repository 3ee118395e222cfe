mod binding;
mod client;
mod types;

pub use binding::{ApiSurface, BindingReport, GenerateMethod, ModelBinding, CANDIDATE_SURFACES};
pub use client::{GeminiClient, ModelHandle};
pub use types::*;
