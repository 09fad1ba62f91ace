//! Text generation backends

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiGenerator};
