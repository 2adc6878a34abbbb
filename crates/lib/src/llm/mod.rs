//! Language-model access. Only location extraction uses a model today.

mod gemini;

pub use gemini::{location_prompt, GeminiClient, GeminiError, LocationModel, DEFAULT_MODEL};
