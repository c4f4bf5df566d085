#[cfg(feature = "ssr")]
pub mod gemini;
#[cfg(feature = "ssr")]
pub mod prompt_generation;

#[cfg(feature = "ssr")]
pub use gemini::{GeminiClient, PromptModel};
#[cfg(feature = "ssr")]
pub use prompt_generation::*;
