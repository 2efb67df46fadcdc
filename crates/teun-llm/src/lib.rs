pub mod client;
pub mod error;
pub mod json;
pub mod keywords;
pub mod prompts;
mod retry;

pub use client::{AnthropicClient, CompletionClient, CompletionRequest};
pub use error::LlmError;
pub use json::{parse_json, strip_code_fences};
pub use keywords::{fallback_keywords, infer_keywords};
pub use prompts::{GenerationInput, PromptGenerator, PromptPolicy};
