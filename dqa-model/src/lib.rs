//! # dqa-model
//!
//! The generation seam for dqa. Exposes the [`Llm`] trait — one
//! deterministic, non-streaming completion per call — plus:
//!
//! - [`OpenAIChatModel`] — OpenAI chat completions at temperature 0
//! - [`MockLlm`] — scriptable mock for tests

pub mod error;
pub mod llm;
pub mod mock;
pub mod openai;

pub use error::{ModelError, Result};
pub use llm::Llm;
pub use mock::MockLlm;
pub use openai::OpenAIChatModel;
