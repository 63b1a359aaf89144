//! # dqa-qa
//!
//! The question-answering engine for dqa: diversity-aware retrieval (MMR),
//! pluggable context compression, grounded prompt composition, and source
//! attribution, all behind one `answer_question` call that maps every
//! failure into a typed [`QaError`] instead of raising past the loop above.

pub mod engine;
pub mod error;
pub mod filter;
pub mod mmr;

pub use engine::{Answer, QaEngine, INSUFFICIENT_CONTEXT_ANSWER};
pub use error::{QaError, Result};
pub use filter::{ContextFilter, LlmExtractor, NoOpFilter};
