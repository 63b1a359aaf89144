//! Generation model seam.

use async_trait::async_trait;

use crate::error::Result;

/// A text-generation model behind a single-shot completion interface.
///
/// Implementations wrap an external generation service. This system only
/// ever needs one deterministic, non-streaming completion per call, so the
/// seam is exactly that; anything fancier (streaming, tools, sampling)
/// stays on the other side of it.
#[async_trait]
pub trait Llm: Send + Sync {
    /// The model identifier, used in logs and error messages.
    fn name(&self) -> &str;

    /// Run one non-streaming completion for `prompt` and return its text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
