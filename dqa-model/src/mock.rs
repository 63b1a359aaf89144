//! Scriptable mock model for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::Llm;

type Handler = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// An [`Llm`] whose behaviour is scripted by the test.
///
/// Every received prompt is recorded and can be inspected afterwards via
/// [`prompts`](MockLlm::prompts).
///
/// # Example
///
/// ```rust,ignore
/// use dqa_model::MockLlm;
///
/// let llm = MockLlm::returning("Blue.");
/// assert_eq!(llm.generate("What color is the sky?").await?, "Blue.");
/// assert_eq!(llm.prompts().len(), 1);
/// ```
pub struct MockLlm {
    handler: Handler,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// A mock that answers every prompt with the same text.
    pub fn returning(response: impl Into<String>) -> Self {
        let response = response.into();
        Self::with_handler(move |_| Ok(response.clone()))
    }

    /// A mock that fails every prompt with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::with_handler(move |_| {
            Err(ModelError::Api { model: "mock".to_string(), message: message.clone() })
        })
    }

    /// A mock driven by an arbitrary prompt handler.
    pub fn with_handler(handler: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self { handler: Box::new(handler), prompts: Mutex::new(Vec::new()) }
    }

    /// The prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().expect("prompt log poisoned").push(prompt.to_string());
        (self.handler)(prompt)
    }
}
