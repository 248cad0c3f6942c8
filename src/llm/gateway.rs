//! Generation gateway: one prompt in, one completion out.
//!
//! Every call goes out as a single attempt with the career-consultant system
//! instruction in front of the prompt. Failures come back as
//! `GenerationError`, which callers turn into a user-facing notice.

use std::sync::Arc;

use crate::error::GenerationError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// System instruction sent with every generation request.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Ты — карьерный консультант. \
Отвечай кратко, структурированно, используй эмодзи для наглядности. \
Фокусируйся на практических шагах.";

/// Thin wrapper around an `LlmProvider` with a fixed system instruction.
pub struct GenerationGateway {
    llm: Arc<dyn LlmProvider>,
    system_instruction: String,
}

impl GenerationGateway {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Submit a prompt and return the completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(&self.system_instruction),
            ChatMessage::user(prompt),
        ]);

        let response = self.llm.complete(request).await.map_err(|e| {
            tracing::warn!(model = %self.llm.model_name(), error = %e, "Generation failed");
            GenerationError::Backend(e)
        })?;

        let cost = self
            .llm
            .calculate_cost(response.input_tokens, response.output_tokens);
        tracing::debug!(
            model = %self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            cost_usd = %cost,
            "Generation complete"
        );

        let text = response.content.trim();
        if text.is_empty() {
            tracing::warn!(
                model = %self.llm.model_name(),
                finish_reason = ?response.finish_reason,
                "Generation returned no usable content"
            );
            return Err(GenerationError::EmptyResponse);
        }

        Ok(text.to_string())
    }
}
