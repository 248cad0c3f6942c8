//! Command router: decides what an inbound message means for its sender.
//!
//! Order of precedence:
//! 1. `/start` and `/cancel` reset the user in any phase. `/cancel` with
//!    nothing open just re-offers the menu.
//! 2. While a question is open, any other text is the answer.
//! 3. When Idle, menu labels run their action; anything else re-offers
//!    the menu.

use std::sync::Arc;

use crate::channels::{IncomingMessage, OutgoingResponse};
use crate::error::Result;
use crate::llm::GenerationGateway;
use crate::store::ProfileStore;

use super::dialogue::DialogueController;
use super::menu::{self, Command};
use super::model::UserProfile;
use super::prompts;

/// Routes each message to the dialogue or to a stateless menu action.
pub struct CommandRouter {
    dialogue: DialogueController,
    store: Arc<dyn ProfileStore>,
    gateway: Arc<GenerationGateway>,
}

impl CommandRouter {
    pub fn new(
        dialogue: DialogueController,
        store: Arc<dyn ProfileStore>,
        gateway: Arc<GenerationGateway>,
    ) -> Self {
        Self {
            dialogue,
            store,
            gateway,
        }
    }

    /// Produce the single reply for one inbound message.
    pub async fn handle(&self, msg: &IncomingMessage) -> Result<OutgoingResponse> {
        let user_id = msg.user_id.as_str();
        let command = Command::parse(&msg.content);

        tracing::debug!(
            user_id,
            channel = %msg.channel,
            command = command.map(|c| c.as_str()),
            chars = msg.content.chars().count(),
            "Routing message"
        );

        if let Some(control) = command.filter(Command::is_control) {
            let was_open = self.dialogue.cancel(user_id).await;
            return Ok(match control {
                Command::Cancel if was_open => {
                    OutgoingResponse::text(prompts::CANCELLED).with_keyboard(menu::main_menu())
                }
                Command::Cancel => unknown_command(),
                _ => welcome(),
            });
        }

        if self.dialogue.phase(user_id).await.is_awaiting() {
            return self.dialogue.answer(user_id, &msg.content).await;
        }

        match command {
            Some(Command::ExploreCareer) => self.dialogue.begin(user_id).await,
            Some(Command::JobSearch) => self.job_search(user_id).await,
            Some(Command::GetAdvice) => Ok(self.advice().await),
            Some(Command::EducationCourses) => self.courses(user_id).await,
            Some(Command::Start) | Some(Command::Cancel) | None => Ok(unknown_command()),
        }
    }

    async fn job_search(&self, user_id: &str) -> Result<OutgoingResponse> {
        let Some(profile) = self.profile(user_id).await? else {
            return Ok(profile_required());
        };
        Ok(self
            .generate(prompts::JOBS_HEADER, &prompts::job_search_prompt(&profile))
            .await)
    }

    async fn advice(&self) -> OutgoingResponse {
        self.generate(prompts::ADVICE_HEADER, &prompts::career_advice_prompt())
            .await
    }

    async fn courses(&self, user_id: &str) -> Result<OutgoingResponse> {
        let Some(profile) = self.profile(user_id).await? else {
            return Ok(profile_required());
        };
        Ok(self
            .generate(prompts::COURSES_HEADER, &prompts::courses_prompt(&profile))
            .await)
    }

    async fn profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.store.get_profile(user_id).await?)
    }

    async fn generate(&self, header: &str, prompt: &str) -> OutgoingResponse {
        let content = match self.gateway.complete(prompt).await {
            Ok(text) => prompts::with_header(header, &text),
            Err(e) => {
                tracing::warn!(error = %e, "Menu action generation failed");
                prompts::action_failure(&e)
            }
        };
        OutgoingResponse::text(content).with_keyboard(menu::main_menu())
    }
}

fn welcome() -> OutgoingResponse {
    OutgoingResponse::text(prompts::WELCOME).with_keyboard(menu::main_menu())
}

fn unknown_command() -> OutgoingResponse {
    OutgoingResponse::text(prompts::UNKNOWN_COMMAND).with_keyboard(menu::main_menu())
}

fn profile_required() -> OutgoingResponse {
    OutgoingResponse::text(prompts::PROFILE_REQUIRED).with_keyboard(menu::main_menu())
}
