//! Dialogue controller: drives the three-question intake and commits the
//! resulting profile.

use std::sync::Arc;

use crate::channels::OutgoingResponse;
use crate::error::Result;
use crate::llm::GenerationGateway;
use crate::store::ProfileStore;

use super::menu;
use super::model::ProfileDraft;
use super::prompts;
use super::session::SessionManager;
use super::state::{DialogueEvent, DialoguePhase, Transition};

/// Turns dialogue transitions into replies, storage writes, and generation
/// calls.
pub struct DialogueController {
    store: Arc<dyn ProfileStore>,
    gateway: Arc<GenerationGateway>,
    sessions: Arc<SessionManager>,
}

impl DialogueController {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        gateway: Arc<GenerationGateway>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            store,
            gateway,
            sessions,
        }
    }

    pub async fn phase(&self, user_id: &str) -> DialoguePhase {
        self.sessions.phase(user_id).await
    }

    /// Start (or restart) the dialogue.
    pub async fn begin(&self, user_id: &str) -> Result<OutgoingResponse> {
        let transition = self.sessions.apply(user_id, DialogueEvent::Begin).await;
        self.carry_out(user_id, transition).await
    }

    /// Record the answer to whichever question is open.
    pub async fn answer(&self, user_id: &str, text: &str) -> Result<OutgoingResponse> {
        let transition = self
            .sessions
            .apply(user_id, DialogueEvent::Answer(text.to_string()))
            .await;
        self.carry_out(user_id, transition).await
    }

    /// Abandon any dialogue in progress. Returns whether one was open.
    pub async fn cancel(&self, user_id: &str) -> bool {
        matches!(
            self.sessions.apply(user_id, DialogueEvent::Cancel).await,
            Transition::Cancelled
        )
    }

    async fn carry_out(
        &self,
        user_id: &str,
        transition: Transition,
    ) -> Result<OutgoingResponse> {
        let response = match transition {
            Transition::AskInterests => OutgoingResponse::text(prompts::ASK_INTERESTS),
            Transition::AskSkills => OutgoingResponse::text(prompts::ASK_SKILLS),
            Transition::AskWorkPreference => OutgoingResponse::text(prompts::ASK_WORK_PREFERENCE)
                .with_keyboard(menu::work_preference_keyboard()),
            Transition::Commit(draft) => self.commit(user_id, draft).await?,
            Transition::Cancelled => {
                OutgoingResponse::text(prompts::CANCELLED).with_keyboard(menu::main_menu())
            }
            Transition::Ignored => {
                OutgoingResponse::text(prompts::UNKNOWN_COMMAND).with_keyboard(menu::main_menu())
            }
        };
        Ok(response)
    }

    /// Persist the finished profile, then ask for career suggestions.
    ///
    /// The session is already Idle by the time this runs, so a storage
    /// failure leaves no half-finished dialogue behind. A generation failure
    /// keeps the stored profile and becomes a notice.
    async fn commit(&self, user_id: &str, draft: ProfileDraft) -> Result<OutgoingResponse> {
        let Some(profile) = draft.complete(user_id) else {
            tracing::warn!(user_id, "Dialogue finished with an incomplete draft");
            return Ok(
                OutgoingResponse::text(prompts::UNKNOWN_COMMAND).with_keyboard(menu::main_menu())
            );
        };

        self.store.upsert_profile(&profile).await?;
        tracing::info!(user_id, "Profile committed");

        let content = match self
            .gateway
            .complete(&prompts::career_suggestions_prompt(&profile))
            .await
        {
            Ok(text) => prompts::with_header(prompts::RECOMMENDATIONS_HEADER, &text),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Career suggestions unavailable");
                prompts::dialogue_failure(&e)
            }
        };

        Ok(OutgoingResponse::text(content).with_keyboard(menu::main_menu()))
    }
}
