//! Dialogue state machine: tracks which question the user is answering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{MAX_FIELD_CHARS, ProfileDraft, truncate_field};

/// The phases of the career intake dialogue.
///
/// Progresses linearly: Idle → AwaitingInterests → AwaitingSkills →
/// AwaitingWorkPreference → Idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    #[default]
    Idle,
    AwaitingInterests,
    AwaitingSkills,
    AwaitingWorkPreference,
}

impl DialoguePhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: DialoguePhase) -> bool {
        use DialoguePhase::*;
        matches!(
            (self, target),
            (Idle, AwaitingInterests)
                | (AwaitingInterests, AwaitingSkills)
                | (AwaitingSkills, AwaitingWorkPreference)
                | (AwaitingWorkPreference, Idle)
        )
    }

    /// Get the phase an answer moves to. `None` while Idle.
    pub fn next(&self) -> Option<DialoguePhase> {
        use DialoguePhase::*;
        match self {
            Idle => None,
            AwaitingInterests => Some(AwaitingSkills),
            AwaitingSkills => Some(AwaitingWorkPreference),
            AwaitingWorkPreference => Some(Idle),
        }
    }

    /// Whether a dialogue pass is in progress.
    pub fn is_awaiting(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for DialoguePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AwaitingInterests => "awaiting_interests",
            Self::AwaitingSkills => "awaiting_skills",
            Self::AwaitingWorkPreference => "awaiting_work_preference",
        };
        write!(f, "{s}")
    }
}

/// Something that happened in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueEvent {
    /// The user asked to explore careers.
    Begin,
    /// Free text sent while a question is open.
    Answer(String),
    /// An explicit reset (`/cancel`, `/start`).
    Cancel,
}

/// The effect a transition asks the controller to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    AskInterests,
    AskSkills,
    AskWorkPreference,
    /// The last answer arrived; the draft is complete and must be committed.
    Commit(ProfileDraft),
    /// A dialogue in progress was abandoned.
    Cancelled,
    /// The event has no meaning in the current phase.
    Ignored,
}

/// Per-user transient session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: DialoguePhase,
    pub draft: ProfileDraft,
    pub last_activity: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: DialoguePhase::Idle,
            draft: ProfileDraft::default(),
            last_activity: Utc::now(),
        }
    }
}

impl SessionState {
    /// Apply an event and report what the controller should do.
    ///
    /// Answers are stored verbatim (clipped to `MAX_FIELD_CHARS`); nothing
    /// is ever rejected or re-asked. `Begin` restarts a pass from any phase.
    pub fn apply(&mut self, event: DialogueEvent) -> Transition {
        self.last_activity = Utc::now();

        match event {
            DialogueEvent::Begin => {
                self.draft = ProfileDraft::default();
                self.phase = DialoguePhase::AwaitingInterests;
                Transition::AskInterests
            }
            DialogueEvent::Cancel => {
                let was_active = self.phase.is_awaiting();
                self.reset();
                if was_active {
                    Transition::Cancelled
                } else {
                    Transition::Ignored
                }
            }
            DialogueEvent::Answer(text) => self.answer(&text),
        }
    }

    fn answer(&mut self, text: &str) -> Transition {
        let Some(next) = self.phase.next() else {
            return Transition::Ignored;
        };
        debug_assert!(self.phase.can_transition_to(next));

        let value = truncate_field(text, MAX_FIELD_CHARS);
        let transition = match self.phase {
            DialoguePhase::AwaitingInterests => {
                self.draft.interests = Some(value);
                Transition::AskSkills
            }
            DialoguePhase::AwaitingSkills => {
                self.draft.skills = Some(value);
                Transition::AskWorkPreference
            }
            DialoguePhase::AwaitingWorkPreference => {
                self.draft.work_preference = Some(value);
                Transition::Commit(std::mem::take(&mut self.draft))
            }
            DialoguePhase::Idle => return Transition::Ignored,
        };
        self.phase = next;
        transition
    }

    /// Drop the draft and return to Idle.
    pub fn reset(&mut self) {
        self.phase = DialoguePhase::Idle;
        self.draft = ProfileDraft::default();
    }
}
