//! Career guidance: the intake dialogue, the menu actions, and the texts
//! both send.

pub mod dialogue;
pub mod menu;
pub mod model;
pub mod prompts;
pub mod router;
pub mod session;
pub mod state;

pub use dialogue::DialogueController;
pub use menu::Command;
pub use model::{MAX_FIELD_CHARS, ProfileDraft, UserProfile};
pub use router::CommandRouter;
pub use session::SessionManager;
pub use state::{DialogueEvent, DialoguePhase, SessionState, Transition};
