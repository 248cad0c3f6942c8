//! CareerQuest: a career-guidance chat bot.

pub mod bot;
pub mod career;
pub mod channels;
pub mod config;
pub mod error;
pub mod llm;
pub mod store;
