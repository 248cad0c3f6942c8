//! End-to-end flow through the router, dialogue, and a real libSQL store,
//! with a scripted LLM in place of the network backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use career_quest::bot::{BotSettings, CareerBot};
use career_quest::career::menu::{self, EDUCATION_COURSES, EXPLORE_CAREER, GET_ADVICE, JOB_SEARCH};
use career_quest::career::{
    CommandRouter, DialogueController, DialoguePhase, SessionManager, UserProfile, prompts,
};
use career_quest::channels::{
    Channel, ChannelManager, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate,
};
use career_quest::error::{ChannelError, DatabaseError, LlmError};
use career_quest::llm::{
    CompletionRequest, CompletionResponse, FinishReason, GenerationGateway, LlmProvider, Role,
};
use career_quest::store::{LibSqlBackend, ProfileStore};

struct StubLlm {
    reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    fn ok(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    fn cost_per_token(&self) -> (Decimal, Decimal) {
        (Decimal::ZERO, Decimal::ZERO)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(user) = request.messages.iter().find(|m| m.role == Role::User) {
            self.prompts.lock().unwrap().push(user.content.clone());
        }
        match &self.reply {
            Some(text) => Ok(CompletionResponse {
                content: text.clone(),
                input_tokens: 10,
                output_tokens: 20,
                finish_reason: FinishReason::Stop,
            }),
            None => Err(LlmError::RequestFailed {
                provider: "stub".into(),
                reason: "quota exceeded".into(),
            }),
        }
    }
}

struct Harness {
    router: CommandRouter,
    store: Arc<LibSqlBackend>,
    sessions: Arc<SessionManager>,
    llm: Arc<StubLlm>,
}

impl Harness {
    async fn new(llm: Arc<StubLlm>) -> Self {
        let store = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let gateway = Arc::new(GenerationGateway::new(llm.clone()));
        let sessions = Arc::new(SessionManager::new());
        let dialogue = DialogueController::new(store.clone(), gateway.clone(), sessions.clone());
        let router = CommandRouter::new(dialogue, store.clone(), gateway);
        Self {
            router,
            store,
            sessions,
            llm,
        }
    }

    async fn send(&self, user: &str, text: &str) -> OutgoingResponse {
        let msg = IncomingMessage::new("test", user, text);
        self.router.handle(&msg).await.unwrap()
    }

    async fn complete_dialogue(&self, user: &str, interests: &str, skills: &str, pref: &str) {
        self.send(user, EXPLORE_CAREER).await;
        self.send(user, interests).await;
        self.send(user, skills).await;
        self.send(user, pref).await;
    }
}

#[tokio::test]
async fn start_greets_with_main_menu() {
    let h = Harness::new(StubLlm::ok("x")).await;
    let r = h.send("1", "/start").await;
    assert_eq!(r.content, prompts::WELCOME);
    assert_eq!(r.reply_options, Some(menu::main_menu()));
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn painting_scenario_stores_profile_and_relays_suggestions() {
    let h = Harness::new(StubLlm::ok("1. Illustrator\n2. Art director\n3. UI designer")).await;

    let r = h.send("42", EXPLORE_CAREER).await;
    assert_eq!(r.content, prompts::ASK_INTERESTS);
    assert_eq!(h.sessions.phase("42").await, DialoguePhase::AwaitingInterests);

    let r = h.send("42", "painting").await;
    assert_eq!(r.content, prompts::ASK_SKILLS);

    let r = h.send("42", "color theory").await;
    assert_eq!(r.content, prompts::ASK_WORK_PREFERENCE);
    assert_eq!(r.reply_options, Some(menu::work_preference_keyboard()));

    let r = h.send("42", "remote").await;
    assert_eq!(
        r.content,
        "🌟 Вот ваши рекомендации:\n\n1. Illustrator\n2. Art director\n3. UI designer"
    );
    assert_eq!(r.reply_options, Some(menu::main_menu()));

    let profile = h.store.get_profile("42").await.unwrap().unwrap();
    assert_eq!(profile.interests, "painting");
    assert_eq!(profile.skills, "color theory");
    assert_eq!(profile.work_preference, "remote");
    assert_eq!(h.sessions.phase("42").await, DialoguePhase::Idle);

    assert_eq!(h.llm.calls(), 1);
    let prompt = h.llm.last_prompt();
    assert!(prompt.contains("painting"));
    assert!(prompt.contains("color theory"));
    assert!(prompt.contains("remote"));
}

#[tokio::test]
async fn rerun_overwrites_profile() {
    let h = Harness::new(StubLlm::ok("ok")).await;
    h.complete_dialogue("7", "music", "piano", "Офис").await;
    h.complete_dialogue("7", "code", "rust", "Фриланс").await;

    let profile = h.store.get_profile("7").await.unwrap().unwrap();
    assert_eq!(
        (profile.interests.as_str(), profile.skills.as_str(), profile.work_preference.as_str()),
        ("code", "rust", "Фриланс")
    );
}

#[tokio::test]
async fn generation_failure_in_final_step_still_commits() {
    let h = Harness::new(StubLlm::failing()).await;
    h.send("9", EXPLORE_CAREER).await;
    h.send("9", "a").await;
    h.send("9", "b").await;
    let r = h.send("9", "c").await;

    assert!(r.content.starts_with("Ошибка: "));
    assert!(r.content.contains("quota exceeded"));
    assert!(r.content.ends_with(". Попробуйте позже."));
    assert_eq!(h.sessions.phase("9").await, DialoguePhase::Idle);
    assert!(h.store.get_profile("9").await.unwrap().is_some());
}

#[tokio::test]
async fn profile_actions_require_completed_dialogue() {
    let h = Harness::new(StubLlm::ok("x")).await;

    for label in [JOB_SEARCH, EDUCATION_COURSES] {
        let r = h.send("5", label).await;
        assert_eq!(r.content, prompts::PROFILE_REQUIRED);
        assert_eq!(h.sessions.phase("5").await, DialoguePhase::Idle);
    }
    assert_eq!(h.llm.calls(), 0);

    // An abandoned dialogue leaves nothing behind either.
    h.send("5", EXPLORE_CAREER).await;
    h.send("5", "half").await;
    h.send("5", "/cancel").await;
    let r = h.send("5", JOB_SEARCH).await;
    assert_eq!(r.content, prompts::PROFILE_REQUIRED);
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn job_search_uses_stored_skills_and_preference() {
    let h = Harness::new(StubLlm::ok("Rust developer")).await;
    h.complete_dialogue("3", "games", "rust", "Удаленно").await;

    let r = h.send("3", JOB_SEARCH).await;
    assert_eq!(r.content, "💼 Рекомендуемые вакансии:\n\nRust developer");
    let prompt = h.llm.last_prompt();
    assert!(prompt.contains("навыками: rust"));
    assert!(prompt.contains("Предпочтение: Удаленно"));
    assert!(!prompt.contains("games"));
    assert_eq!(h.sessions.phase("3").await, DialoguePhase::Idle);
}

#[tokio::test]
async fn courses_use_stored_interests_and_skills() {
    let h = Harness::new(StubLlm::ok("Coursera")).await;
    h.complete_dialogue("3", "games", "rust", "Удаленно").await;

    let r = h.send("3", EDUCATION_COURSES).await;
    assert_eq!(r.content, "🎓 Курсы для вас:\n\nCoursera");
    let prompt = h.llm.last_prompt();
    assert!(prompt.contains("области: games"));
    assert!(prompt.contains("навыки: rust"));
}

#[tokio::test]
async fn advice_needs_no_profile() {
    let h = Harness::new(StubLlm::ok("Network more")).await;
    let r = h.send("11", GET_ADVICE).await;
    assert_eq!(r.content, "💡 Советы для карьерного роста:\n\nNetwork more");
    assert_eq!(h.llm.calls(), 1);
    assert!(h.store.get_profile("11").await.unwrap().is_none());
}

#[tokio::test]
async fn menu_action_failure_is_reported_without_suffix() {
    let h = Harness::new(StubLlm::failing()).await;
    let r = h.send("11", GET_ADVICE).await;
    assert!(r.content.starts_with("Ошибка: "));
    assert!(!r.content.ends_with("Попробуйте позже."));
    assert_eq!(r.reply_options, Some(menu::main_menu()));
}

#[tokio::test]
async fn unknown_text_while_idle_changes_nothing() {
    let h = Harness::new(StubLlm::ok("x")).await;
    let r = h.send("8", "hello there").await;
    assert_eq!(r.content, prompts::UNKNOWN_COMMAND);
    assert_eq!(r.reply_options, Some(menu::main_menu()));
    assert_eq!(h.sessions.phase("8").await, DialoguePhase::Idle);
    assert_eq!(h.sessions.active_count().await, 0);
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn menu_label_mid_dialogue_is_an_answer() {
    let h = Harness::new(StubLlm::ok("ok")).await;
    h.send("4", EXPLORE_CAREER).await;
    let r = h.send("4", JOB_SEARCH).await;
    assert_eq!(r.content, prompts::ASK_SKILLS);
    assert_eq!(h.llm.calls(), 0);
    h.send("4", "skills").await;
    h.send("4", "Офис").await;

    let profile = h.store.get_profile("4").await.unwrap().unwrap();
    assert_eq!(profile.interests, JOB_SEARCH);
}

#[tokio::test]
async fn control_commands_reset_mid_dialogue() {
    let h = Harness::new(StubLlm::ok("ok")).await;
    h.send("6", EXPLORE_CAREER).await;
    h.send("6", "draft interests").await;

    let r = h.send("6", "/start").await;
    assert_eq!(r.content, prompts::WELCOME);
    assert_eq!(h.sessions.phase("6").await, DialoguePhase::Idle);

    h.send("6", EXPLORE_CAREER).await;
    let r = h.send("6", "/cancel").await;
    assert_eq!(r.content, prompts::CANCELLED);
    assert_eq!(h.sessions.phase("6").await, DialoguePhase::Idle);
    assert!(h.store.get_profile("6").await.unwrap().is_none());
}

#[tokio::test]
async fn cancel_with_nothing_open_reoffers_menu() {
    let h = Harness::new(StubLlm::ok("ok")).await;
    let r = h.send("12", "/cancel").await;
    assert_eq!(r.content, prompts::UNKNOWN_COMMAND);
    assert_eq!(r.reply_options, Some(menu::main_menu()));
    assert_eq!(h.sessions.active_count().await, 0);
}

#[tokio::test]
async fn deep_link_start_resets_mid_dialogue() {
    let h = Harness::new(StubLlm::ok("ok")).await;
    h.send("13", EXPLORE_CAREER).await;
    h.send("13", "half done").await;

    let r = h.send("13", "/start ref123").await;
    assert_eq!(r.content, prompts::WELCOME);
    assert_eq!(h.sessions.phase("13").await, DialoguePhase::Idle);

    let r = h.send("13", "/start ref123").await;
    assert_eq!(r.content, prompts::WELCOME);
    assert!(h.store.get_profile("13").await.unwrap().is_none());
}

#[tokio::test]
async fn empty_answers_are_stored() {
    let h = Harness::new(StubLlm::ok("ok")).await;
    h.complete_dialogue("14", "", "", "").await;

    let profile = h.store.get_profile("14").await.unwrap().unwrap();
    assert_eq!(profile.interests, "");
    assert_eq!(profile.skills, "");
    assert_eq!(profile.work_preference, "");
}

#[tokio::test]
async fn users_progress_independently() {
    let h = Harness::new(StubLlm::ok("ok")).await;
    h.send("a", EXPLORE_CAREER).await;
    h.send("b", EXPLORE_CAREER).await;
    h.send("a", "a-interests").await;

    assert_eq!(h.sessions.phase("a").await, DialoguePhase::AwaitingSkills);
    assert_eq!(h.sessions.phase("b").await, DialoguePhase::AwaitingInterests);

    h.send("b", "b-interests").await;
    h.send("b", "b-skills").await;
    h.send("b", "b-pref").await;
    assert!(h.store.get_profile("a").await.unwrap().is_none());
    assert_eq!(
        h.store.get_profile("b").await.unwrap().unwrap().interests,
        "b-interests"
    );
}

// ── Bot loop ────────────────────────────────────────────────────────────

struct BrokenStore;

#[async_trait]
impl ProfileStore for BrokenStore {
    async fn upsert_profile(&self, _profile: &UserProfile) -> Result<(), DatabaseError> {
        Err(DatabaseError::Query("disk I/O error".into()))
    }

    async fn get_profile(&self, _user_id: &str) -> Result<Option<UserProfile>, DatabaseError> {
        Err(DatabaseError::Query("disk I/O error".into()))
    }

    async fn delete_profile(&self, _user_id: &str) -> Result<bool, DatabaseError> {
        Err(DatabaseError::Query("disk I/O error".into()))
    }
}

#[derive(Default)]
struct CapturingChannel {
    replies: Arc<Mutex<Vec<String>>>,
    statuses: Arc<Mutex<usize>>,
}

#[async_trait]
impl Channel for CapturingChannel {
    fn name(&self) -> &str {
        "capture"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        Ok(Box::pin(futures::stream::empty()))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        self.replies.lock().unwrap().push(response.content);
        Ok(())
    }

    async fn send_status(
        &self,
        _status: StatusUpdate,
        _metadata: &serde_json::Value,
    ) -> Result<(), ChannelError> {
        *self.statuses.lock().unwrap() += 1;
        Ok(())
    }
}

fn bot_with(store: Arc<dyn ProfileStore>, llm: Arc<StubLlm>) -> (CareerBot, CapturingChannel) {
    let channel = CapturingChannel::default();
    let probe = CapturingChannel {
        replies: channel.replies.clone(),
        statuses: channel.statuses.clone(),
    };

    let gateway = Arc::new(GenerationGateway::new(llm));
    let sessions = Arc::new(SessionManager::new());
    let dialogue = DialogueController::new(store.clone(), gateway.clone(), sessions.clone());
    let router = CommandRouter::new(dialogue, store, gateway);

    let mut channels = ChannelManager::new();
    channels.add(Box::new(channel));
    (
        CareerBot::new(channels, router, sessions, BotSettings::default()),
        probe,
    )
}

#[tokio::test]
async fn storage_failure_gets_generic_reply_and_loop_continues() {
    let llm = StubLlm::ok("x");
    let (bot, probe) = bot_with(Arc::new(BrokenStore), llm.clone());

    bot.process(&IncomingMessage::new("capture", "1", JOB_SEARCH)).await;
    bot.process(&IncomingMessage::new("capture", "1", "/start")).await;

    let replies = probe.replies.lock().unwrap().clone();
    assert_eq!(replies, vec![prompts::INTERNAL_ERROR.to_string(), prompts::WELCOME.to_string()]);
    assert_eq!(*probe.statuses.lock().unwrap(), 2);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn storage_failure_at_commit_leaves_user_idle() {
    let llm = StubLlm::ok("x");
    let (bot, probe) = bot_with(Arc::new(BrokenStore), llm.clone());

    for text in [EXPLORE_CAREER, "a", "b", "c"] {
        bot.process(&IncomingMessage::new("capture", "2", text)).await;
    }

    let replies = probe.replies.lock().unwrap().clone();
    assert_eq!(replies.len(), 4);
    assert_eq!(replies[3], prompts::INTERNAL_ERROR);
    assert_eq!(llm.calls(), 0);

    bot.process(&IncomingMessage::new("capture", "2", "anything")).await;
    assert_eq!(
        probe.replies.lock().unwrap().last().map(String::as_str),
        Some(prompts::UNKNOWN_COMMAND)
    );
}
