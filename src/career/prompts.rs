//! User-facing texts and the prompts sent to the generation backend.

use std::fmt::Display;

use super::model::UserProfile;

pub const WELCOME: &str =
    "👋 Привет! Я помогу тебе найти новое направление для развития. Готов начать?";
pub const ASK_INTERESTS: &str = "Давайте начнем с ваших интересов. Что вам нравится делать?";
pub const ASK_SKILLS: &str = "Отлично! Теперь расскажите о своих сильных сторонах или навыках:";
pub const ASK_WORK_PREFERENCE: &str = "Где вы предпочитаете работать?";
pub const PROFILE_REQUIRED: &str = "Сначала пройдите опрос через кнопку 🔍";
pub const CANCELLED: &str = "Опрос отменён. Выберите действие в меню.";
pub const UNKNOWN_COMMAND: &str = "Не понимаю команду. Выберите действие в меню 👇";
pub const INTERNAL_ERROR: &str = "⚠️ Что-то пошло не так. Попробуйте позже.";

pub const RECOMMENDATIONS_HEADER: &str = "🌟 Вот ваши рекомендации:";
pub const JOBS_HEADER: &str = "💼 Рекомендуемые вакансии:";
pub const ADVICE_HEADER: &str = "💡 Советы для карьерного роста:";
pub const COURSES_HEADER: &str = "🎓 Курсы для вас:";

/// Prefix generated content with a section header.
pub fn with_header(header: &str, body: &str) -> String {
    format!("{header}\n\n{body}")
}

/// Failure notice after the dialogue's final step.
pub fn dialogue_failure(error: &impl Display) -> String {
    format!("Ошибка: {error}. Попробуйте позже.")
}

/// Failure notice for menu actions.
pub fn action_failure(error: &impl Display) -> String {
    format!("Ошибка: {error}")
}

/// Three career suggestions from the full profile.
pub fn career_suggestions_prompt(profile: &UserProfile) -> String {
    format!(
        "Пользователь хочет сменить карьеру.
Интересы: {interests}.
Навыки: {skills}.
Предпочтения: {preference}.
Предложи 3 профессии с:
- Описанием (1 предложение)
- Требованиями (2-3 пункта)
- Ресурсами для старта (ссылки)
Используй эмодзи для форматирования.",
        interests = profile.interests,
        skills = profile.skills,
        preference = profile.work_preference,
    )
}

/// Three job listings from skills and work preference.
pub fn job_search_prompt(profile: &UserProfile) -> String {
    format!(
        "Пользователь ищет работу с навыками: {skills}.
Предпочтение: {preference}.
Предложи 3 варианта вакансий с:
- Названием должности
- Уровнем зарплаты
- Требованиями
- Ссылками на платформы (например, hh.ru)",
        skills = profile.skills,
        preference = profile.work_preference,
    )
}

/// Three career-growth tips; independent of the profile.
pub fn career_advice_prompt() -> String {
    "Дай 3 полезных совета для карьерного роста.
Формат: совет + конкретное действие.
Используй эмодзи и структурированный список."
        .to_string()
}

/// Three courses from interests and skills.
pub fn courses_prompt(profile: &UserProfile) -> String {
    format!(
        "Пользователь хочет развиваться в области: {interests}.
Его текущие навыки: {skills}.
Предложи 3 подходящих образовательных курса с:
- Названием платформы
- Ссылкой
- Кратким описанием
- Продолжительностью
Используй эмодзи для форматирования.",
        interests = profile.interests,
        skills = profile.skills,
    )
}
