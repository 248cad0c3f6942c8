//! Fixed commands, their button labels, and the quick-reply keyboards.

use crate::channels::ReplyKeyboard;

pub const EXPLORE_CAREER: &str = "🔍 Исследовать карьеру";
pub const EDUCATION_COURSES: &str = "📚 Обучение и курсы";
pub const JOB_SEARCH: &str = "💼 Поиск работы";
pub const GET_ADVICE: &str = "🤔 Получить совет";

/// Main menu labels in display order.
pub const MAIN_MENU: [&str; 4] = [EXPLORE_CAREER, EDUCATION_COURSES, JOB_SEARCH, GET_ADVICE];

/// Suggested answers for the work-preference question.
pub const WORK_PREFERENCES: [&str; 3] = ["Офис", "Удаленно", "Фриланс"];

/// A recognised command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    ExploreCareer,
    JobSearch,
    GetAdvice,
    EducationCourses,
}

impl Command {
    /// Recognise a message as a command.
    ///
    /// Menu labels must match exactly. Slash commands may carry a
    /// `@botname` suffix, as Telegram sends them in groups, and trailing
    /// arguments such as a deep-link payload (`/start ref123`).
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            EXPLORE_CAREER => return Some(Self::ExploreCareer),
            EDUCATION_COURSES => return Some(Self::EducationCourses),
            JOB_SEARCH => return Some(Self::JobSearch),
            GET_ADVICE => return Some(Self::GetAdvice),
            _ => {}
        }

        let token = text.split_whitespace().next()?.strip_prefix('/')?;
        let command = token.split('@').next().unwrap_or(token);
        match command {
            "start" | "help" => Some(Self::Start),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Control commands are honoured in every phase; the rest only when Idle.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Start | Self::Cancel)
    }

    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Cancel => "cancel",
            Self::ExploreCareer => "explore_career",
            Self::JobSearch => "job_search",
            Self::GetAdvice => "get_advice",
            Self::EducationCourses => "education_courses",
        }
    }
}

/// Main menu, two buttons per row.
pub fn main_menu() -> ReplyKeyboard {
    ReplyKeyboard::from_labels(&MAIN_MENU, 2)
}

/// Work-preference choices on a single row.
pub fn work_preference_keyboard() -> ReplyKeyboard {
    ReplyKeyboard::from_labels(&WORK_PREFERENCES, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_menu_labels_exactly() {
        assert_eq!(Command::parse(EXPLORE_CAREER), Some(Command::ExploreCareer));
        assert_eq!(Command::parse(JOB_SEARCH), Some(Command::JobSearch));
        assert_eq!(Command::parse(GET_ADVICE), Some(Command::GetAdvice));
        assert_eq!(Command::parse(EDUCATION_COURSES), Some(Command::EducationCourses));
    }

    #[test]
    fn near_miss_labels_are_not_commands() {
        assert_eq!(Command::parse("Исследовать карьеру"), None);
        assert_eq!(Command::parse("💼 поиск работы"), None);
        assert_eq!(Command::parse(" 🤔 Получить совет"), None);
    }

    #[test]
    fn parse_slash_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/start@CareerQuestBot"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Start));
        assert_eq!(Command::parse("/cancel"), Some(Command::Cancel));
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("start"), None);
    }

    #[test]
    fn slash_commands_ignore_arguments() {
        assert_eq!(Command::parse("/start ref123"), Some(Command::Start));
        assert_eq!(Command::parse("/start@CareerQuestBot ref123"), Some(Command::Start));
        assert_eq!(Command::parse("  /cancel please"), Some(Command::Cancel));
        assert_eq!(Command::parse("/started"), None);
        assert_eq!(Command::parse("hello /start"), None);
    }

    #[test]
    fn only_start_and_cancel_are_control() {
        assert!(Command::Start.is_control());
        assert!(Command::Cancel.is_control());
        assert!(!Command::ExploreCareer.is_control());
        assert!(!Command::JobSearch.is_control());
    }

    #[test]
    fn keyboards_reproduce_labels_verbatim() {
        let menu = main_menu();
        assert_eq!(menu.rows.len(), 2);
        assert_eq!(menu.labels().collect::<Vec<_>>(), MAIN_MENU);

        let prefs = work_preference_keyboard();
        assert_eq!(prefs.rows.len(), 1);
        assert_eq!(prefs.labels().collect::<Vec<_>>(), WORK_PREFERENCES);
    }
}
