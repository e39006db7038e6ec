//! Backend routes used by the console.

pub const AUTH_LOGIN: &str = "/api/auth/login";
pub const AUTH_REGISTER: &str = "/api/auth/register";
pub const AUTH_REFRESH: &str = "/api/auth/refresh";
pub const AUTH_ME: &str = "/api/protected/me";

pub const LESSONS: &str = "/api/lessons";
pub const LESSON: &str = "/api/lessons/:id";
pub const LESSON_PUBLISH: &str = "/api/lessons/:id/publish";

pub const TOPICS: &str = "/api/topics";
pub const TOPICS_BY_LESSON: &str = "/api/topics/:lessonId";
pub const TOPIC: &str = "/api/topics/:id";

pub const QUIZZES: &str = "/api/quizzes";
pub const QUIZZES_BY_TOPIC: &str = "/api/quizzes/topic/:topicId";
pub const QUIZ: &str = "/api/quizzes/:id";

pub const VOCAB: &str = "/api/vocab";
pub const VOCAB_BULK: &str = "/api/vocab/bulk";
pub const VOCAB_BY_TOPIC: &str = "/api/vocab/topic/:topicId";
pub const VOCAB_ENTRY: &str = "/api/vocab/:id";

pub const USERS: &str = "/api/users";
pub const USER: &str = "/api/users/:id";

pub const VIDEOS: &str = "/api/videos";
pub const VIDEO: &str = "/api/videos/:id";

pub const REPORTS_PROGRESS_ALL: &str = "/api/reports/progress/all";
pub const REPORTS_PROGRESS_USER: &str = "/api/reports/progress/users/:id";
pub const REPORTS_TEACHER_STUDENTS: &str = "/api/reports/teacher/students";
pub const REPORTS_TEACHER_PROGRESS: &str = "/api/reports/teacher/progress";
pub const ACTIVITIES_DASHBOARD_STATS: &str = "/api/activities/dashboard-stats";
pub const ACTIVITIES_RECENT: &str = "/api/activities/recent";
pub const PROGRESSION_LEADERBOARD: &str = "/api/progression/leaderboard";

pub const TRANSLATE_EN_TO_VI: &str = "/api/translation/en-to-vi";
pub const TRANSLATE_VI_TO_EN: &str = "/api/translation/vi-to-en";
pub const TRANSLATE_CUSTOM: &str = "/api/translation/custom";
pub const TRANSLATE_LANGUAGES: &str = "/api/translation/languages";
pub const TRANSLATE_VOCAB: &str = "/api/translation/vocab";
pub const TRANSLATE_HISTORY: &str = "/api/translation/history";

/// Fills `:name` placeholders in a route template. Placeholders without a
/// matching parameter are left untouched.
pub fn build_path(template: &str, params: &[(&str, &str)]) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .unwrap_or(segment),
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Joins the configured base URL and a route.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
