use super::Console;
use crate::application_port::LoginInput;
use crate::domain_model::{Role, RouteAccess, User, route_access};
use crate::settings::{Command, LessonsCommand, ReportCommand};
use anyhow::{Result, anyhow};
use serde_json::{Value, json};

impl Console {
    /// Runs one CLI command and returns what should be printed.
    pub async fn run(&self, command: Command) -> Result<Value> {
        let output = match command {
            Command::Login { email, password } => {
                let result = self.auth_service.login(LoginInput { email, password }).await?;
                json!({ "user": result.user })
            }
            Command::Logout => {
                self.auth_service.logout().await?;
                json!({ "signedOut": true })
            }
            Command::Whoami => serde_json::to_value(self.signed_in_as(None).await?)?,
            Command::Lessons { action } => self.run_lessons(action).await?,
            Command::Topics { lesson } => self.catalog_service.topics_by_lesson(&lesson).await?,
            Command::Quizzes { topic } => self.catalog_service.quizzes_by_topic(&topic).await?,
            Command::Vocab { topic } => self.catalog_service.vocab_by_topic(&topic).await?,
            Command::Videos => self.catalog_service.list_videos().await?,
            Command::Users => {
                self.signed_in_as(Some(Role::Admin)).await?;
                self.catalog_service.list_users().await?
            }
            Command::Report { action } => self.run_report(action).await?,
            Command::Translate { text, from, to } => {
                let translation = &self.translation_service;
                let result = match (from.as_str(), to.as_str()) {
                    ("en", "vi") => translation.en_to_vi(&text).await?,
                    ("vi", "en") => translation.vi_to_en(&text).await?,
                    (source, target) => translation.custom(&text, source, target).await?,
                };
                serde_json::to_value(result)?
            }
            Command::Languages => serde_json::to_value(self.translation_service.languages().await?)?,
        };
        Ok(output)
    }

    /// Resolves the current user and checks it against the role an area needs.
    async fn signed_in_as(&self, required: Option<Role>) -> Result<User> {
        let user = self.auth_service.restore_session().await?;
        match route_access(user.as_ref(), required) {
            RouteAccess::Allow => user.ok_or_else(|| anyhow!("not signed in")),
            RouteAccess::RedirectToLogin => Err(anyhow!("not signed in")),
            RouteAccess::RedirectHome => Err(anyhow!(
                "this command needs the {} role",
                required.map(|role| role.to_string()).unwrap_or_default()
            )),
        }
    }

    async fn run_report(&self, action: ReportCommand) -> Result<Value> {
        let required = match &action {
            ReportCommand::Students | ReportCommand::TeacherProgress => Some(Role::Teacher),
            ReportCommand::Leaderboard { .. } => None,
            _ => Some(Role::Admin),
        };
        if required.is_some() {
            self.signed_in_as(required).await?;
        }

        let reports = &self.reports_service;
        let output = match action {
            ReportCommand::Progress { user: Some(user) } => reports.progress_of_user(&user).await?,
            ReportCommand::Progress { user: None } => reports.progress_all().await?,
            ReportCommand::Students => reports.teacher_students().await?,
            ReportCommand::TeacherProgress => reports.teacher_progress().await?,
            ReportCommand::Dashboard => reports.dashboard_stats().await?,
            ReportCommand::Recent { limit } => reports.recent_activities(limit).await?,
            ReportCommand::Leaderboard { limit } => reports.leaderboard(limit).await?,
        };
        Ok(output)
    }

    async fn run_lessons(&self, action: LessonsCommand) -> Result<Value> {
        let catalog = &self.catalog_service;
        let output = match action {
            LessonsCommand::List => catalog.list_lessons().await?,
            LessonsCommand::Show { id } => catalog.get_lesson(&id).await?,
            LessonsCommand::Publish { id, unpublish } => {
                catalog.publish_lesson(&id, !unpublish).await?
            }
            LessonsCommand::Delete { id } => {
                catalog.delete_lesson(&id).await?;
                json!({ "deleted": id })
            }
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::*;
    use crate::domain_port::*;
    use crate::infra_fs::FileCredentialStore;
    use crate::infra_memory::*;
    use crate::settings::{Api, Log, Settings};
    use std::sync::Arc;

    fn api() -> Api {
        Api {
            base_url: "http://backend".to_owned(),
            timeout_ms: 1000,
            refresh_path: "/api/auth/refresh".to_owned(),
        }
    }

    async fn setup(
        credentials: Credentials,
    ) -> (Console, Arc<ScriptedTransport>, Arc<MemoryCredentialStore>) {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            let path = request.url.trim_start_matches("http://backend");
            let body = match path {
                "/api/protected/me" => {
                    json!({ "user": { "id": "u1", "email": "t@example.com", "role": "TEACHER" } })
                }
                "/api/translation/vi-to-en" | "/api/translation/custom" => json!({
                    "originalText": "xin chào",
                    "translatedText": "hello",
                    "sourceLanguage": "vi",
                    "targetLanguage": "en",
                    "timestamp": "2024-05-01T10:00:00Z"
                }),
                _ => json!({ "path": path }),
            };
            Ok(HttpResponse::new(200, body.to_string()))
        }));
        let store = Arc::new(MemoryCredentialStore::with_credentials(&credentials));
        let console = Console::with_backends(&api(), transport.clone(), store.clone())
            .await
            .unwrap();
        (console, transport, store)
    }

    fn signed_in() -> Credentials {
        Credentials::new("access-1", Some("refresh-1".to_owned()))
    }

    #[tokio::test]
    async fn stored_token_starts_an_active_session() {
        let (active, _, _) = setup(signed_in()).await;
        assert!(active.client().terminator().status().is_active());

        let (anonymous, _, _) = setup(Credentials::default()).await;
        assert_eq!(
            anonymous.client().terminator().status(),
            crate::client::SessionStatus::SignedOut
        );
    }

    #[tokio::test]
    async fn whoami_needs_a_session() {
        let (console, _, _) = setup(Credentials::default()).await;
        assert!(console.run(Command::Whoami).await.is_err());

        let (console, _, _) = setup(signed_in()).await;
        let user = console.run(Command::Whoami).await.unwrap();
        assert_eq!(user["role"], "TEACHER");
    }

    #[tokio::test]
    async fn translate_route_follows_the_language_pair() {
        let (console, transport, _) = setup(signed_in()).await;

        let result = console
            .run(Command::Translate {
                text: "xin chào".to_owned(),
                from: "vi".to_owned(),
                to: "en".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(result["translatedText"], "hello");

        console
            .run(Command::Translate {
                text: "xin chào".to_owned(),
                from: "vi".to_owned(),
                to: "fr".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(transport.requests_to("/api/translation/vi-to-en").len(), 1);
        assert_eq!(transport.requests_to("/api/translation/custom").len(), 1);
    }

    #[tokio::test]
    async fn lesson_commands() {
        let (console, transport, _) = setup(signed_in()).await;

        let deleted = console
            .run(Command::Lessons {
                action: LessonsCommand::Delete { id: "l1".to_owned() },
            })
            .await
            .unwrap();
        assert_eq!(deleted, json!({ "deleted": "l1" }));

        console
            .run(Command::Lessons {
                action: LessonsCommand::Publish {
                    id: "l2".to_owned(),
                    unpublish: false,
                },
            })
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[1].url,
            "http://backend/api/lessons/l2/publish?value=true"
        );
    }

    #[tokio::test]
    async fn logout_empties_the_store() {
        let (console, _, store) = setup(signed_in()).await;

        console.run(Command::Logout).await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_credentials_backend_is_rejected() {
        let settings = Settings {
            api: api(),
            credentials: crate::settings::Credentials {
                backend: "keychain".to_owned(),
                path: String::new(),
            },
            log: Log {
                filter: "info".to_owned(),
            },
        };
        let err = Console::try_new(&settings).await.err().unwrap();
        assert!(err.to_string().contains("keychain"));
    }

    #[tokio::test]
    async fn staff_areas_check_the_role() {
        let (console, transport, _) = setup(signed_in()).await;

        let students = console
            .run(Command::Report {
                action: ReportCommand::Students,
            })
            .await
            .unwrap();
        assert_eq!(students["path"], "/api/reports/teacher/students");

        let err = console.run(Command::Users).await.unwrap_err();
        assert!(err.to_string().contains("ADMIN"));
        let err = console
            .run(Command::Report {
                action: ReportCommand::Dashboard,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ADMIN"));
        assert!(transport.requests_to("/api/users").is_empty());
        assert!(transport.requests_to("/api/activities/dashboard-stats").is_empty());
    }

    #[tokio::test]
    async fn leaderboard_is_open_to_any_session() {
        let (console, transport, _) = setup(signed_in()).await;

        console
            .run(Command::Report {
                action: ReportCommand::Leaderboard { limit: 3 },
            })
            .await
            .unwrap();

        assert!(transport.requests_to("/api/protected/me").is_empty());
        assert_eq!(
            transport.requests()[0].url,
            "http://backend/api/progression/leaderboard?limit=3"
        );
    }

    #[tokio::test]
    async fn restricted_commands_need_a_session() {
        let (console, transport, _) = setup(Credentials::default()).await;

        let err = console.run(Command::Users).await.unwrap_err();

        assert_eq!(err.to_string(), "not signed in");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn unreadable_credential_file_does_not_block_login() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("credentials.json");
        std::fs::write(&file, "not json").unwrap();
        let transport = Arc::new(ScriptedTransport::new(|_| {
            let body = json!({
                "accessToken": "a1",
                "refreshToken": "r1",
                "user": { "id": "u1", "email": "t@example.com", "role": "TEACHER" }
            });
            Ok(HttpResponse::new(200, body.to_string()))
        }));

        let console =
            Console::with_backends(&api(), transport, Arc::new(FileCredentialStore::new(&file)))
                .await
                .unwrap();
        assert_eq!(
            console.client().terminator().status(),
            crate::client::SessionStatus::SignedOut
        );

        console
            .run(Command::Login {
                email: "t@example.com".to_owned(),
                password: "secret".to_owned(),
            })
            .await
            .unwrap();

        assert_eq!(
            FileCredentialStore::new(&file).load().await.unwrap(),
            Credentials::new("a1", Some("r1".to_owned()))
        );
    }
}
