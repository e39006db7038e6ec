use crate::application_port::*;
use crate::client::{ApiError, AuthenticatedClient, SessionStatus, with_body};
use crate::domain_model::endpoint::{AUTH_LOGIN, AUTH_ME, AUTH_REGISTER};
use crate::domain_model::*;
use crate::domain_port::{CredentialStore, StoreError};
use tokio::sync::watch;
use tracing::{error, info, warn};

pub struct RealAuthService {
    client: AuthenticatedClient,
}

impl RealAuthService {
    pub fn new(client: AuthenticatedClient) -> RealAuthService {
        RealAuthService { client }
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        self.client.credentials().clear().await?;
        self.client.terminator().announce(SessionStatus::SignedOut);
        Ok(())
    }

    async fn try_login(&self, input: &LoginInput) -> Result<LoginResult, AuthError> {
        // stale tokens must not ride along with a sign-in
        self.client.credentials().clear().await?;

        let request = with_body(ApiRequest::post(AUTH_LOGIN), input)?;
        let result: LoginResult = self.client.send_unrecovered_json(request).await?;
        if !result.user.role.may_use_console() {
            return Err(AuthError::RoleNotPermitted(result.user.role));
        }

        self.client
            .credentials()
            .save(&Credentials::new(
                result.access_token.as_str(),
                result.refresh_token.clone(),
            ))
            .await?;
        self.client.terminator().announce(SessionStatus::Active);
        Ok(result)
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn login(&self, input: LoginInput) -> Result<LoginResult, AuthError> {
        match self.try_login(&input).await {
            Ok(result) => {
                info!(email = %result.user.email, role = %result.user.role, "signed in");
                Ok(result)
            }
            Err(e) => {
                warn!(email = %input.email, error = %e, "sign in failed");
                if let Err(cleanup) = self.sign_out().await {
                    error!(error = %cleanup, "failed to clear credentials after sign in failure");
                }
                Err(e)
            }
        }
    }

    async fn register(&self, input: RegisterInput) -> Result<serde_json::Value, AuthError> {
        let request = with_body(ApiRequest::post(AUTH_REGISTER), &input)?;
        Ok(self.client.send_unrecovered_json(request).await?)
    }

    async fn current_user(&self) -> Result<User, AuthError> {
        let current: CurrentUser = self.client.get_json(AUTH_ME).await?;
        Ok(current.user)
    }

    async fn restore_session(&self) -> Result<Option<User>, AuthError> {
        if self
            .client
            .credentials()
            .get(CredentialKey::AccessToken)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) if user.role.may_use_console() => {
                self.client.terminator().announce(SessionStatus::Active);
                Ok(Some(user))
            }
            Ok(user) => {
                warn!(email = %user.email, "stored session belongs to a student account");
                self.sign_out().await?;
                Ok(None)
            }
            // the terminator already cleared the store and announced why
            Err(AuthError::Api(ApiError::Refresh(e))) => {
                info!(error = %e, "stored session could not be refreshed");
                Ok(None)
            }
            Err(e) => {
                info!(error = %e, "no valid session found");
                self.sign_out().await?;
                Ok(None)
            }
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.sign_out().await?;
        info!("signed out");
        Ok(())
    }

    fn session_status(&self) -> watch::Receiver<SessionStatus> {
        self.client.terminator().subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::endpoint::AUTH_REFRESH;
    use crate::domain_port::*;
    use crate::infra_memory::*;
    use serde_json::json;
    use std::sync::Arc;

    fn login_body(role: &str) -> String {
        json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "user": { "id": "u1", "email": "staff@example.com", "role": role }
        })
        .to_string()
    }

    fn service(
        transport: ScriptedTransport,
        credentials: Credentials,
    ) -> (RealAuthService, Arc<MemoryCredentialStore>, Arc<ScriptedTransport>) {
        let store = Arc::new(MemoryCredentialStore::with_credentials(&credentials));
        let transport = Arc::new(transport);
        let client = AuthenticatedClient::new(
            "http://backend",
            AUTH_REFRESH,
            transport.clone(),
            store.clone(),
            SessionStatus::SignedOut,
        );
        (RealAuthService::new(client), store, transport)
    }

    fn input() -> LoginInput {
        LoginInput {
            email: "staff@example.com".to_owned(),
            password: "secret".to_owned(),
        }
    }

    #[tokio::test]
    async fn login_stores_both_tokens() {
        let (auth, store, transport) = service(
            ScriptedTransport::new(|_| Ok(HttpResponse::new(200, login_body("TEACHER")))),
            Credentials::default(),
        );
        let status = auth.session_status();

        let result = auth.login(input()).await.unwrap();

        assert_eq!(result.user.role, Role::Teacher);
        let stored = store.load().await.unwrap();
        assert_eq!(stored.access_token.as_deref(), Some("access-1"));
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
        assert!(status.borrow().is_active());

        let sent = &transport.requests_to(AUTH_LOGIN)[0];
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "email": "staff@example.com", "password": "secret" }));
    }

    #[tokio::test]
    async fn students_are_turned_away() {
        let (auth, store, _) = service(
            ScriptedTransport::new(|_| Ok(HttpResponse::new(200, login_body("STUDENT")))),
            Credentials::default(),
        );

        let err = auth.login(input()).await.unwrap_err();

        assert!(matches!(err, AuthError::RoleNotPermitted(Role::Student)));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_login_does_not_start_a_refresh() {
        let (auth, store, transport) = service(
            ScriptedTransport::new(|_| Ok(HttpResponse::new(401, "bad credentials"))),
            Credentials::new("stale", Some("stale-refresh".to_owned())),
        );

        let err = auth.login(input()).await.unwrap_err();

        match err {
            AuthError::Api(e) => assert!(e.is_unauthorized()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(transport.requests_to(AUTH_REFRESH).is_empty());
        assert!(transport.requests_to(AUTH_LOGIN)[0].bearer_token().is_none());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn restore_without_token_is_anonymous() {
        let (auth, _, transport) = service(
            ScriptedTransport::new(|_| Ok(HttpResponse::new(500, ""))),
            Credentials::default(),
        );

        assert!(auth.restore_session().await.unwrap().is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn restore_returns_the_signed_in_user() {
        let (auth, _, transport) = service(
            ScriptedTransport::new(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"user":{"id":"u1","email":"a@b.c","role":"ADMIN"}}"#,
                ))
            }),
            Credentials::new("access-1", Some("refresh-1".to_owned())),
        );

        let user = auth.restore_session().await.unwrap().unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_eq!(
            transport.requests_to(AUTH_ME)[0].bearer_token(),
            Some("access-1")
        );
        assert!(auth.session_status().borrow().is_active());
    }

    #[tokio::test]
    async fn restore_clears_a_student_session() {
        let (auth, store, _) = service(
            ScriptedTransport::new(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"user":{"id":"u1","email":"a@b.c","role":"STUDENT"}}"#,
                ))
            }),
            Credentials::new("access-1", Some("refresh-1".to_owned())),
        );

        assert!(auth.restore_session().await.unwrap().is_none());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn restore_clears_credentials_on_failure() {
        let (auth, store, _) = service(
            ScriptedTransport::new(|_| Err(TransportError::Connect("refused".to_owned()))),
            Credentials::new("access-1", Some("refresh-1".to_owned())),
        );

        assert!(auth.restore_session().await.unwrap().is_none());
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(*auth.session_status().borrow(), SessionStatus::SignedOut);
    }

    #[tokio::test]
    async fn logout_clears_and_announces() {
        let (auth, store, _) = service(
            ScriptedTransport::new(|_| Ok(HttpResponse::new(200, ""))),
            Credentials::new("access-1", Some("refresh-1".to_owned())),
        );
        auth.client.terminator().announce(SessionStatus::Active);

        auth.logout().await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(*auth.session_status().borrow(), SessionStatus::SignedOut);
    }

    #[tokio::test]
    async fn register_passes_the_nickname() {
        let (auth, _, transport) = service(
            ScriptedTransport::new(|_| Ok(HttpResponse::new(201, r#"{"id":"u9"}"#))),
            Credentials::default(),
        );

        let created = auth
            .register(RegisterInput {
                email: "new@example.com".to_owned(),
                password: "secret".to_owned(),
                nickname: Some("Newbie".to_owned()),
            })
            .await
            .unwrap();

        assert_eq!(created["id"], "u9");
        let sent = &transport.requests_to(AUTH_REGISTER)[0];
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["nickname"], "Newbie");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_ended_status() {
        let (auth, store, transport) = service(
            ScriptedTransport::new(|_| Ok(HttpResponse::new(401, r#"{"message":"expired"}"#))),
            Credentials::new("access-1", Some("refresh-1".to_owned())),
        );

        assert!(auth.restore_session().await.unwrap().is_none());

        assert_eq!(transport.requests_to(AUTH_REFRESH).len(), 1);
        assert!(store.load().await.unwrap().is_empty());
        assert!(matches!(
            *auth.session_status().borrow(),
            SessionStatus::Ended { .. }
        ));
    }

    /// Accepts the clear done before sign in, then fails every removal.
    struct FailingCleanupStore {
        removals: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CredentialStore for FailingCleanupStore {
        async fn get(&self, _key: CredentialKey) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: CredentialKey, _value: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn remove(&self, _key: CredentialKey) -> Result<(), StoreError> {
            let done = self
                .removals
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if done < CredentialKey::ALL.len() {
                Ok(())
            } else {
                Err(StoreError::Io("read-only file system".to_owned()))
            }
        }
    }

    #[tokio::test]
    async fn login_reports_its_own_failure_over_cleanup_errors() {
        let client = AuthenticatedClient::new(
            "http://backend",
            AUTH_REFRESH,
            Arc::new(ScriptedTransport::new(|_| {
                Ok(HttpResponse::new(401, "bad credentials"))
            })),
            Arc::new(FailingCleanupStore {
                removals: std::sync::atomic::AtomicUsize::new(0),
            }),
            SessionStatus::SignedOut,
        );
        let auth = RealAuthService::new(client);

        let err = auth.login(input()).await.unwrap_err();

        match err {
            AuthError::Api(e) => assert!(e.is_unauthorized()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
