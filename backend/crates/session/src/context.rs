//! Session state machine
//!
//! ```text
//! Unauthenticated --start (token found)--> Validating --ok--> Authenticated
//!                                               \--fail--> Unauthenticated
//! Unauthenticated --login/register ok--> Authenticated
//! Authenticated --logout / 401 from any call--> Unauthenticated
//! ```

use platform::bearer::bearer_header_value;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SessionError;
use crate::gateway::{AuthGateway, AuthPayload, LoginRequest, Method, RegisterRequest};
use crate::state::{ProfilePatch, SessionState, SessionUser};
use crate::store::TokenStore;

pub struct SessionContext<G, S>
where
    G: AuthGateway,
    S: TokenStore,
{
    gateway: G,
    store: S,
    state: SessionState,
}

impl<G, S> SessionContext<G, S>
where
    G: AuthGateway,
    S: TokenStore,
{
    pub fn new(gateway: G, store: S) -> Self {
        Self {
            gateway,
            store,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.state.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Restore a persisted session. Any failure leaves the session
    /// unauthenticated with the token removed.
    pub async fn start(&mut self) -> &SessionState {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.state = SessionState::Unauthenticated;
                return &self.state;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted token");
                self.state = SessionState::Unauthenticated;
                return &self.state;
            }
        };

        self.state = SessionState::Validating;

        match self.gateway.me(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "Session restored");
                self.state = SessionState::Authenticated(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Persisted token rejected");
                self.discard_token();
                self.state = SessionState::Unauthenticated;
            }
        }

        &self.state
    }

    /// On failure the state is unchanged and the error carries the
    /// server's message.
    pub async fn login(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<SessionUser, SessionError> {
        let request = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let payload = self.gateway.login(&request).await?;
        self.establish(payload)
    }

    pub async fn register(&mut self, request: RegisterRequest) -> Result<SessionUser, SessionError> {
        let payload = self.gateway.register(&request).await?;
        self.establish(payload)
    }

    pub fn logout(&mut self) {
        self.discard_token();
        self.state = SessionState::Unauthenticated;
    }

    /// Call any API route with the held token attached. A 401 answer ends
    /// the session before the error is returned.
    pub async fn send<T>(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, SessionError>
    where
        T: DeserializeOwned + Send,
    {
        let token = self.store.load()?;

        match self.gateway.send(method, path, token.as_deref(), body).await {
            Ok(data) => Ok(data),
            Err(e) => {
                if let Some(status) = e.status() {
                    self.observe_status(status);
                }
                Err(e.into())
            }
        }
    }

    /// Feed the status of a response received outside [`Self::send`]. A 401 ends the session.
    /// Returns whether the session was cleared.
    pub fn observe_status(&mut self, status: u16) -> bool {
        if status != 401 {
            return false;
        }

        tracing::debug!("Unauthorized response observed, clearing session");
        self.logout();
        true
    }

    /// Merge a partial profile into the cached user. Client-side only;
    /// no-op when signed out.
    pub fn update_user(&mut self, patch: ProfilePatch) -> Option<&SessionUser> {
        match &mut self.state {
            SessionState::Authenticated(user) => {
                user.apply(patch);
                Some(user)
            }
            _ => None,
        }
    }

    /// `Authorization` header value for outgoing API calls, if a token is held
    pub fn bearer_header(&self) -> Result<Option<String>, SessionError> {
        Ok(self.store.load()?.map(|token| bearer_header_value(&token)))
    }

    fn establish(&mut self, payload: AuthPayload) -> Result<SessionUser, SessionError> {
        self.store.save(&payload.token)?;
        tracing::debug!(user_id = %payload.user.id, "Session established");
        self.state = SessionState::Authenticated(payload.user.clone());
        Ok(payload.user)
    }

    fn discard_token(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Could not remove persisted token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::store::{AUTH_TOKEN_KEY, MemoryTokenStore};
    use kernel::role::is_farmer;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const GOOD_TOKEN: &str = "good-token";

    fn user() -> SessionUser {
        serde_json::from_value(serde_json::json!({
            "id": "6f1c2f9e-9a2b-4c1d-8e3f-1a2b3c4d5e6f",
            "email": "amina@example.com",
            "phoneNumber": "0712345678",
            "firstName": "Amina",
            "lastName": "Otieno",
            "role": "FARMER"
        }))
        .unwrap()
    }

    fn rejected(status: u16, message: &str) -> GatewayError {
        GatewayError::Rejected {
            status,
            message: message.to_string(),
        }
    }

    /// Accepts `GOOD_TOKEN` (until revoked) and the password "secret1"
    #[derive(Default)]
    struct FakeGateway {
        me_calls: AtomicUsize,
        last_register: Mutex<Option<RegisterRequest>>,
        last_token: Mutex<Option<String>>,
        revoked: AtomicBool,
    }

    impl AuthGateway for FakeGateway {
        async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, GatewayError> {
            if request.password == "secret1" {
                Ok(AuthPayload {
                    user: user(),
                    token: GOOD_TOKEN.to_string(),
                })
            } else {
                Err(rejected(401, "Invalid credentials"))
            }
        }

        async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, GatewayError> {
            if let Ok(mut last) = self.last_register.lock() {
                *last = Some(request.clone());
            }
            if request.password != request.confirm_password {
                return Err(rejected(400, "Passwords do not match"));
            }
            Ok(AuthPayload {
                user: user(),
                token: GOOD_TOKEN.to_string(),
            })
        }

        async fn me(&self, token: &str) -> Result<SessionUser, GatewayError> {
            self.me_calls.fetch_add(1, Ordering::SeqCst);
            if token == GOOD_TOKEN {
                Ok(user())
            } else {
                Err(rejected(401, "Invalid or expired token"))
            }
        }

        async fn send<T>(
            &self,
            _method: Method,
            path: &str,
            token: Option<&str>,
            _body: Option<&Value>,
        ) -> Result<T, GatewayError>
        where
            T: DeserializeOwned + Send,
        {
            if let Ok(mut last) = self.last_token.lock() {
                *last = token.map(str::to_string);
            }
            if path == "/broken" {
                return Err(rejected(500, "Internal server error"));
            }
            if token != Some(GOOD_TOKEN) || self.revoked.load(Ordering::SeqCst) {
                return Err(rejected(401, "Invalid or expired token"));
            }
            serde_json::from_value(serde_json::json!({ "deliveries": 3 }))
                .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
        }
    }

    fn context(store: MemoryTokenStore) -> SessionContext<FakeGateway, MemoryTokenStore> {
        SessionContext::new(FakeGateway::default(), store)
    }

    #[tokio::test]
    async fn start_without_token_stays_unauthenticated() {
        let mut ctx = context(MemoryTokenStore::new());

        assert_eq!(ctx.start().await, &SessionState::Unauthenticated);
        assert_eq!(ctx.gateway.me_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn start_with_valid_token_authenticates() {
        let mut ctx = context(MemoryTokenStore::with_token(GOOD_TOKEN));

        assert!(ctx.start().await.is_authenticated());
        assert!(ctx.user().is_some_and(is_farmer));
    }

    #[tokio::test]
    async fn start_with_rejected_token_removes_it() {
        let mut ctx = context(MemoryTokenStore::with_token("stale-token"));

        assert_eq!(ctx.start().await, &SessionState::Unauthenticated);
        assert_eq!(ctx.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn login_persists_token() {
        let mut ctx = context(MemoryTokenStore::new());

        let user = ctx.login("amina@example.com", "secret1").await.unwrap();
        assert_eq!(user.email, "amina@example.com");
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.store.load().unwrap().as_deref(), Some(GOOD_TOKEN));
        assert_eq!(
            ctx.bearer_header().unwrap().as_deref(),
            Some("Bearer good-token")
        );
    }

    #[tokio::test]
    async fn failed_login_leaves_state_unchanged() {
        let mut ctx = context(MemoryTokenStore::new());

        let err = ctx.login("amina@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(ctx.state(), &SessionState::Unauthenticated);
        assert_eq!(ctx.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn register_sends_form_and_authenticates() {
        let mut ctx = context(MemoryTokenStore::new());
        let request = RegisterRequest {
            email: "amina@example.com".into(),
            phone_number: "0712345678".into(),
            first_name: "Amina".into(),
            last_name: "Otieno".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            ..RegisterRequest::default()
        };

        ctx.register(request).await.unwrap();
        assert!(ctx.is_authenticated());

        let sent = ctx.gateway.last_register.lock().unwrap().clone().unwrap();
        assert_eq!(sent.phone_number, "0712345678");
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session() {
        let mut ctx = context(MemoryTokenStore::new());
        ctx.login("amina@example.com", "secret1").await.unwrap();

        assert!(!ctx.observe_status(500));
        assert!(ctx.is_authenticated());

        assert!(ctx.observe_status(401));
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn logout_removes_token() {
        let store = MemoryTokenStore::with_token(GOOD_TOKEN);
        let mut ctx = context(store);
        ctx.start().await;

        ctx.logout();
        assert_eq!(ctx.state(), &SessionState::Unauthenticated);
        assert_eq!(ctx.store.load().unwrap(), None);
        assert_eq!(ctx.bearer_header().unwrap(), None);
        assert_eq!(AUTH_TOKEN_KEY, "authToken");
    }

    #[tokio::test]
    async fn update_user_merges_only_when_authenticated() {
        let mut ctx = context(MemoryTokenStore::new());
        let patch = ProfilePatch {
            last_name: Some("Kamau".into()),
            ..ProfilePatch::default()
        };
        assert!(ctx.update_user(patch.clone()).is_none());

        ctx.login("amina@example.com", "secret1").await.unwrap();
        let user = ctx.update_user(patch).unwrap();
        assert_eq!(user.last_name, "Kamau");
        assert_eq!(user.first_name, "Amina");
    }

    #[tokio::test]
    async fn api_call_attaches_held_token() {
        let mut ctx = context(MemoryTokenStore::new());
        ctx.login("amina@example.com", "secret1").await.unwrap();

        let data: serde_json::Value = ctx.send(Method::GET, "/milk-records", None).await.unwrap();
        assert_eq!(data["deliveries"], 3);
        assert_eq!(
            ctx.gateway.last_token.lock().unwrap().as_deref(),
            Some(GOOD_TOKEN)
        );
        assert!(ctx.is_authenticated());
    }

    #[tokio::test]
    async fn unauthorized_api_call_clears_session() {
        let mut ctx = context(MemoryTokenStore::new());
        ctx.login("amina@example.com", "secret1").await.unwrap();
        ctx.gateway.revoked.store(true, Ordering::SeqCst);

        let err = ctx
            .send::<serde_json::Value>(Method::POST, "/service-requests", None)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid or expired token");
        assert_eq!(ctx.state(), &SessionState::Unauthenticated);
        assert_eq!(ctx.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn failed_api_call_keeps_session() {
        let mut ctx = context(MemoryTokenStore::new());
        ctx.login("amina@example.com", "secret1").await.unwrap();

        let result = ctx.send::<serde_json::Value>(Method::GET, "/broken", None).await;
        assert!(result.is_err());
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.store.load().unwrap().as_deref(), Some(GOOD_TOKEN));
    }
}
