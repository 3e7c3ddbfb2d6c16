use serde_json::{Value, json};

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    AuthOutcome, LoginRequest, RegisterRequest, ResetPasswordRequest, Role, TokenResponse, User,
};
use crate::storage::{self, StoreState, TOKEN_KEY, USER_KEY};

/// SessionStore
///
/// Durable "who is logged in". The token and the serialized profile live in the shared
/// key-value store (the same one the HTTP client clears on a 401), so there is exactly one
/// copy of the session and it survives restarts when the store is file-backed.
///
/// A token without a cached profile is tolerated (`ensure_user` re-fetches it); a profile
/// is only ever written after a token.
///
/// Every network operation returns an `AuthOutcome`; nothing here propagates an error to
/// the page.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    store: StoreState,
}

impl SessionStore {
    pub fn new(api: ApiClient, store: StoreState) -> Self {
        Self { api, store }
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get_item(TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    fn set_token(&self, token: &str) {
        self.store.set_item(TOKEN_KEY, token);
    }

    /// True iff a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The cached profile. A corrupt cached value reads as absent.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached user: {}", e);
                None
            }
        }
    }

    /// Replaces the cached profile (after a profile update).
    pub fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.store.set_item(USER_KEY, &raw),
            Err(e) => tracing::error!("Failed to serialize user: {}", e),
        }
    }

    fn has_role(&self, role: Role) -> bool {
        self.current_user().is_some_and(|user| user.role == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    pub fn is_business_admin(&self) -> bool {
        self.has_role(Role::BusinessAdmin)
    }

    /// logout
    ///
    /// Local only: forgets the token and the profile. The server is not called.
    pub fn logout(&self) {
        tracing::info!("Logging out");
        storage::clear_session(self.store.as_ref());
    }

    /// login
    ///
    /// Exchanges credentials for a token, stores it, then fetches and caches the profile.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome<User> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let result: ApiResult<User> = async {
            let data = self.api.post("/auth/login", &credentials).await?;
            let token: TokenResponse = serde_json::from_value(data)?;
            self.set_token(&token.access_token);
            self.refresh_user().await
        }
        .await;

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = user.role.as_str(), "Login succeeded");
                AuthOutcome::Success(user)
            }
            Err(e) => {
                tracing::info!("Login failed: {}", e);
                AuthOutcome::failure(e.to_string())
            }
        }
    }

    /// register
    ///
    /// Creates a customer account. Does not log in.
    pub async fn register(&self, email: &str, password: &str) -> AuthOutcome<Value> {
        self.register_as(email, password, Role::Customer).await
    }

    pub async fn register_as(&self, email: &str, password: &str, role: Role) -> AuthOutcome<Value> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        outcome(self.api.post("/auth/register", &request).await)
    }

    /// refresh_user
    ///
    /// Fetches `GET /auth/me` and caches the result.
    pub async fn refresh_user(&self) -> ApiResult<User> {
        let user: User = self.api.get_as("/auth/me").await?;
        self.set_user(&user);
        Ok(user)
    }

    /// ensure_user
    ///
    /// The cached profile, re-fetched when a token exists without one.
    pub async fn ensure_user(&self) -> Option<User> {
        if let Some(user) = self.current_user() {
            return Some(user);
        }
        if !self.is_authenticated() {
            return None;
        }
        match self.refresh_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Could not re-fetch the current user: {}", e);
                None
            }
        }
    }

    /// update_email
    ///
    /// Changes the account email, then refreshes the cached profile.
    pub async fn update_email(&self, email: &str) -> AuthOutcome<User> {
        let result: ApiResult<User> = async {
            self.api.put("/users/me", &json!({ "email": email })).await?;
            self.refresh_user().await
        }
        .await;
        outcome(result)
    }

    // --- Password Recovery ---

    pub async fn forgot_password(&self, email: &str) -> AuthOutcome<Value> {
        outcome(
            self.api
                .post("/auth/forgot-password", &json!({ "email": email }))
                .await,
        )
    }

    pub async fn verify_reset_token(&self, email: &str, token: &str) -> AuthOutcome<Value> {
        outcome(
            self.api
                .post("/auth/verify-reset-token", &json!({ "email": email, "token": token }))
                .await,
        )
    }

    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> AuthOutcome<Value> {
        let request = ResetPasswordRequest {
            email: email.to_string(),
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        outcome(self.api.post("/auth/reset-password", &request).await)
    }

    /// request_business
    ///
    /// Submits a business registration application for review.
    pub async fn request_business(&self, application: &Value) -> AuthOutcome<Value> {
        outcome(self.api.post("/auth/request-business", application).await)
    }
}

fn outcome<T>(result: ApiResult<T>) -> AuthOutcome<T> {
    match result {
        Ok(value) => AuthOutcome::Success(value),
        Err(e) => AuthOutcome::failure(e.to_string()),
    }
}
