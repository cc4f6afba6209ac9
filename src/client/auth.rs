//! `/auth/*` wrapper: login, logout, profile, self-registration, password change

use crate::auth::dto::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest};
use crate::auth::password::workflow::PasswordChanger;
use crate::auth::session::Session;
use crate::client::http::{Ack, ApiClient};
use crate::models::User;
use crate::types::ApiError;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
        }
    }

    /// Logs in and initializes the session
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.client.post("/auth/login", &request).await?;

        self.client.session().save(Session {
            token: response.token,
            user: response.user.clone(),
        })?;
        log::info!("Logged in as {}", response.user.username);
        Ok(response.user)
    }

    /// Logs out; the local session is torn down even if the server call fails
    pub async fn logout(&self) -> Result<(), ApiError> {
        if !self.client.session().is_authenticated() {
            return Ok(());
        }

        let remote = self.client.send_ack::<Value>(Method::POST, "/auth/logout", None).await;
        self.client.session().clear()?;
        match remote {
            Ok(_) => log::info!("Logged out"),
            Err(e) => log::warn!("Server-side logout failed, local session cleared anyway: {}", e),
        }
        Ok(())
    }

    /// Refreshes the signed-in user's record
    pub async fn me(&self) -> Result<User, ApiError> {
        let user: User = self.client.get("/auth/me").await?;
        if let Some(session) = self.client.session().load() {
            self.client.session().save(Session {
                token: session.token,
                user: user.clone(),
            })?;
        }
        Ok(user)
    }

    /// User stored with the session, without a network call
    pub fn current_user(&self) -> Option<User> {
        self.client.session().load().map(|s| s.user)
    }

    /// Student self-registration
    pub async fn register(&self, request: &RegisterRequest) -> Result<Ack, ApiError> {
        self.client.send_ack(Method::POST, "/auth/register", Some(request)).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<Option<String>, ApiError> {
        let ack = self.client.send_ack(Method::POST, "/auth/change-password", Some(request)).await?;
        Ok(ack.message)
    }
}

#[async_trait]
impl PasswordChanger for AuthApi {
    async fn change_password(&self, request: &ChangePasswordRequest) -> Result<Option<String>, ApiError> {
        AuthApi::change_password(self, request).await
    }
}
