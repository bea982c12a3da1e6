use std::sync::{Arc, RwLock};

use reqwest::Client;
use tracing::{info, warn};

use crate::error::{handle_response, ClientError};
use crate::types::{AuthResponse, LoginRequest, UserInfo};

/// Holds the bearer token and user identity for the session.
pub struct AuthManager {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
    user: Arc<RwLock<Option<UserInfo>>>,
}

impl AuthManager {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Log in with username and password, storing the token on success.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ClientError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let username = request.username.clone();

        let response = self.client.post(&url).json(&request).send().await?;
        let auth: AuthResponse = handle_response(response).await?;

        if let Ok(mut t) = self.token.write() {
            *t = Some(auth.token.clone());
        }
        if let Ok(mut u) = self.user.write() {
            *u = Some(auth.user.clone());
        }

        info!("Logged in as {}", username);
        Ok(auth)
    }

    /// Notify the server, then clear all auth state.
    ///
    /// Local state is cleared even if the server call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = format!("{}/api/auth/logout", self.base_url);
        let token = self.token();

        if let Ok(mut t) = self.token.write() {
            *t = None;
        }
        if let Ok(mut u) = self.user.write() {
            *u = None;
        }

        if let Some(token) = token {
            let result = self.client.post(&url).bearer_auth(&token).send().await;
            if let Err(error) = result {
                warn!(%error, "logout request failed, local state cleared anyway");
            }
        }
        Ok(())
    }

    /// The current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.token.read().ok()?.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().ok().map(|t| t.is_some()).unwrap_or(false)
    }

    pub fn user_name(&self) -> Option<String> {
        self.user.read().ok()?.as_ref().map(|u| u.username.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .read()
            .ok()
            .and_then(|u| u.as_ref().map(|u| u.role.as_deref() == Some("admin")))
            .unwrap_or(false)
    }
}

/// Attach the bearer token to a request if one is held.
pub(crate) fn maybe_bearer(
    request: reqwest::RequestBuilder,
    auth: &AuthManager,
) -> reqwest::RequestBuilder {
    match auth.token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}
