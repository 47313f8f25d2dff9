//! Sign-up, sign-in and sign-out.

use std::sync::Arc;

use sprout_core::models::Credentials;

use crate::api::ApiClient;
use crate::error::ClientResult;

pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Create an account and start a session with the returned token.
    pub async fn register(
        &self,
        credentials: &Credentials,
        confirm_password: &str,
    ) -> ClientResult<()> {
        credentials.validate_sign_up(confirm_password)?;
        let response = self.api.register(credentials).await?;
        self.api.session().start(response.token).await?;
        tracing::info!(email = %credentials.email, "Registered");
        Ok(())
    }

    /// Sign in and persist the returned token.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<()> {
        credentials.validate()?;
        let response = self.api.login(credentials).await?;
        self.api.session().start(response.token).await?;
        tracing::info!(email = %credentials.email, "Signed in");
        Ok(())
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.api.session().clear().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated().await
    }
}
