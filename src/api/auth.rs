// src/api/auth.rs

use crate::error::AppError;
use crate::models::user::{Credentials, TokenResponse};

use super::ApiClient;

impl ApiClient {
    /// Authenticates and stores the bearer token in the auth context.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res: TokenResponse = self.post_json("/api/Auth/login", &credentials).await?;
        self.auth().set_token(res.token);
        Ok(())
    }

    /// Registers a new account. The user logs in separately afterwards.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), AppError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_unit("/api/Auth/register", Some(&credentials))
            .await
    }

    pub fn logout(&self) {
        self.auth().clear();
    }
}
