//! Sign-in, sign-out, identity refresh and account deletion.

use reqwest::Method;
use shared::{
    domain::Identity,
    protocol::{DeleteAccountRequest, LoginRequest, LoginResponse, UserResponse},
};
use tracing::{info, warn};

use crate::{error::ClientError, gateway::ApiGateway, guard::View};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFormErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginFormErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    fn summary(&self) -> String {
        [self.email, self.password]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), LoginFormErrors> {
        let errors = LoginFormErrors {
            email: self
                .email
                .trim()
                .is_empty()
                .then_some("Email is required."),
            password: self.password.is_empty().then_some("Password is required."),
        };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AccountController {
    gateway: ApiGateway,
}

impl AccountController {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Signs in an administrator. A token issued to a non-admin account is
    /// dropped without being stored.
    pub async fn login(&self, form: &LoginForm) -> Result<Identity, ClientError> {
        form.validate()
            .map_err(|errors| ClientError::InvalidInput(errors.summary()))?;

        let response = self.authenticate(form).await?;
        if !response.is_admin {
            warn!(user_id = %response.user.id, "login refused: account is not an administrator");
            return Err(ClientError::NotPermitted);
        }

        info!(user_id = %response.user.id, "signed in");
        self.gateway
            .session()
            .sign_in(response.token, response.user.clone())
            .await;
        self.gateway.navigate(View::Dashboard);
        Ok(response.user)
    }

    async fn authenticate(&self, form: &LoginForm) -> Result<LoginResponse, ClientError> {
        match self
            .gateway
            .exchange_credentials::<_, LoginResponse>("/auth/login", &form.to_request())
            .await
        {
            Err(ClientError::Unauthorized) | Err(ClientError::Validation { status: 422, .. }) => {
                Err(ClientError::InvalidCredentials)
            }
            other => other,
        }
    }

    pub async fn logout(&self) {
        self.gateway.session().sign_out().await;
        self.gateway.navigate(View::Login);
    }

    /// Re-reads the signed-in profile and caches it in the session.
    pub async fn refresh_identity(&self) -> Result<Identity, ClientError> {
        let response: UserResponse = self.gateway.get_json("/admin/get-user").await?;
        self.gateway
            .session()
            .update_identity(response.user.clone())
            .await;
        Ok(response.user)
    }

    /// Verifies the credentials by logging in, then deletes the account.
    /// No session is established along the way.
    pub async fn delete_account(&self, email: &str, password: &str) -> Result<(), ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::InvalidInput(
                "Please fill in both fields.".to_string(),
            ));
        }

        let form = LoginForm::new(email, password);
        self.authenticate(&form).await?;
        self.gateway
            .send_json_discard(
                Method::DELETE,
                "/user/delete-account",
                &DeleteAccountRequest {
                    email: email.trim().to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        info!("account deleted");
        self.gateway.navigate(View::Login);
        Ok(())
    }
}
