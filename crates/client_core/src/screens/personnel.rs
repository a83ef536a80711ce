//! Administrator accounts.

use shared::{
    domain::{Identity, UserId},
    protocol::AddAdminRequest,
};
use tracing::info;

use super::ViewHandle;
use crate::{error::ClientError, gateway::ApiGateway};

#[derive(Clone)]
pub struct PersonnelScreen {
    gateway: ApiGateway,
    view: ViewHandle<Vec<Identity>>,
}

impl PersonnelScreen {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            view: ViewHandle::new(),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<Identity>> {
        &self.view
    }

    async fn fetch(&self) -> Result<Vec<Identity>, ClientError> {
        let users: Vec<Identity> = self.gateway.get_json("/admin/get-users").await?;
        Ok(users.into_iter().filter(Identity::is_admin).collect())
    }

    /// Only accounts holding the admin role.
    pub async fn load(&self) -> Result<Vec<Identity>, ClientError> {
        self.view.run(self.fetch()).await
    }

    /// Grants the admin role by email. Rejections come back as validation
    /// errors with the text shown inline.
    pub async fn add(&self, email: &str) -> Result<Vec<Identity>, ClientError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ClientError::InvalidInput("Email is required.".to_string()));
        }

        let result = self
            .gateway
            .post_json_discard(
                "/admin/add-admin",
                &AddAdminRequest {
                    email: email.to_string(),
                },
            )
            .await;
        match result {
            Err(ClientError::Validation { status: 422, .. }) => {
                return Err(ClientError::Validation {
                    status: 422,
                    message: "Invalid data provided.".to_string(),
                })
            }
            Err(ClientError::Validation { status: 400, .. }) => {
                return Err(ClientError::Validation {
                    status: 400,
                    message: "User doesn't exist or already an admin.".to_string(),
                })
            }
            other => other?,
        }

        info!(email, "admin added");
        self.load().await
    }

    pub async fn revoke(&self, user_id: UserId) -> Result<Vec<Identity>, ClientError> {
        self.gateway
            .patch_empty(&format!("/admin/revoke-admin-status/{user_id}"))
            .await?;
        info!(%user_id, "admin status revoked");
        self.load().await
    }
}
