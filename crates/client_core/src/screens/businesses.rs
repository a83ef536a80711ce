use shared::{domain::Business, protocol::CreateBusinessRequest};
use tracing::info;

use super::ViewHandle;
use crate::{error::ClientError, gateway::ApiGateway};

#[derive(Clone)]
pub struct BusinessesScreen {
    gateway: ApiGateway,
    view: ViewHandle<Vec<Business>>,
}

impl BusinessesScreen {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            view: ViewHandle::new(),
        }
    }

    pub fn view(&self) -> &ViewHandle<Vec<Business>> {
        &self.view
    }

    pub async fn load(&self) -> Result<Vec<Business>, ClientError> {
        self.view
            .run(self.gateway.get_json("/admin/get-businesses"))
            .await
    }

    pub async fn create(&self, business: &CreateBusinessRequest) -> Result<Vec<Business>, ClientError> {
        if business.business_name.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Business name is required.".to_string(),
            ));
        }
        self.gateway
            .post_json_discard("/admin/create-business", business)
            .await?;
        info!(name = %business.business_name, "business created");
        self.load().await
    }
}
