use shared::domain::Metrics;

use super::ViewHandle;
use crate::{error::ClientError, gateway::ApiGateway};

#[derive(Clone)]
pub struct DashboardScreen {
    gateway: ApiGateway,
    view: ViewHandle<Metrics>,
}

impl DashboardScreen {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            view: ViewHandle::new(),
        }
    }

    pub fn view(&self) -> &ViewHandle<Metrics> {
        &self.view
    }

    pub async fn load(&self) -> Result<Metrics, ClientError> {
        self.view
            .run(self.gateway.get_json("/admin/get-Metrics"))
            .await
    }
}
