use axum::Router;
use shared::domain::{Identity, Role, UserId};
use tokio::net::TcpListener;

use crate::{gateway::ApiGateway, session::SessionStore};

/// Serves `routes` under `/api/v1` on an ephemeral port and returns the base url.
pub async fn spawn_api(routes: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new().nest("/api/v1", routes);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/api/v1")
}

pub fn gateway(base_url: &str, session: &SessionStore) -> ApiGateway {
    ApiGateway::new(base_url, session.clone()).expect("gateway")
}

pub async fn signed_in_session() -> SessionStore {
    let session = SessionStore::in_memory();
    session.sign_in("admin-token", admin()).await;
    session
}

pub fn admin() -> Identity {
    Identity {
        id: UserId(7),
        full_name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        role: Role::Admin,
    }
}

/// An address nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/api/v1")
}
