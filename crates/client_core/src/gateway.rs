//! The single HTTP client every screen talks through.
//!
//! Outgoing requests get the session credential attached at send time;
//! failed responses are classified once here. A 401 signs the session out
//! and redirects to login, the desktop-only 403 redirects to the
//! access-denied view, and everything else goes back to the caller.

use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    multipart::Form,
    Client, Method, Request, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::error::ApiError;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use url::Url;

use crate::{error::ClientError, guard::View, session::SessionStore};

pub const DEFAULT_API_BASE_URL: &str =
    "http://ec2-16-170-223-254.eu-north-1.compute.amazonaws.com/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Redirect(View),
}

/// Adds `Authorization: Bearer <credential>` when the session holds one.
/// Requests without a credential go out unchanged; the server decides.
pub fn attach_auth(mut request: Request, session: &SessionStore) -> Request {
    if let Some(credential) = session.current_credential() {
        match HeaderValue::from_str(&format!("Bearer {credential}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(err) => warn!(error = %err, "credential is not a valid header value"),
        }
    }
    request
}

/// Maps a non-2xx status and its `{message}` body to an error kind.
pub fn classify_failure(status: StatusCode, body: ApiError) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN if body.is_desktop_only_denial() => {
            ClientError::AccessRestricted(body.message)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation {
            status: status.as_u16(),
            message: body.message,
        },
        _ => ClientError::Server {
            status: status.as_u16(),
            message: body.message,
        },
    }
}

#[derive(Clone)]
pub struct ApiGateway {
    http: Client,
    base_url: String,
    session: SessionStore,
    events: broadcast::Sender<ClientEvent>,
}

impl ApiGateway {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url, session)
    }

    pub fn with_client(
        http: Client,
        base_url: &str,
        session: SessionStore,
    ) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid api base url '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "api base url must be http or https: '{base_url}'"
            )));
        }

        let (events, _) = broadcast::channel(64);
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub(crate) fn navigate(&self, view: View) {
        let _ = self.events.send(ClientEvent::Redirect(view));
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.endpoint(path))
    }

    /// Sends a prepared request through the auth decorator and the response
    /// interceptor.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let request = builder
            .build()
            .map_err(|e| ClientError::InvalidInput(format!("failed to build request: {e}")))?;
        let request = attach_auth(request, &self.session);
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        self.intercept(&method, &path, response).await
    }

    async fn intercept(
        &self,
        method: &Method,
        path: &str,
        response: Response,
    ) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error = failure(response).await;

        match &error {
            ClientError::Unauthorized => {
                warn!(%method, path, "credential rejected; signing out");
                self.session.sign_out().await;
                self.navigate(View::Login);
            }
            ClientError::AccessRestricted(_) => {
                warn!(%method, path, "desktop client required");
                self.navigate(View::AccessDenied);
            }
            other => debug!(%method, path, %status, error = %other, "request failed"),
        }
        Err(error)
    }

    /// Posts a credential check (login, account deletion confirmation).
    /// Failures are classified but never reach the interceptor: a rejected
    /// password is not an expired session.
    pub async fn exchange_credentials<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, path)
            .json(body)
            .build()
            .map_err(|e| ClientError::InvalidInput(format!("failed to build request: {e}")))?;
        debug!(path = request.url().path(), "exchanging credentials");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        decode(response).await
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(method, path).json(body)).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    /// For endpoints whose response body the caller has no use for.
    pub async fn send_json_discard<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(method, path).json(body)).await?;
        Ok(())
    }

    pub async fn post_json_discard<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send_json_discard(Method::POST, path, body).await
    }

    pub async fn patch_json_discard<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send_json_discard(Method::PATCH, path, body).await
    }

    pub async fn patch_empty(&self, path: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::PATCH, path)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<(), ClientError> {
        self.execute(self.request(Method::POST, path).multipart(form))
            .await?;
        Ok(())
    }
}

async fn failure(response: Response) -> ClientError {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<ApiError>(&bytes).ok())
        .unwrap_or_default();
    classify_failure(status, body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
