use ads_core::types::{Credentials, LoginResponse, MessageResponse};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionHandle};

/// REST client for the ads management API.
///
/// Every authenticated call goes through [`ApiClient::execute`], which maps a
/// 401 to [`ClientError::Unauthorized`] after dropping the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionHandle) -> ClientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    pub async fn register(&self, credentials: &Credentials) -> ClientResult<MessageResponse> {
        let response = self
            .http
            .post(self.url("/api/register")?)
            .json(credentials)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Log in and persist the returned credential.
    ///
    /// A 401 here means wrong credentials, not an expired session, so it is
    /// reported as an API error with the backend's text.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        let response = self
            .http
            .post(self.url("/api/login")?)
            .json(credentials)
            .send()
            .await?;
        let login: LoginResponse = Self::read_json(response).await?;
        self.session.establish(Session {
            user_id: login.user.id,
            access_token: login.access_token.clone(),
        })?;
        info!(user_id = login.user.id, email = %login.user.email, "Logged in");
        Ok(login)
    }

    pub fn logout(&self) {
        self.session.invalidate();
        info!("Logged out");
    }

    /// Start an authenticated request. Fails with `NotAuthenticated` before
    /// touching the network when no session is held.
    pub fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let session = self.session.require()?;
        let url = self.url(path)?;
        debug!(method = method.as_str(), url = url.as_str(), "API request");
        Ok(self.http.request(method, url).bearer_auth(session.access_token))
    }

    pub async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> ClientResult<String> {
        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected the session, clearing stored credential");
            self.session.invalidate();
            return Err(ClientError::Unauthorized);
        }
        Self::read_body(response).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(Method::GET, path)?;
        self.execute(request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.authorized(Method::POST, path)?.json(body);
        self.execute(request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.authorized(Method::PUT, path)?.json(body);
        self.execute(request).await
    }

    /// Success is decided by the status alone; an empty body (204 or a bare
    /// 200) yields `T::default()`.
    pub async fn delete<T: DeserializeOwned + Default>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(Method::DELETE, path)?;
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn read_body(response: reqwest::Response) -> ClientResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::from_body(status, &body));
        }
        Ok(body)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
