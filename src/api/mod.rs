// src/api/mod.rs

pub mod auth;
pub mod catalog;
pub mod quiz;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::AuthContext;
use crate::config::Config;
use crate::error::AppError;

/// Typed client for the platform backend.
///
/// Cheap to clone; all state is the connection pool, the base URL and
/// the shared auth context. Every request attaches the bearer token when
/// one is held.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    auth: AuthContext,
}

impl ApiClient {
    pub fn new(config: &Config, auth: AuthContext) -> Result<Self, AppError> {
        let http = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let base = Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Validation(format!("invalid API_BASE_URL: {}", e)))?;

        Ok(Self { http, base, auth })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        self.base
            .join(path)
            .map_err(|e| AppError::Validation(format!("invalid request path '{}': {}", path, e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(token) = self.auth.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Sends the request, mapping non-2xx responses to `AppError::Http`
    /// with the response body text as the message.
    async fn send(&self, req: RequestBuilder) -> Result<Response, AppError> {
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body
            };
            return Err(AppError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(res)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let res = self.send(self.request(Method::GET, self.url(path)?)).await?;
        Ok(res.json().await?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, self.url(path)?).json(body);
        let res = self.send(req).await?;
        Ok(res.json().await?)
    }

    /// POST with no payload, expecting a JSON body back.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let res = self
            .send(self.request(Method::POST, self.url(path)?))
            .await?;
        Ok(res.json().await?)
    }

    /// POST whose 2xx response carries no JSON body (`Ok()` endpoints).
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), AppError> {
        let mut req = self.request(Method::POST, self.url(path)?);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await?;
        Ok(())
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, self.url(path)?).json(body);
        let res = self.send(req).await?;
        Ok(res.json().await?)
    }

    /// PUT whose 2xx response carries no JSON body.
    pub(crate) async fn put_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        let req = self.request(Method::PUT, self.url(path)?).json(body);
        self.send(req).await?;
        Ok(())
    }
}
