//! Auth API gateway
//!
//! `HttpAuthGateway` talks to a running server; tests substitute their own
//! implementation of [`AuthGateway`]. Besides the auth routes, `send`
//! reaches any other API route with the caller's bearer token.

use std::time::Duration;

use kernel::response::ApiResponse;
use platform::bearer::bearer_header_value;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use reqwest::Method;

use crate::error::GatewayError;
use crate::state::SessionUser;

/// Default API base, including the `/api` prefix
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooperative_id: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// `data` of a successful login or registration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: SessionUser,
    pub token: String,
}

#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// POST /auth/login
    async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, GatewayError>;

    /// POST /auth/register
    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, GatewayError>;

    /// GET /auth/me with the bearer token
    async fn me(&self, token: &str) -> Result<SessionUser, GatewayError>;

    /// Any API route. `path` is relative to the base URL; `token` is sent
    /// as the bearer credential when present.
    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Send;
}

#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl AuthGateway for HttpAuthGateway {
    async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, GatewayError> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        read_envelope(res).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, GatewayError> {
        let res = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        read_envelope(res).await
    }

    async fn me(&self, token: &str) -> Result<SessionUser, GatewayError> {
        AuthGateway::send(self, Method::GET, "/auth/me", Some(token), None).await
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Send,
    {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, bearer_header_value(token));
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        read_envelope(req.send().await?).await
    }
}

/// Decode the `{success, data?, message?, error?}` envelope
async fn read_envelope<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, GatewayError> {
    let status = res.status();
    let bytes = res.bytes().await?;
    let envelope: Option<ApiResponse<T>> = serde_json::from_slice(&bytes).ok();

    if !status.is_success() {
        let message = envelope
            .as_ref()
            .and_then(ApiResponse::reason)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        tracing::debug!(status = status.as_u16(), %message, "Auth API rejected request");
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let envelope = envelope
        .ok_or_else(|| GatewayError::InvalidResponse("body is not a response envelope".into()))?;

    if !envelope.success {
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            message: envelope.reason().unwrap_or("Request failed").to_string(),
        });
    }

    envelope
        .data
        .ok_or_else(|| GatewayError::InvalidResponse("response has no data".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_wire_shape() {
        let body = serde_json::to_value(RegisterRequest {
            email: "a@example.com".into(),
            phone_number: "0712345678".into(),
            first_name: "Amina".into(),
            last_name: "Otieno".into(),
            cooperative_id: None,
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        })
        .unwrap();

        assert_eq!(body["phoneNumber"], "0712345678");
        assert_eq!(body["confirmPassword"], "secret1");
        assert!(body.get("cooperativeId").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let gateway = HttpAuthGateway::with_client(reqwest::Client::new(), "http://host/api/");
        assert_eq!(gateway.url("/auth/me"), "http://host/api/auth/me");
    }
}
