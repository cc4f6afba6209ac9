//! Shared HTTP core for every resource wrapper.
//!
//! One request per call: attach the bearer token when a session exists,
//! unwrap the `{ success, data, message, errors }` envelope on success, map
//! the status and envelope to an [`ApiError`] on failure. A 401 tears the
//! session down before the error is returned.

use crate::auth::session::SessionStore;
use crate::types::{ApiEnvelope, ApiError, AppConfig, FieldError};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Acknowledgement for calls that return no payload, only a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

/// Successful response after envelope unwrapping
#[derive(Debug)]
struct Unwrapped {
    data: Value,
    message: Option<String>,
}

/// HTTP client bound to one API base URL and one session store
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_config(config: &AppConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.request_timeout(), session)
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let unwrapped = self.execute(self.request(Method::GET, path)).await?;
        decode(unwrapped.data)
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let unwrapped = self.execute(self.request(Method::GET, path).query(query)).await?;
        decode(unwrapped.data)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let unwrapped = self.execute(self.request(Method::POST, path).json(body)).await?;
        decode(unwrapped.data)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let unwrapped = self.execute(self.request(Method::PUT, path).json(body)).await?;
        decode(unwrapped.data)
    }

    /// Sends a request whose only useful output is the server's message
    pub async fn send_ack<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Ack, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let unwrapped = self.execute(builder).await?;
        Ok(Ack {
            message: unwrapped.message,
        })
    }

    pub async fn delete(&self, path: &str) -> Result<Ack, ApiError> {
        self.send_ack::<Value>(Method::DELETE, path, None).await
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Unwrapped, ApiError> {
        let request = builder.build()?;
        log::debug!("{} {}", request.method(), request.url().path());

        let response = self.http.execute(request).await.map_err(|e| {
            log::warn!("Request failed before a response arrived: {}", e);
            ApiError::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return unwrap_success(&body);
        }

        let error = error_from_response(status, &body);
        log::warn!("API responded {}: {}", status.as_u16(), error);
        if error.is_unauthenticated() {
            self.session.clear()?;
            log::info!("Session cleared after 401 response");
        }
        Err(error)
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(ApiError::from)
}

fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .map(|obj| obj.contains_key("success") || obj.contains_key("data"))
        .unwrap_or(false)
}

fn unwrap_success(body: &str) -> Result<Unwrapped, ApiError> {
    if body.trim().is_empty() {
        return Ok(Unwrapped {
            data: Value::Null,
            message: None,
        });
    }

    let value: Value = serde_json::from_str(body)?;
    if !is_envelope(&value) {
        return Ok(Unwrapped {
            data: value,
            message: None,
        });
    }

    let envelope = ApiEnvelope::from_json(&value);
    if envelope.success == Some(false) {
        // 2xx carrying a failure envelope
        return Err(ApiError::new(
            400,
            envelope.message.unwrap_or_default(),
            envelope.errors.unwrap_or_default(),
        ));
    }

    Ok(Unwrapped {
        data: envelope.data.unwrap_or(Value::Null),
        message: envelope.message,
    })
}

fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let (message, errors): (Option<String>, Vec<FieldError>) = match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let envelope = ApiEnvelope::from_json(&value);
            (envelope.message, envelope.errors.unwrap_or_default())
        },
        Err(_) => (None, Vec::new()),
    };
    let message = message
        .filter(|m| !m.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();

    ApiError::new(status.as_u16(), message, errors)
}
