use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::paths;
use crate::router::Navigator;
use crate::storage::{self, StoreState, TOKEN_KEY};

/// The API path the backend origin is derived from.
pub const API_PATH: &str = "/api";

/// RequestOptions
///
/// Per-call knobs. `headers` are applied last and replace the defaults of the same name.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// ApiClient
///
/// The single choke point for backend calls: bearer token injection, JSON in and out,
/// and translation of every failure into an `ApiError` whose text can be shown as-is.
///
/// A 401 from any endpoint tears the session down and sends the user to the login page.
/// That policy is global and not opt-in per call.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: StoreState,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ApiClient {
    /// new
    ///
    /// `base_url` already includes the API path (e.g. `http://localhost:5000/api`);
    /// endpoints are appended verbatim.
    pub fn new(base_url: impl Into<String>, store: StoreState) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            navigator: None,
        }
    }

    /// Where 401 teardown sends the user.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The backend origin named in connectivity failures.
    pub fn origin(&self) -> String {
        backend_origin(&self.base_url)
    }

    fn token(&self) -> Option<String> {
        self.store
            .get_item(TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// request
    ///
    /// Issues `options.method` against `base_url + endpoint` and resolves to the response's
    /// JSON value. Empty bodies resolve to `{}`.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let method = options.method.clone();

        let result = self.execute(&url, options).await;
        if let Err(e) = &result {
            tracing::error!(url = %url, method = %method, error = %e, "API request failed");
        }
        result
    }

    async fn execute(&self, url: &str, options: RequestOptions) -> ApiResult<Value> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let body = match &options.body {
            Some(body) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?)
            }
            None => None,
        };

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            headers.insert(name, value);
        }

        let mut builder = self.http.request(options.method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        tracing::debug!(
            url,
            status = status.as_u16(),
            content_type = ?response.headers().get(CONTENT_TYPE),
            "API response"
        );
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        let data = parse_body(&text, status.is_success())?;

        if status.is_success() {
            return Ok(data);
        }

        let message = error_message(&data, status);
        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized { message });
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_builder() {
            return ApiError::InvalidRequest(err.to_string());
        }
        tracing::debug!("Transport failure: {}", err);
        ApiError::Unreachable {
            origin: self.origin(),
        }
    }

    /// handle_unauthorized
    ///
    /// Clears the persisted token and user and navigates to the login page.
    pub fn handle_unauthorized(&self) {
        tracing::warn!("Unauthorized response, clearing session");
        storage::clear_session(self.store.as_ref());
        if let Some(navigator) = &self.navigator {
            navigator.navigate(paths::LOGIN);
        }
    }

    // --- HTTP Methods ---

    pub async fn get(&self, endpoint: &str) -> ApiResult<Value> {
        self.request(endpoint, RequestOptions::method(Method::GET))
            .await
    }

    pub async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> ApiResult<Value> {
        let body = serde_json::to_value(body)?;
        self.request(endpoint, RequestOptions::method(Method::POST).with_body(body))
            .await
    }

    pub async fn put<B: Serialize>(&self, endpoint: &str, body: &B) -> ApiResult<Value> {
        let body = serde_json::to_value(body)?;
        self.request(endpoint, RequestOptions::method(Method::PUT).with_body(body))
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResult<Value> {
        self.request(endpoint, RequestOptions::method(Method::DELETE))
            .await
    }

    /// GET decoded into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let value = self.get(endpoint).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// backend_origin
///
/// Strips the API path from the base URL: `http://host:5000/api` -> `http://host:5000`.
pub fn backend_origin(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    match trimmed.strip_suffix(API_PATH) {
        Some(origin) => origin.to_string(),
        None => trimmed.replacen(API_PATH, "", 1),
    }
}

/// parse_body
///
/// Empty or blank bodies become `{}` whatever the content type, since many endpoints
/// answer success with no body. Anything else must be JSON. For failed statuses an
/// unparseable body (an HTML error page from a proxy) is treated as empty so the status
/// line still produces a message.
pub fn parse_body(text: &str, success: bool) -> ApiResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) if !success => Ok(Value::Object(Map::new())),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}

/// error_message
///
/// The server's `error` field, then its `message` field, then `Error <code>: <reason>`
/// (`Error <code>` for codes without a standard reason).
pub fn error_message(data: &Value, status: StatusCode) -> String {
    ["error", "message"]
        .iter()
        .find_map(|key| match data.get(*key) {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::String(_)) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("Error {}: {}", status.as_u16(), reason),
            None => format!("Error {}", status.as_u16()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nonstandard_status_has_no_dangling_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(error_message(&json!({}), status), "Error 599");
    }

    #[test]
    fn origin_strips_the_api_suffix() {
        assert_eq!(backend_origin("http://localhost:5000/api"), "http://localhost:5000");
        assert_eq!(backend_origin("http://localhost:5000/api/"), "http://localhost:5000");
        assert_eq!(backend_origin("https://roadfy.example/api/v2"), "https://roadfy.example/v2");
        assert_eq!(backend_origin("http://localhost:5000"), "http://localhost:5000");
    }

    #[test]
    fn blank_bodies_resolve_to_an_empty_object() {
        assert_eq!(parse_body("", true).unwrap(), json!({}));
        assert_eq!(parse_body("  \n", true).unwrap(), json!({}));
        assert_eq!(parse_body("", false).unwrap(), json!({}));
    }

    #[test]
    fn invalid_success_body_is_a_decode_error() {
        assert!(matches!(parse_body("<html>", true), Err(ApiError::Decode(_))));
        assert_eq!(parse_body("<html>", false).unwrap(), json!({}));
    }

    #[test]
    fn error_message_prefers_server_text() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(&json!({"error": "Email already registered", "message": "x"}), status),
            "Email already registered"
        );
        assert_eq!(error_message(&json!({"message": "Missing field"}), status), "Missing field");
        assert_eq!(error_message(&json!({"error": ""}), status), "Error 400: Bad Request");
        assert_eq!(
            error_message(&json!([]), StatusCode::INTERNAL_SERVER_ERROR),
            "Error 500: Internal Server Error"
        );
    }
}
