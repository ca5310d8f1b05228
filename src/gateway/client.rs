use crate::gateway::error::{extract_error_message, GatewayError};
use crate::settings::BackendSettings;
use log::debug;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Options for a single backend request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Bearer token; the API key is sent in its place when absent
    pub access_token: Option<String>,
    pub body: Option<Value>,
    /// Value of the `Prefer` header
    pub prefer: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            access_token: None,
            body: None,
            prefer: None,
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bearer(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn prefer(mut self, prefer: &str) -> Self {
        self.prefer = Some(prefer.to_string());
        self
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// 204 or an empty body
    Empty,
    Json(Value),
    /// Body that is not JSON, returned verbatim
    Text(String),
}

impl Payload {
    /// Decode a successful response body. A 204 is never parsed.
    #[must_use]
    pub fn decode(status: StatusCode, raw: &str) -> Self {
        if status == StatusCode::NO_CONTENT || raw.is_empty() {
            return Payload::Empty;
        }
        serde_json::from_str(raw).map_or_else(|_| Payload::Text(raw.to_string()), Payload::Json)
    }
}

/// HTTP gateway bound to one backend base URL and API key
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Gateway {
    /// Build a gateway from backend settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(settings: &BackendSettings) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url().to_string(),
            api_key: settings.api_key.trim().to_string(),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request to `<base_url><path>`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The gateway is not configured (no request is sent)
    /// - The request cannot be sent or the body cannot be read
    /// - The backend answers with a non-success status
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Payload, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let url = format!("{}{path}", self.base_url);
        let bearer = options.access_token.as_deref().unwrap_or(&self.api_key);
        debug!("{} {path}", options.method);

        let mut request = self
            .client
            .request(options.method, &url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer);

        if let Some(prefer) = options.prefer.as_deref() {
            request = request.header("Prefer", prefer);
        }
        if let Some(body) = options.body.as_ref() {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(status, &raw);
            debug!("{path} rejected with {status}: {message}");
            return Err(GatewayError::Status { status, message });
        }

        Ok(Payload::decode(status, &raw))
    }

    /// Issue a request and deserialize its JSON body into `T`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON of shape `T`
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, GatewayError> {
        match self.request(path, options).await? {
            Payload::Json(value) => serde_json::from_value(value)
                .map_err(|e| GatewayError::Decode(format!("{path}: {e}"))),
            Payload::Empty => Err(GatewayError::Decode(format!("{path}: empty response"))),
            Payload::Text(_) => Err(GatewayError::Decode(format!("{path}: response is not JSON"))),
        }
    }
}
