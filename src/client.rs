use std::fmt;
use std::time::Duration;

use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

use crate::{
    classify::{classify_status, classify_transport},
    decode::decode_response,
    retry::{Attempt, RetryDecision},
    types::RawResponse,
    ApiEndpoint, ApiResponse, ClientOptions, QueryParams, RequestSpec, Result,
    RetryPolicy, SessionHook,
};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone)]
/// Shared request client for a versioned JSON API.
///
/// Clones share the connection pool, the cookie jar, and the session hook.
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: ApiEndpoint,
    options: ClientOptions,
    session: SessionHook,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// Creates a client with default options and an empty session hook.
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self {
            http: default_http_client(),
            endpoint,
            options: ClientOptions::default(),
            session: SessionHook::default(),
        }
    }

    /// Shorthand for `ApiClient::new(ApiEndpoint::new(base_url, version))`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use resilient_http::ApiClient;
    ///
    /// let api = ApiClient::from_base("https://api.example.com", "/v1");
    /// ```
    pub fn from_base(base_url: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(ApiEndpoint::new(base_url, version))
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `API_BASE_URL` (required) and `API_VERSION` for the endpoint, plus
    /// the optional overrides documented on [`ClientOptions::from_env`].
    ///
    /// **Not available on `wasm32` targets**: browser runtimes have no
    /// environment. Use [`ApiClient::from_base`] there.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let endpoint = ApiEndpoint::from_env()?;
        let options = ClientOptions::from_env()?;
        Ok(Self::new(endpoint).with_options(options))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Shares `hook` with the session owner instead of the client's own slot.
    pub fn with_session_hook(mut self, hook: SessionHook) -> Self {
        self.session = hook;
        self
    }

    /// Replaces the underlying HTTP client.
    ///
    /// On native targets the replacement should keep a cookie store
    /// (`reqwest::ClientBuilder::cookie_store(true)`) so credentials are sent.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Session-expired hook, for the session owner to set and clear.
    pub fn session_hook(&self) -> &SessionHook {
        &self.session
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.send(RequestSpec::get(path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: Q) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Into<QueryParams>,
    {
        self.send(RequestSpec::get(path).query(query)).await
    }

    /// Sends a JSON body. For typed bodies build a `RequestSpec` with
    /// [`RequestSpec::json`] and call [`ApiClient::send`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: JsonValue,
    ) -> Result<ApiResponse<T>> {
        self.send(RequestSpec::post(path).body(body)).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: JsonValue,
    ) -> Result<ApiResponse<T>> {
        self.send(RequestSpec::put(path).body(body)).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: JsonValue,
    ) -> Result<ApiResponse<T>> {
        self.send(RequestSpec::patch(path).body(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.send(RequestSpec::delete(path)).await
    }

    /// Executes one logical request with timeout and retry handling.
    ///
    /// Attempts run strictly one after another. Success returns at once.
    /// Client errors and 401 are surfaced on first occurrence. Server,
    /// network and timeout failures are retried with exponential backoff
    /// until `max_retries` is used up, then the last one is surfaced.
    pub async fn send<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<ApiResponse<T>> {
        let target = self.endpoint.target(&spec.path, &spec.query);
        let timeout_ms = spec.timeout_ms.unwrap_or(self.options.timeout_ms);
        let policy = self.retry_policy(&spec);
        let mut attempt = policy.first_attempt();

        loop {
            self.wait_before_attempt(attempt).await;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = %spec.method,
                url = %target,
                attempt = attempt.index,
                "sending request"
            );

            let error = match self.execute_attempt(&spec, &target, timeout_ms).await {
                Ok(raw) => match classify_status(raw.status, &raw.body, &self.session) {
                    None => return decode_response(raw, attempt.index + 1),
                    Some(err) => err,
                },
                Err(err) => classify_transport(err, timeout_ms),
            };

            match policy.decide(attempt, &error) {
                RetryDecision::Retry(next) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        method = %spec.method,
                        url = %target,
                        attempt = attempt.index,
                        kind = %error.kind(),
                        "retryable failure: {error}"
                    );
                    attempt = next;
                }
                RetryDecision::Stop | RetryDecision::Exhausted => return Err(error),
            }
        }
    }

    fn retry_policy(&self, spec: &RequestSpec) -> RetryPolicy {
        RetryPolicy::new(
            spec.max_retries.unwrap_or(self.options.max_retries),
            self.options.retry_backoff_ms,
            self.options.backoff_multiplier,
        )
    }

    /// Issues exactly one network attempt and reads the whole body under the
    /// same deadline.
    async fn execute_attempt(
        &self,
        spec: &RequestSpec,
        target: &str,
        timeout_ms: u64,
    ) -> std::result::Result<RawResponse, reqwest::Error> {
        // On WASM, reqwest uses AbortController for timeout; the `.timeout()`
        // method is available on both targets.
        let mut request = self
            .http
            .request(spec.method.clone(), target)
            .timeout(Duration::from_millis(timeout_ms));

        if !spec.has_header(header::CONTENT_TYPE.as_str()) {
            request = request.header(header::CONTENT_TYPE, JSON_CONTENT_TYPE);
        }
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        // Native clients carry cookies through their cookie store.
        #[cfg(target_arch = "wasm32")]
        {
            request = request.fetch_credentials_include();
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    /// Waits the backoff delay carried by `attempt`.
    ///
    /// On native targets via `tokio::time::sleep`; on WASM via a
    /// `setTimeout` promise.
    async fn wait_before_attempt(&self, attempt: Attempt) {
        if attempt.delay.is_zero() {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "retrying request after {} ms (attempt {})",
            attempt.delay.as_millis(),
            attempt.index
        );

        sleep(attempt.delay).await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_http_client() -> reqwest::Client {
    // Builder only fails when the TLS backend cannot initialise, in which
    // case Client::new() reports the same problem.
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(target_arch = "wasm32")]
fn default_http_client() -> reqwest::Client {
    reqwest::Client::new()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(handler: &js_sys::Function, timeout: i32) -> i32;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        set_timeout(&resolve, millis);
    });
    // setTimeout never rejects.
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
