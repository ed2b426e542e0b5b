/// Configures HTTP timeout and retry behavior.
///
/// `timeout_ms` and `max_retries` are defaults; a [`RequestSpec`](crate::RequestSpec)
/// may override either per call.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds.
    pub retry_backoff_ms: u64,
    /// Growth factor applied to the delay for each further retry.
    pub backoff_multiplier: f64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 3,
            retry_backoff_ms: 1_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl ClientOptions {
    /// Builds options from defaults overridden by environment variables.
    ///
    /// Reads (all optional):
    /// - `API_TIMEOUT_MS`
    /// - `API_MAX_RETRIES`
    /// - `API_RETRY_BACKOFF_MS`
    /// - `API_BACKOFF_MULTIPLIER`
    ///
    /// Returns an error naming the variable when a value does not parse.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let mut opts = Self::default();
        if let Some(value) = env_parsed("API_TIMEOUT_MS")? {
            opts.timeout_ms = value;
        }
        if let Some(value) = env_parsed("API_MAX_RETRIES")? {
            opts.max_retries = value;
        }
        if let Some(value) = env_parsed("API_RETRY_BACKOFF_MS")? {
            opts.retry_backoff_ms = value;
        }
        if let Some(value) = env_parsed::<f64>("API_BACKOFF_MULTIPLIER")? {
            if !value.is_finite() || value < 1.0 {
                return Err(format!(
                    "API_BACKOFF_MULTIPLIER must be a finite number >= 1, got {value}"
                ));
            }
            opts.backoff_multiplier = value;
        }
        Ok(opts)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_parsed<T>(name: &str) -> std::result::Result<Option<T>, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| format!("invalid {name} value '{raw}': {err}")),
        Err(_) => Ok(None),
    }
}
