use url::form_urlencoded;

use crate::QueryParams;

/// Root URL plus fixed API version segment shared by every request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiEndpoint {
    pub base_url: String,
    pub version: String,
}

impl ApiEndpoint {
    /// Example: `ApiEndpoint::new("https://api.example.com", "/v1")`.
    pub fn new(base_url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            version: version.into(),
        }
    }

    /// Reads `API_BASE_URL` (required) and `API_VERSION` (optional).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_url = std::env::var("API_BASE_URL")
            .map_err(|_| "missing API_BASE_URL environment variable".to_owned())?;
        if base_url.trim().is_empty() {
            return Err("API_BASE_URL is set but empty".to_owned());
        }
        let version = std::env::var("API_VERSION").unwrap_or_default();
        Ok(Self::new(base_url.trim(), version.trim()))
    }

    /// Builds the final request target for `path` and `query`.
    pub fn target(&self, path: &str, query: &QueryParams) -> String {
        build_target(&self.base_url, &self.version, path, query)
    }
}

/// Joins base URL, version segment, and path, then appends the query string.
///
/// Exactly one `/` separates each non-empty segment. Query entries with an
/// absent or empty-string value are omitted; the rest keep insertion order
/// and are form-urlencoded.
pub fn build_target(base_url: &str, version: &str, path: &str, query: &QueryParams) -> String {
    let mut target = base_url.trim_end_matches('/').to_owned();
    // Trailing slash on the path is the caller's to keep.
    for segment in [version.trim_matches('/'), path.trim_start_matches('/')] {
        if !segment.is_empty() {
            target.push('/');
            target.push_str(segment);
        }
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in query.present() {
        serializer.append_pair(key, &value.to_string());
        any = true;
    }
    if any {
        target.push('?');
        target.push_str(&serializer.finish());
    }
    target
}
