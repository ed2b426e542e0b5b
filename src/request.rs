use reqwest::Method;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::QueryParams;

/// Full description of one logical call before any attempt is made.
///
/// `timeout_ms` and `max_retries` fall back to the client's
/// [`ClientOptions`](crate::ClientOptions) when left unset.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the versioned endpoint, e.g. `/items`.
    pub path: String,
    pub query: QueryParams,
    /// JSON body, serialized once per attempt.
    pub body: Option<JsonValue>,
    /// Header overrides. A `content-type` entry replaces the JSON default.
    pub headers: Vec<(String, String)>,
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<usize>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::default(),
            body: None,
            headers: Vec::new(),
            timeout_ms: None,
            max_retries: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query<Q: Into<QueryParams>>(mut self, query: Q) -> Self {
        self.query = query.into();
        self
    }

    /// Sets an already-built JSON body.
    pub fn body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` to JSON and sets it as the request body.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> serde_json::Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub(crate) fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde::Serialize;
    use serde_json::json;

    use crate::RequestSpec;

    #[derive(Serialize)]
    struct NewItem<'a> {
        name: &'a str,
    }

    #[test]
    fn constructors_set_method_and_leave_overrides_unset() {
        let spec = RequestSpec::delete("/items/1");
        assert_eq!(spec.method, Method::DELETE);
        assert_eq!(spec.path, "/items/1");
        assert!(spec.timeout_ms.is_none());
        assert!(spec.max_retries.is_none());
        assert!(spec.body.is_none());
    }

    #[test]
    fn json_body_is_serialized() {
        let spec = RequestSpec::post("/items")
            .json(&NewItem { name: "kit" })
            .expect("must serialize");
        assert_eq!(spec.body, Some(json!({"name": "kit"})));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let spec = RequestSpec::get("/").header("Content-Type", "text/plain");
        assert!(spec.has_header("content-type"));
        assert!(!spec.has_header("accept"));
    }
}
