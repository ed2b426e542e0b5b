use reqwest::header::HeaderMap;

/// Successful outcome of one logical request.
#[derive(Clone, Debug)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub headers: HeaderMap,
    /// `None` for 204 No Content; the decoded body otherwise.
    pub data: Option<T>,
    /// Number of attempts made, initial try included.
    pub attempts: usize,
}

impl<T> ApiResponse<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            headers: self.headers,
            data: self.data.map(f),
            attempts: self.attempts,
        }
    }
}

/// Raw result of one transport attempt, body fully read.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: reqwest::StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}
