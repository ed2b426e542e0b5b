use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{types::RawResponse, ApiError, ApiResponse};

/// Decodes a response the classifier accepted as successful.
///
/// 204 yields an empty result without touching the body. Any other status
/// must carry JSON for `T`; a parse failure becomes [`ApiError::Decode`].
pub(crate) fn decode_response<T: DeserializeOwned>(
    raw: RawResponse,
    attempts: usize,
) -> Result<ApiResponse<T>, ApiError> {
    let status = raw.status.as_u16();
    if raw.status == StatusCode::NO_CONTENT {
        return Ok(ApiResponse {
            status,
            headers: raw.headers,
            data: None,
            attempts,
        });
    }

    let data = serde_json::from_slice::<T>(&raw.body).map_err(|err| ApiError::Decode {
        status,
        message: format!("invalid response JSON: {err}"),
        body: String::from_utf8_lossy(&raw.body).into_owned(),
    })?;

    Ok(ApiResponse {
        status,
        headers: raw.headers,
        data: Some(data),
        attempts,
    })
}
