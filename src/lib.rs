//! `resilient-http` is the shared request layer for a versioned JSON API.
//!
//! Every call goes through [`ApiClient::send`], which
//! - builds the target from an [`ApiEndpoint`] and [`QueryParams`],
//! - runs each attempt under its own deadline,
//! - retries server, network and timeout failures with exponential backoff,
//! - classifies failures into [`ApiError`] and fires the [`SessionHook`] on 401.

mod classify;
mod client;
mod decode;
mod error;
mod options;
mod query;
mod request;
mod retry;
mod session;
mod target;
mod types;
mod wire;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind};
pub use options::ClientOptions;
pub use query::{QueryParams, QueryValue};
pub use request::RequestSpec;
pub use retry::{Attempt, RetryDecision, RetryPolicy};
pub use session::{SessionCallback, SessionHook};
pub use target::{build_target, ApiEndpoint};
pub use types::ApiResponse;

pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, ApiError>;
