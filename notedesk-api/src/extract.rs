/// Request extractors
///
/// `ApiJson` behaves like `axum::Json` but rejects with [`ApiError`], so
/// malformed bodies get the same error format as every other failure.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON body extractor with `ApiError` rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
