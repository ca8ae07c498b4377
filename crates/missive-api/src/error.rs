//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as the same `{"success": false, "message": ...}` body
//! the intake endpoint uses for business rejections, so clients only ever
//! parse one shape.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use missive_core::{
  Reply,
  outcome::{UNREADABLE_FORM_MESSAGE, WRONG_METHOD_MESSAGE},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("method not allowed")]
  WrongMethod,

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::WrongMethod => {
        let mut res = (
          StatusCode::METHOD_NOT_ALLOWED,
          Json(Reply::rejected(WRONG_METHOD_MESSAGE)),
        )
          .into_response();
        res
          .headers_mut()
          .insert(header::ALLOW, HeaderValue::from_static("POST"));
        res
      }
      // The extractor's own text stays in the operational log.
      ApiError::BadRequest(detail) => {
        tracing::warn!(%detail, "unreadable form body");
        (StatusCode::BAD_REQUEST, Json(Reply::rejected(UNREADABLE_FORM_MESSAGE)))
          .into_response()
      }
    }
  }
}
