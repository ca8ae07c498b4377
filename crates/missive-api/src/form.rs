//! [`IntakeForm`]: extracts the five contact fields from a request body.

use axum::{
  Form,
  extract::{FromRequest, Multipart, Request},
  http::header,
};
use missive_core::SubmissionInput;

use crate::error::ApiError;

/// The submitted fields, as sent. Not yet trimmed or validated.
///
/// Accepts `application/x-www-form-urlencoded` and `multipart/form-data`.
/// Absent fields are empty, unknown fields are ignored, and a repeated field
/// keeps its last value in either encoding. A body of any other type carries
/// no fields at all and extracts as an empty form.
pub struct IntakeForm(pub SubmissionInput);

impl<S> FromRequest<S> for IntakeForm
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let mime = req
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.split(';').next())
      .map(|v| v.trim().to_ascii_lowercase())
      .unwrap_or_default();

    match mime.as_str() {
      "application/x-www-form-urlencoded" => {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
          .await
          .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let mut input = SubmissionInput::default();
        for (name, value) in pairs {
          input.set_wire(&name, value);
        }
        Ok(Self(input))
      }
      "multipart/form-data" => {
        let mut multipart = Multipart::from_request(req, state)
          .await
          .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let mut input = SubmissionInput::default();
        while let Some(field) = multipart
          .next_field()
          .await
          .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
          let Some(name) = field.name().map(str::to_owned) else {
            continue;
          };
          let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
          input.set_wire(&name, value);
        }
        Ok(Self(input))
      }
      _ => Ok(Self(SubmissionInput::default())),
    }
  }
}
