//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON extractor that rejects the request with `400` unless the payload
/// both parses and passes its `Validate` rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value.validate().map_err(|e| AppError::validation(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Messages of every failing field, sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{}'", field))
            })
        })
        .collect();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}
