//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON body extractor that rejects malformed or invalid payloads with an
/// `InvalidInput` error before the handler runs.
///
/// ```rust,ignore
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUserRequest>) {
///     // payload already passed its field rules
/// }
/// ```
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
            .map_err(|e| AppError::invalid_input(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::invalid_input(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten field errors into one message, ordered by field name.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "name too short"))]
        name: String,
        #[validate(range(min = 1))]
        age: u32,
    }

    #[test]
    fn test_messages_are_joined_in_field_order() {
        let sample = Sample {
            name: "x".to_string(),
            age: 0,
        };
        let errors = sample.validate().unwrap_err();

        assert_eq!(format_validation_errors(&errors), "age is invalid, name too short");
    }

    #[test]
    fn test_custom_message_is_used() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("user_type", ValidationError::new("user_type").with_message("bad type".into()));

        assert_eq!(format_validation_errors(&errors), "bad type");
    }
}
