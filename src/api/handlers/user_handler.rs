//! User handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::is_valid_user_type;
use crate::domain::is_valid_email;
use crate::errors::AppResult;
use crate::services::{CreateUserInput, CreateUserOutput};

/// User registration request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User email address
    #[validate(custom(function = "validate_email"))]
    #[schema(example = "ada@university.edu")]
    pub email: String,
    /// Plaintext password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// One of student, professor, admin
    #[validate(custom(function = "validate_user_type"))]
    #[schema(value_type = crate::domain::UserType, example = "student")]
    pub user_type: String,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            user_type: req.user_type,
        }
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Invalid email format".into()))
    }
}

fn validate_user_type(user_type: &str) -> Result<(), ValidationError> {
    if is_valid_user_type(user_type) {
        Ok(())
    } else {
        Err(ValidationError::new("user_type")
            .with_message("User type must be one of student, professor, admin".into()))
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreateUserOutput),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 504, description = "Persistence deadline exceeded")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<CreateUserOutput>)> {
    let output = state.user_service.create_user(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(output)))
}
