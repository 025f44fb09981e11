//! OpenAPI documentation, served through Swagger UI.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use crate::domain::UserType;
use crate::services::CreateUserOutput;

/// OpenAPI documentation for the University Platform API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "University Platform API",
        version = "0.1.0",
        description = "User registration for the university platform"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(user_handler::create_user),
    components(schemas(UserType, user_handler::CreateUserRequest, CreateUserOutput)),
    tags((name = "Users", description = "User registration"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_registration() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/users"));

        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("CreateUserRequest"));
        assert!(schemas.contains_key("CreateUserOutput"));
        assert!(schemas.contains_key("UserType"));
    }
}
