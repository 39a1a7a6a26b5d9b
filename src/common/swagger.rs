use utoipa::openapi::{
    OpenApi,
    security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

/// Serves the generated OpenAPI document at `/api-docs/openapi.json` with a UI at `/swagger-ui`.
pub fn create_swagger_ui(mut openapi: OpenApi) -> SwaggerUi {
    openapi
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi)
}
