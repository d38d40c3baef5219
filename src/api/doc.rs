//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers;

/// Generated OpenAPI description, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "SafeRound API",
        description = "BAC estimation, drink validation and sobriety assessment"
    ),
    paths(
        handlers::system::root_handler,
        handlers::system::health_handler,
        handlers::bac::estimate_bac,
        handlers::drink::validate_drink,
        handlers::sobriety::assess,
        handlers::sobriety::recommend,
    ),
    tags(
        (name = "BAC", description = "Blood alcohol estimation"),
        (name = "Drinks", description = "Drink validation policy"),
        (name = "Sobriety", description = "AI-assisted sobriety assessment"),
        (name = "System", description = "Health and metadata"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/health",
            "/bac/estimate",
            "/validate-drink",
            "/sobriety/assess",
            "/sobriety/recommend",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
