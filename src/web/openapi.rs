//! OpenAPI documentation generation using utoipa

use axum::Json;
use utoipa::OpenApi;

/// OpenAPI specification for the JSON job API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Countdown Service API",
        description = "Create fire-once countdown jobs and inspect their progress.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::web::handlers::api::list_job_statuses,
        crate::web::handlers::api::get_job_status,
        crate::web::handlers::api::create_job,
    ),
    components(
        schemas(
            crate::models::JobStatus,
            crate::web::responses::JobStatusResponse,
            crate::web::handlers::api::CreateJobRequest,
        )
    ),
    tags(
        (name = "jobs", description = "Countdown job creation and status"),
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_job_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/status"));
        assert!(doc.paths.paths.contains_key("/api/status/{id}"));
    }
}
