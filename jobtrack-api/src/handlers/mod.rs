pub mod jobs;

use actix_web::web;

use crate::error::ApiError;

/// Registers the job routes along with JSON and query extractor error
/// handlers that answer in the API's error shape.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .route("/api/jobs", web::get().to(jobs::list_jobs))
    .route("/api/jobs", web::post().to(jobs::create_job))
    // Registered ahead of /{id} so "stats" is not taken for an id
    .route("/api/jobs/stats", web::get().to(jobs::show_stats))
    .route("/api/jobs/{id}", web::get().to(jobs::get_job))
    .route("/api/jobs/{id}", web::patch().to(jobs::update_job))
    .route("/api/jobs/{id}", web::delete().to(jobs::delete_job));
}
