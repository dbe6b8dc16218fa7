use actix_web::{web, HttpResponse};
use shared_types::{CreateJobRequest, JobResponse, ListJobsQuery, UpdateJobRequest};
use std::sync::Arc;

use crate::database::jobs as db;
use crate::database::Database;
use crate::engine::{JobListing, JobQuery, StatsAggregator};
use crate::error::ApiError;
use crate::helpers::auth::Owner;

pub async fn list_jobs(
    listing: web::Data<Arc<JobListing>>,
    owner: Owner,
    query: web::Query<ListJobsQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = JobQuery::from(&query.into_inner());
    let page = listing.list_jobs(owner.id, &query).await?;

    Ok(HttpResponse::Ok().json(page))
}

pub async fn show_stats(
    aggregator: web::Data<Arc<StatsAggregator>>,
    owner: Owner,
) -> Result<HttpResponse, ApiError> {
    let stats = aggregator.stats(owner.id).await?;

    Ok(HttpResponse::Ok().json(stats))
}

pub async fn get_job(
    database: web::Data<Arc<Database>>,
    owner: Owner,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();

    let job = db::get_job(database.async_connection.clone(), owner.id, job_id)
        .await?
        .ok_or(ApiError::JobNotFound(job_id))?;

    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

pub async fn create_job(
    database: web::Data<Arc<Database>>,
    owner: Owner,
    request: web::Json<CreateJobRequest>,
) -> Result<HttpResponse, ApiError> {
    owner.ensure_writable()?;

    let mut request = request.into_inner();
    request.created_at = None;

    let job = db::insert_job(database.async_connection.clone(), owner.id, &request).await?;
    tracing::info!("Created job {} for owner {}", job.id, owner.id);

    Ok(HttpResponse::Created().json(JobResponse { job }))
}

pub async fn update_job(
    database: web::Data<Arc<Database>>,
    owner: Owner,
    path: web::Path<i64>,
    request: web::Json<UpdateJobRequest>,
) -> Result<HttpResponse, ApiError> {
    owner.ensure_writable()?;
    let job_id = path.into_inner();

    let job = db::update_job(database.async_connection.clone(), owner.id, job_id, &request)
        .await?
        .ok_or(ApiError::JobNotFound(job_id))?;

    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

pub async fn delete_job(
    database: web::Data<Arc<Database>>,
    owner: Owner,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    owner.ensure_writable()?;
    let job_id = path.into_inner();

    if !db::delete_job(database.async_connection.clone(), owner.id, job_id).await? {
        return Err(ApiError::JobNotFound(job_id));
    }
    tracing::info!("Deleted job {} for owner {}", job_id, owner.id);

    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;
    use crate::database::users::{create_user, User};
    use crate::handlers::configure_routes;
    use crate::storage::{JobStore, SqliteJobStore};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    struct Fixture {
        _dir: tempfile::TempDir,
        database: Arc<Database>,
        user: User,
        demo: User,
    }

    async fn fixture() -> Fixture {
        let (dir, database) = temp_database();
        let user = create_user(database.async_connection.clone(), "Jo", "jo@example.com", false)
            .await
            .unwrap();
        let demo = create_user(database.async_connection.clone(), "Demo", "demo@example.com", true)
            .await
            .unwrap();
        Fixture {
            _dir: dir,
            database,
            user,
            demo,
        }
    }

    macro_rules! app {
        ($database:expr) => {{
            let store: Arc<dyn JobStore> =
                Arc::new(SqliteJobStore::new($database.async_connection.clone()));
            test::init_service(
                App::new()
                    .app_data(web::Data::new($database.clone()))
                    .app_data(web::Data::new(Arc::new(JobListing::new(store.clone()))))
                    .app_data(web::Data::new(Arc::new(StatsAggregator::new(store))))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    fn bearer(user: &User) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", user.api_token))
    }

    #[actix_web::test]
    async fn test_requires_token() {
        let fx = fixture().await;
        let app = app!(fx.database);

        let req = test::TestRequest::get().uri("/api/jobs").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/jobs/stats")
            .insert_header((header::AUTHORIZATION, "Bearer wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_list_and_stats() {
        let fx = fixture().await;
        let app = app!(fx.database);

        for position in ["Platform Engineer", "QA Analyst"] {
            let req = test::TestRequest::post()
                .uri("/api/jobs")
                .insert_header(bearer(&fx.user))
                .set_json(json!({"position": position, "company": "Acme", "status": "interview"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/jobs?search=engineer&status=all&jobType=all&sort=a-z&page=abc")
            .insert_header(bearer(&fx.user))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalJobs"], 1);
        assert_eq!(body["numOfPages"], 1);
        assert_eq!(body["jobs"][0]["position"], "Platform Engineer");
        assert_eq!(body["jobs"][0]["jobType"], "full-time");

        let req = test::TestRequest::get()
            .uri("/api/jobs/stats")
            .insert_header(bearer(&fx.user))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["defaultStats"], json!({"pending": 0, "interview": 2, "declined": 0}));
        assert_eq!(body["monthlyApplications"].as_array().unwrap().len(), 1);
        assert_eq!(body["monthlyApplications"][0]["count"], 2);
    }

    #[actix_web::test]
    async fn test_unknown_status_filter_lists_nothing() {
        let fx = fixture().await;
        let app = app!(fx.database);

        let req = test::TestRequest::get()
            .uri("/api/jobs?status=ghosted")
            .insert_header(bearer(&fx.user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["jobs"], json!([]));
        assert_eq!(body["totalJobs"], 0);
        assert_eq!(body["numOfPages"], 0);
    }

    #[actix_web::test]
    async fn test_other_owners_job_is_not_found() {
        let fx = fixture().await;
        let app = app!(fx.database);
        let other = create_user(fx.database.async_connection.clone(), "Sam", "sam@example.com", false)
            .await
            .unwrap();

        let job = db::insert_job(
            fx.database.async_connection.clone(),
            other.id,
            &serde_json::from_value(json!({"position": "Writer", "company": "Vandelay"})).unwrap(),
        )
        .await
        .unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs/{}", job.id))
            .insert_header(bearer(&fx.user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], format!("No job with id {}", job.id));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/jobs/{}", job.id))
            .insert_header(bearer(&fx.user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs/{}", job.id))
            .insert_header(bearer(&other))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_update_and_delete() {
        let fx = fixture().await;
        let app = app!(fx.database);

        let req = test::TestRequest::post()
            .uri("/api/jobs")
            .insert_header(bearer(&fx.user))
            .set_json(json!({"position": "SRE", "company": "Acme"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["job"]["id"].as_i64().unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/jobs/{}", id))
            .insert_header(bearer(&fx.user))
            .set_json(json!({"status": "declined", "jobLocation": "Lisbon"}))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["job"]["status"], "declined");
        assert_eq!(updated["job"]["jobLocation"], "Lisbon");
        assert_eq!(updated["job"]["position"], "SRE");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/jobs/{}", id))
            .insert_header(bearer(&fx.user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs/{}", id))
            .insert_header(bearer(&fx.user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_demo_user_cannot_write() {
        let fx = fixture().await;
        let app = app!(fx.database);

        let req = test::TestRequest::post()
            .uri("/api/jobs")
            .insert_header(bearer(&fx.demo))
            .set_json(json!({"position": "SRE", "company": "Acme"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Test user! read only");

        let req = test::TestRequest::get()
            .uri("/api/jobs")
            .insert_header(bearer(&fx.demo))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let fx = fixture().await;
        let app = app!(fx.database);

        let req = test::TestRequest::post()
            .uri("/api/jobs")
            .insert_header(bearer(&fx.user))
            .set_json(json!({"position": "SRE", "company": "Acme", "jobType": "contract"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}
