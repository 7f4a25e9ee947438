pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_dashboard).post(resumes::handle_upload),
        )
        .route("/api/v1/resumes/:id", get(resumes::handle_view))
        .route(
            "/api/v1/resumes/:id/download",
            get(resumes::handle_download),
        )
        // Matching
        .route("/api/v1/match", post(matching::handle_match))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::matching::Matcher;
    use crate::models::resume::ResumeRow;
    use crate::resumes::blobs::MemoryBlobStore;
    use crate::resumes::extract::tests::build_docx;
    use crate::resumes::seed::seed_samples;
    use crate::resumes::store::{MemoryResumeStore, NewResume, ResumeStore};

    const JOB: &str = "Looking for a Python developer with Docker and AWS experience";

    /// Reads from the seeded samples but refuses every insert.
    struct ReadOnlyStore(MemoryResumeStore);

    #[async_trait]
    impl ResumeStore for ReadOnlyStore {
        async fn insert(&self, _resume: NewResume) -> Result<ResumeRow, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn list(&self) -> Result<Vec<ResumeRow>, AppError> {
            self.0.list().await
        }

        async fn get(&self, id: i64) -> Result<Option<ResumeRow>, AppError> {
            self.0.get(id).await
        }

        async fn count(&self) -> Result<i64, AppError> {
            self.0.count().await
        }
    }

    async fn app_with(store: Arc<dyn ResumeStore>, blobs: Arc<MemoryBlobStore>) -> Router {
        seed_samples(store.as_ref(), blobs.as_ref()).await.unwrap();

        let config = Config::from_lookup(|_| None).unwrap();
        build_router(AppState {
            store,
            blobs,
            matcher: Arc::new(Matcher::new(config.matcher.clone())),
            config,
        })
    }

    async fn test_app() -> Router {
        app_with(
            Arc::new(MemoryResumeStore::new()),
            Arc::new(MemoryBlobStore::new()),
        )
        .await
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_match(app: &Router, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/match")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn upload_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let boundary = "matcher-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "matcher-api");
    }

    #[tokio::test]
    async fn test_match_ranks_and_reports_stats() {
        let app = test_app().await;
        let (status, body) = post_match(&app, json!({ "job_text": JOB })).await;
        assert_eq!(status, StatusCode::OK);

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["filename"], "anita_verma.pdf");
        assert!(results[0]["skills"]
            .as_array()
            .unwrap()
            .contains(&json!("docker")));

        let stats = &body["stats"];
        let categories = &stats["categories"];
        let total = categories["Strong"].as_u64().unwrap()
            + categories["Medium"].as_u64().unwrap()
            + categories["Low"].as_u64().unwrap();
        assert_eq!(total, 3);
        assert_eq!(stats["percents"].as_array().unwrap().len(), 3);
        assert_eq!(stats["skill_counts"]["python"], 2);
    }

    #[tokio::test]
    async fn test_match_top_k() {
        let app = test_app().await;
        let (status, body) = post_match(&app, json!({ "job_text": JOB, "top_k": 1 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        // Stats always cover every résumé.
        assert_eq!(body["stats"]["percents"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_match_rejects_blank_job_and_zero_top_k() {
        let app = test_app().await;

        let (status, body) = post_match(&app, json!({ "job_text": "   " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = post_match(&app, json!({ "job_text": JOB, "top_k": 0 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_malformed_body_uses_error_envelope() {
        let app = test_app().await;

        for body in [
            json!({ "job_text": JOB, "top_k": -1 }),
            json!({ "job_text": JOB, "top_k": 2.5 }),
            json!({ "top_k": 2 }),
        ] {
            let (status, resp) = post_match(&app, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["error"]["code"], "VALIDATION_ERROR");
        }

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/match")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_dashboard_filters_by_skill() {
        let app = test_app().await;

        let (status, body) = get_json(&app, "/api/v1/resumes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resumes"].as_array().unwrap().len(), 3);
        assert_eq!(body["resumes"][0]["filename"], "vikram_patel.pdf");
        assert_eq!(body["skills"].as_array().unwrap().len(), 25);

        let (_, body) = get_json(&app, "/api/v1/resumes?skill=%20Kubernetes").await;
        assert_eq!(body["selected_skill"], "kubernetes");
        let resumes = body["resumes"].as_array().unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0]["filename"], "vikram_patel.pdf");
        // Counts ignore the filter.
        assert_eq!(body["skill_counts"]["java"], 2);
    }

    #[tokio::test]
    async fn test_view_highlights_job_skills() {
        let app = test_app().await;

        let (status, body) = get_json(&app, "/api/v1/resumes/2?job=Python%20AWS").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["filename"], "anita_verma.pdf");
        assert_eq!(body["matched_skills"], json!(["python", "aws"]));
        let highlighted = body["highlighted"].as_str().unwrap();
        assert!(highlighted.contains("<mark>Python</mark>"));
        assert!(highlighted.contains("<mark>AWS</mark>"));
        assert!(highlighted.contains("<br>"));

        let (_, body) = get_json(&app, "/api/v1/resumes/2").await;
        assert_eq!(body["matched_skills"], json!([]));
        assert_eq!(body["highlighted"], body["resume"]["text"]);
    }

    #[tokio::test]
    async fn test_view_missing_is_404() {
        let app = test_app().await;
        let (status, body) = get_json(&app, "/api/v1/resumes/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let app = test_app().await;
        let content = b"Senior developer\nDocker, Kubernetes and Linux on AWS";

        let (status, body) = send(&app, upload_request("resume", "my cv.txt", content)).await;
        assert_eq!(status, StatusCode::CREATED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["filename"], "my_cv.txt");
        assert_eq!(body["id"], 4);
        let skills = body["skills"].as_array().unwrap();
        assert!(skills.contains(&json!("docker")));
        assert!(skills.contains(&json!("linux")));

        let (_, view) = get_json(&app, "/api/v1/resumes/4").await;
        assert_eq!(
            view["resume"]["text"],
            "Senior developer Docker, Kubernetes and Linux on AWS"
        );

        let req = Request::builder()
            .uri("/api/v1/resumes/4/download")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"my_cv.txt\""
        );
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], content);
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let app = test_app().await;

        let (status, _) = send(&app, upload_request("resume", "cv.doc", b"PK")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, _) = send(&app, upload_request("resume", "cv.exe", b"MZ")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, _) = send(&app, upload_request("other", "cv.txt", b"hi")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_docx() {
        let app = test_app().await;
        let content = build_docx(&["Priya Nair", "Skills: React, Angular and MongoDB"]);

        let (status, body) = send(&app, upload_request("resume", "priya.docx", &content)).await;
        assert_eq!(status, StatusCode::CREATED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["filename"], "priya.docx");
        let skills = body["skills"].as_array().unwrap();
        assert!(skills.contains(&json!("react")));
        assert!(skills.contains(&json!("mongodb")));

        let (_, view) = get_json(&app, "/api/v1/resumes/4").await;
        assert_eq!(
            view["resume"]["text"],
            "Priya Nair Skills: React, Angular and MongoDB"
        );

        let req = Request::builder()
            .uri("/api/v1/resumes/4/download")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[tokio::test]
    async fn test_failed_insert_removes_uploaded_blob() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = Arc::new(ReadOnlyStore(MemoryResumeStore::new()));
        // Seeding goes through the inner store directly.
        seed_samples(&store.0, blobs.as_ref()).await.unwrap();
        let app = app_with(store, blobs.clone()).await;
        assert_eq!(blobs.len().await, 3);

        let (status, body) =
            send(&app, upload_request("resume", "cv.txt", b"Python and AWS")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(blobs.len().await, 3);
    }

    #[tokio::test]
    async fn test_download_seeded_sample() {
        let app = test_app().await;
        let req = Request::builder()
            .uri("/api/v1/resumes/1/download")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"Rahul Sharma"));

        let (status, _) = get_json(&app, "/api/v1/resumes/99/download").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
