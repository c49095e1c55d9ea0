use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::state::AppState;

// room for the text fields next to the largest accepted image
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn routes(state: AppState) -> Router {
    let body_limit = state.max_image_bytes + FORM_OVERHEAD_BYTES;
    Router::new()
        .route("/jobs", get(handlers::jobs::list).post(handlers::jobs::create))
        .route("/jobs/", get(handlers::jobs::list).post(handlers::jobs::create))
        .route("/jobs/top_jobs", get(handlers::jobs::top))
        .route("/jobs/category/:category", get(handlers::jobs::list_by_category))
        .route(
            "/jobs/:id",
            get(handlers::jobs::retrieve)
                .put(handlers::jobs::update)
                .delete(handlers::jobs::delete),
        )
        .route("/images/:key", get(handlers::images::retrieve))
        .route("/cms", get(handlers::ui::cms))
        .route("/add-job", get(handlers::ui::add_job))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::pkg::internal::testing::{create_file_test_state, create_test_state};

    const BOUNDARY: &str = "jobboard-test-boundary";

    struct Form {
        body: Vec<u8>,
    }

    impl Form {
        fn new() -> Self {
            Form { body: vec![] }
        }

        fn text(mut self, name: &str, value: &str) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
            self
        }

        fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            self.body.extend_from_slice(data);
            self.body.extend_from_slice(b"\r\n");
            self
        }

        fn job(category: &str, company_name: &str) -> Self {
            Form::new()
                .text("category", category)
                .text("company_name", company_name)
                .text("job_role", "Backend Engineer")
                .text("website_link", "https://acme.example.com/careers")
                .text("state", "Maharashtra")
                .text("city", "Pune")
                .text("experience", "1-3 years")
                .text("qualification", "B.E / B.Tech")
                .text("batch", "2023, 2024")
                .text("salary_package", "8 LPA")
                .text("job_description", "<p>Own the <b>orders</b> service.</p>")
                .text("key_responsibility", "<ul><li>Design APIs</li></ul>")
                .text("about_company", "<p>We sell anvils.</p>")
                .text("selection_process", "<p>Two rounds</p>")
        }

        fn request(mut self, method: Method, uri: &str) -> Request<Body> {
            self.body
                .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
            Request::builder()
                .method(method)
                .uri(uri)
                .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
                .body(Body::from(self.body))
                .unwrap()
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = create_test_state(dir.path()).await;
        (routes(state), dir)
    }

    #[tokio::test]
    async fn create_then_fetch_returns_submitted_fields() {
        let (app, _dir) = test_app().await;
        let (status, created) =
            send_json(&app, Form::job("Remote", "Acme").request(Method::POST, "/jobs/")).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();
        assert!(created["posted_on"].is_string());
        assert!(created["image_url"].is_null());

        let (status, fetched) = send_json(&app, get(&format!("/jobs/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(fetched["category"], "Remote");
        assert_eq!(fetched["company_name"], "Acme");
        assert_eq!(fetched["batch"], "2023, 2024");
        assert_eq!(fetched["job_description"], "<p>Own the <b>orders</b> service.</p>");

        let (_, second) =
            send_json(&app, Form::job("Remote", "Globex").request(Method::POST, "/jobs")).await;
        assert_ne!(second["id"].as_i64().unwrap(), id);
    }

    #[tokio::test]
    async fn missing_required_field_is_a_bad_request() {
        let (app, _dir) = test_app().await;
        let form = Form::new()
            .text("category", "Remote")
            .text("company_name", "Acme")
            .text("job_role", "Backend Engineer");
        let (status, _) = send(&app, form.request(Method::POST, "/jobs/")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(&app, Form::job("Contract", "Acme").request(Method::POST, "/jobs/")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, page) = send_json(&app, get("/jobs")).await;
        assert_eq!(page["totalCount"], 0);
    }

    #[tokio::test]
    async fn pagination_is_stable_and_counts_everything() {
        let (app, _dir) = test_app().await;
        let mut ids = vec![];
        for i in 0..25 {
            let (_, created) = send_json(
                &app,
                Form::job("Fresher", &format!("Company {i}")).request(Method::POST, "/jobs/"),
            )
            .await;
            ids.push(created["id"].as_i64().unwrap());
        }
        ids.reverse();

        let (status, page) = send_json(&app, get("/jobs?currentPage=2&pageSize=10")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalCount"], 25);
        let got: Vec<i64> = page["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|job| job["id"].as_i64().unwrap())
            .collect();
        assert_eq!(got, ids[10..20].to_vec());

        let (_, again) = send_json(&app, get("/jobs?currentPage=2&pageSize=10")).await;
        assert_eq!(again, page);

        let (status, _) = send(&app, get("/jobs?currentPage=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn category_listing_only_returns_that_category() {
        let (app, _dir) = test_app().await;
        for (category, company) in [
            ("Internship", "Acme"),
            ("Remote", "Globex"),
            ("Internship", "Initech"),
            ("Part_time", "Hooli"),
        ] {
            send(&app, Form::job(category, company).request(Method::POST, "/jobs/")).await;
        }

        let (status, page) = send_json(&app, get("/jobs/category/Internship")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalCount"], 2);
        assert!(
            page["jobs"]
                .as_array()
                .unwrap()
                .iter()
                .all(|job| job["category"] == "Internship")
        );

        let (_, page) = send_json(&app, get("/jobs/category/Internship?search=initech")).await;
        assert_eq!(page["totalCount"], 1);
        assert_eq!(page["jobs"][0]["company_name"], "Initech");

        let (status, _) = send(&app, get("/jobs/category/Contract")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, top) = send_json(&app, get("/jobs/top_jobs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(top["internship"].as_array().unwrap().len(), 2);
        assert_eq!(top["part_time"][0]["company_name"], "Hooli");
        assert!(top["experienced"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_image_unless_replaced() {
        let (app, _dir) = test_app().await;
        let form = Form::job("Remote", "Acme").file("image", "logo.png", b"first-image");
        let (status, created) = send_json(&app, form.request(Method::POST, "/jobs/")).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();
        let first_image = created["image"].as_str().unwrap().to_string();
        assert_eq!(
            created["image_url"],
            format!("http://localhost:8003/images/{first_image}")
        );

        // batch omitted, city changed, no image part
        let form = Form::new()
            .text("category", "Remote")
            .text("company_name", "Acme")
            .text("job_role", "Staff Engineer")
            .text("state", "Maharashtra")
            .text("city", "Mumbai")
            .text("qualification", "Any graduate")
            .text("job_description", "<p>Lead the team.</p>")
            .file("image", "", b"");
        let (status, updated) =
            send_json(&app, form.request(Method::PUT, &format!("/jobs/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], id);
        assert_eq!(updated["posted_on"], created["posted_on"]);
        assert_eq!(updated["city"], "Mumbai");
        assert_eq!(updated["job_role"], "Staff Engineer");
        assert!(updated["batch"].is_null());
        assert!(updated["key_responsibility"].is_null());
        assert_eq!(updated["image"], first_image.as_str());

        let form = Form::job("Remote", "Acme").file("image", "logo.webp", b"second-image");
        let (_, replaced) = send_json(&app, form.request(Method::PUT, &format!("/jobs/{id}"))).await;
        let second_image = replaced["image"].as_str().unwrap().to_string();
        assert_ne!(second_image, first_image);
        let (status, _) = send(&app, get(&format!("/images/{first_image}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, bytes) = send(&app, get(&format!("/images/{second_image}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"second-image");

        let form = Form::job("Remote", "Acme").text("remove_image", "true");
        let (_, cleared) = send_json(&app, form.request(Method::PUT, &format!("/jobs/{id}"))).await;
        assert!(cleared["image"].is_null());
        assert!(cleared["image_url"].is_null());

        let (status, _) =
            send(&app, Form::job("Remote", "Acme").request(Method::PUT, "/jobs/9999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_unsupported_images() {
        let (app, _dir) = test_app().await;
        let form = Form::job("Remote", "Acme").file("image", "payload.exe", b"MZ");
        let (status, _) = send(&app, form.request(Method::POST, "/jobs/")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, page) = send_json(&app, get("/jobs")).await;
        assert_eq!(page["totalCount"], 0);
    }

    #[tokio::test]
    async fn delete_removes_the_posting() {
        let (app, _dir) = test_app().await;
        let form = Form::job("Internship", "Acme").file("image", "logo.jpg", b"jpeg-bytes");
        let (_, created) = send_json(&app, form.request(Method::POST, "/jobs/")).await;
        let id = created["id"].as_i64().unwrap();
        let image = created["image"].as_str().unwrap().to_string();

        let (status, removed) = send_json(&app, delete(&format!("/jobs/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["id"], id);

        let (status, _) = send(&app, get(&format!("/jobs/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, delete(&format!("/jobs/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, get(&format!("/images/{image}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_of_one_posting_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(create_file_test_state(dir.path()).await);
        let (_, created) =
            send_json(&app, Form::job("Remote", "Acme").request(Method::POST, "/jobs/")).await;
        let id = created["id"].as_i64().unwrap();

        let mut writers = vec![];
        for n in 0..40 {
            let app = app.clone();
            writers.push(tokio::spawn(async move {
                let form = Form::job("Remote", &format!("Acme {n}"));
                send(&app, form.request(Method::PUT, &format!("/jobs/{id}"))).await.0
            }));
        }
        for writer in writers {
            assert_eq!(writer.await.unwrap(), StatusCode::OK);
        }

        let (status, fetched) = send_json(&app, get(&format!("/jobs/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(fetched["company_name"].as_str().unwrap().starts_with("Acme "));
        let (_, page) = send_json(&app, get("/jobs")).await;
        assert_eq!(page["totalCount"], 1);
    }

    #[tokio::test]
    async fn malformed_image_keys_are_not_found() {
        let (app, _dir) = test_app().await;
        for uri in ["/images/.", "/images/..png", "/images/missing-key.png", "/images/uploaded.txt"] {
            let (status, _) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn serves_pages_and_probes() {
        let (app, _dir) = test_app().await;
        for uri in ["/cms", "/add-job", "/healthz", "/livez"] {
            let (status, _) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
        }
    }
}
