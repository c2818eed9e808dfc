//! Route modules for the PDF coordinate server

pub mod coordinates;
pub mod pages;
pub mod pdf;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const VIEWER_JS: &str = include_str!("../../assets/viewer.js");

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn viewer_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        VIEWER_JS,
    )
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().server.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/static/viewer.js", get(viewer_script))
        .merge(pages::router())
        .merge(pdf::router())
        .merge(coordinates::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{create_pool, AnnotationRepository};
    use crate::flash::{Flash, FLASH_COOKIE};
    use crate::testing::sample_pdf;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "----pdfcoordsboundary";

    async fn test_app(dir: &TempDir) -> (Router, AppState) {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        config.storage.upload_dir = dir.path().join("uploads");
        config.storage.temp_dir = dir.path().join("temp");
        config.server.max_upload_bytes = 1024 * 1024;
        config.session.secret = "router-test-secret".to_string();

        let pool = create_pool(&config.database.url).await.unwrap();
        let state = AppState::new(config, pool).await.unwrap();
        (build_router(state.clone()), state)
    }

    fn multipart_upload(filename: &str, data: &[u8]) -> Request<Body> {
        multipart_form("file", filename, data)
    }

    fn multipart_form(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn flash_of(response: &Response, secret: &str) -> Flash {
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let value = cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix(&format!("{}=", FLASH_COOKIE)))
            .unwrap();
        Flash::decode(value, secret).unwrap()
    }

    async fn upload(app: &Router, filename: &str, data: &[u8]) -> Response {
        app.clone()
            .oneshot(multipart_upload(filename, data))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir).await;

        let server = TestServer::new(app).unwrap();
        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_viewer_script_served() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir).await;

        let server = TestServer::new(app).unwrap();
        let response = server.get("/static/viewer.js").await;
        response.assert_status_ok();
        assert!(response.text().contains("/api/coordinates"));
    }

    #[tokio::test]
    async fn test_full_capture_scenario() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;
        let secret = state.session_secret().to_string();

        // Upload a 2-page letter-size PDF
        let response = upload(&app, "letter.pdf", &sample_pdf(2, 612.0, 792.0)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response).to_string();
        assert!(target.starts_with("/view/"));
        assert_eq!(flash_of(&response, &secret).level, crate::flash::FlashLevel::Success);
        let doc_id: i64 = target.trim_start_matches("/view/").parse().unwrap();

        let server = TestServer::new(app).unwrap();

        let view = server.get(&target).await;
        view.assert_status_ok();
        assert!(view.text().contains("letter.pdf"));

        // Page 1 renders at 150 DPI
        let render = server.get(&format!("/api/pdf/{}/page/1", doc_id)).await;
        render.assert_status_ok();
        let body: Value = render.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["dpi"], 150);
        assert!((body["image_width"].as_i64().unwrap() - 1275).abs() <= 1);
        assert!((body["image_height"].as_i64().unwrap() - 1650).abs() <= 1);
        assert_eq!(body["original_width"].as_f64().unwrap().round(), 612.0);
        assert!((body["scale_factor"].as_f64().unwrap() - 150.0 / 72.0).abs() < 1e-9);

        let image_url = body["image_url"].as_str().unwrap().to_string();
        assert_eq!(image_url, format!("/temp/page_{}_1_150.png", doc_id));
        let image = server.get(&image_url).await;
        image.assert_status_ok();
        assert_eq!(&image.as_bytes()[1..4], b"PNG");

        // Page 3 does not exist
        server
            .get(&format!("/api/pdf/{}/page/3", doc_id))
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Save a point and an area on page 1
        let point = server
            .post("/api/coordinates")
            .json(&json!({
                "document_id": doc_id,
                "page_number": 1,
                "x": 100.0,
                "y": 200.0,
                "screen_x": 208.33,
                "screen_y": 416.67,
                "scale_factor": 150.0 / 72.0,
                "description": "signature",
                "type": "point"
            }))
            .await;
        point.assert_status_ok();
        let point: Value = point.json();
        assert_eq!(point["success"], true);
        assert_eq!(point["message"], "Point saved successfully");

        let area = server
            .post("/api/coordinates")
            .json(&json!({
                "document_id": doc_id,
                "page_number": 1,
                "x": 50.0,
                "y": 60.0,
                "screen_x": 104.17,
                "screen_y": 125.0,
                "scale_factor": 150.0 / 72.0,
                "type": "area",
                "width": 120.0,
                "height": 40.0
            }))
            .await;
        area.assert_status_ok();
        let area: Value = area.json();
        assert_eq!(area["message"], "Area saved successfully");

        // Newest first, size only on the area
        let list: Value = server
            .get(&format!("/api/coordinates/{}/1", doc_id))
            .await
            .json();
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], area["coordinate_id"]);
        assert_eq!(list[0]["coordinate_type"], "area");
        assert_eq!(list[0]["width"], 120.0);
        assert_eq!(list[1]["coordinate_type"], "point");
        assert!(list[1].get("width").is_none());
        assert_eq!(list[1]["description"], "signature");

        let page_two: Value = server
            .get(&format!("/api/coordinates/{}/2", doc_id))
            .await
            .json();
        assert!(page_two.as_array().unwrap().is_empty());

        // Delete the point
        let point_id = point["coordinate_id"].as_i64().unwrap();
        let deleted = server.delete(&format!("/api/coordinates/{}", point_id)).await;
        deleted.assert_status_ok();
        assert_eq!(deleted.json::<Value>()["success"], true);
        server
            .delete(&format!("/api/coordinates/{}", point_id))
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Delete the document; everything goes with it
        let removed = server.post(&format!("/delete/{}", doc_id)).await;
        removed.assert_status(StatusCode::SEE_OTHER);
        server
            .get(&target)
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let remaining: Value = server
            .get(&format!("/api/coordinates/{}/1", doc_id))
            .await
            .json();
        assert!(remaining.as_array().unwrap().is_empty());
        assert!(state.documents().list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let response = upload(&app, "notes.txt", b"plain text").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let flash = flash_of(&response, state.session_secret());
        assert_eq!(flash.level, crate::flash::FlashLevel::Error);
        assert!(flash.message.contains("Only PDF"));
        assert!(state.documents().list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_empty_filename() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let response = upload(&app, "", b"").await;
        assert_eq!(location(&response), "/");
        let flash = flash_of(&response, state.session_secret());
        assert_eq!(flash.message, "No file was selected");
    }

    #[tokio::test]
    async fn test_upload_unparseable_pdf() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let response = upload(&app, "broken.pdf", b"%PDF-1.4 not really").await;
        assert_eq!(location(&response), "/");
        let flash = flash_of(&response, state.session_secret());
        assert_eq!(flash.message, "Failed to process the PDF file");
        assert!(state.documents().list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_not_multipart() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("file=letter.pdf"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let flash = flash_of(&response, state.session_secret());
        assert_eq!(flash.level, crate::flash::FlashLevel::Error);
        assert_eq!(flash.message, "No file part in the request");
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let request = multipart_form("attachment", "letter.pdf", &sample_pdf(1, 612.0, 792.0));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let flash = flash_of(&response, state.session_secret());
        assert_eq!(flash.message, "No file part in the request");
        assert!(state.documents().list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_too_large() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let oversized = vec![b'x'; 2 * 1024 * 1024];
        let response = upload(&app, "huge.pdf", &oversized).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let flash = flash_of(&response, state.session_secret());
        assert_eq!(flash.level, crate::flash::FlashLevel::Error);
        assert!(state.documents().list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_consumes_flash() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let cookie = format!(
            "{}={}",
            FLASH_COOKIE,
            Flash::error("No file was selected").encode(state.session_secret())
        );
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("Max-Age=0"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("No file was selected"));
    }

    #[tokio::test]
    async fn test_render_unknown_document() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir).await;

        let server = TestServer::new(app).unwrap();
        server
            .get("/api/pdf/42/page/1")
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/view/42")
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/temp/page_42_1_150.png")
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_coordinate_missing_fields() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let response = upload(&app, "letter.pdf", &sample_pdf(1, 612.0, 792.0)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let doc_id = state.documents().list_documents().await.unwrap()[0].id;

        let server = TestServer::new(app).unwrap();
        let response = server
            .post("/api/coordinates")
            .json(&json!({ "document_id": doc_id, "page_number": 1, "x": 10.0 }))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["error"], "validation_error");
        assert_eq!(
            body["fields"]["missing"],
            json!(["y", "screen_x", "screen_y", "scale_factor"])
        );

        // Nothing was stored for the rejected request
        let stored = AnnotationRepository::new(state.db())
            .list_for_page(doc_id, 1)
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_create_coordinate_malformed_json() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir).await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/coordinates")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_missing_document_flashes() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir).await;

        let request = Request::builder()
            .method("POST")
            .uri("/delete/99")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let flash = flash_of(&response, state.session_secret());
        assert_eq!(flash.message, "Document not found");
    }
}
