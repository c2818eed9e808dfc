//! Page rendering routes
//!
//! `GET /api/pdf/:doc_id/page/:page_num` renders one page at 150 DPI into
//! the temp directory; `GET /temp/:filename` serves the result.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::pdf::scale_factor;
use crate::state::AppState;

/// Create the render router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pdf/:doc_id/page/:page_num", get(render_page))
        .route("/temp/:filename", get(serve_render))
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub success: bool,
    pub image_url: String,
    pub image_width: u32,
    pub image_height: u32,
    pub original_width: f64,
    pub original_height: f64,
    pub dpi: u32,
    pub scale_factor: f64,
}

async fn render_page(
    State(state): State<AppState>,
    Path((doc_id, page_num)): Path<(i64, i64)>,
) -> Result<Json<RenderResponse>> {
    let document = state.documents().get_document(doc_id).await?;
    let rendered = state.renderer().render_page(&document, page_num).await?;

    Ok(Json(RenderResponse {
        success: true,
        image_url: format!("/temp/{}", rendered.filename),
        image_width: rendered.image_width,
        image_height: rendered.image_height,
        original_width: document.original_width,
        original_height: document.original_height,
        dpi: rendered.dpi,
        scale_factor: scale_factor(rendered.dpi),
    }))
}

/// Serve a rendered page image from the temp directory
async fn serve_render(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::NotFound(format!("File not found: {}", filename)));
    }

    let path = state.renderer().temp_dir().join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File not found: {}", filename)));
        }
        Err(e) => return Err(e.into()),
    };

    let content_type = mime_guess::from_path(&path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}
