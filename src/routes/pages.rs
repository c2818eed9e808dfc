//! HTML page routes
//!
//! Form-driven routes never answer with an error body: failures become an
//! error flash and a redirect back to the library.

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::error::{AppError, Result};
use crate::flash::{clear_cookie, redirect_with_flash, Flash};
use crate::html;
use crate::state::AppState;

/// Create the page router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/view/:doc_id", get(view))
        .route("/delete/:doc_id", post(delete_document))
}

/// Render an HTML page, consuming the pending flash if there is one
fn page(flash: Option<Flash>, body: String) -> Response {
    match flash {
        Some(_) => ([(header::SET_COOKIE, clear_cookie())], Html(body)).into_response(),
        None => Html(body).into_response(),
    }
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let flash = Flash::from_headers(&headers, state.session_secret());
    let documents = state.documents().list_documents().await?;
    Ok(page(flash.clone(), html::index_page(&documents, flash.as_ref())))
}

async fn view(
    State(state): State<AppState>,
    Path(doc_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response> {
    let document = state.documents().get_document(doc_id).await?;
    let flash = Flash::from_headers(&headers, state.session_secret());
    Ok(page(flash.clone(), html::viewer_page(&document, flash.as_ref())))
}

async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let secret = state.session_secret();

    // Not a multipart form at all, so there is no file part to read
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!("Upload is not a multipart form: {}", rejection.body_text());
            return redirect_with_flash("/", Flash::error("No file part in the request"), secret);
        }
    };

    let (filename, data) = match read_file_field(multipart).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            tracing::warn!("Upload without a 'file' field");
            return redirect_with_flash("/", Flash::error("No file part in the request"), secret);
        }
        Err(e) => {
            tracing::warn!("Failed to read upload: {}", e);
            let message = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                "File is too large"
            } else {
                "Failed to read the uploaded file"
            };
            return redirect_with_flash("/", Flash::error(message), secret);
        }
    };

    match state.documents().create_document(&data, &filename).await {
        Ok(document) => redirect_with_flash(
            &format!("/view/{}", document.id),
            Flash::success(format!(
                "'{}' uploaded successfully ({} pages)",
                document.original_filename, document.page_count
            )),
            secret,
        ),
        Err(e) => {
            e.log();
            redirect_with_flash("/", Flash::error(e.user_message()), secret)
        }
    }
}

/// Pull the `file` field out of the form as `(client filename, bytes)`
async fn read_file_field(
    mut multipart: Multipart,
) -> std::result::Result<Option<(String, Vec<u8>)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await?;
        tracing::debug!("Received upload '{}' ({} bytes)", filename, data.len());
        return Ok(Some((filename, data.to_vec())));
    }
    Ok(None)
}

async fn delete_document(State(state): State<AppState>, Path(doc_id): Path<i64>) -> Response {
    let secret = state.session_secret();

    let flash = match state.documents().delete_document(doc_id).await {
        Ok(document) => Flash::success(format!(
            "'{}' and its coordinates were deleted",
            document.original_filename
        )),
        Err(e) => {
            e.log();
            let message = match &e {
                AppError::NotFound(_) => "Document not found".to_string(),
                other => format!("Failed to delete document: {}", other.user_message()),
            };
            Flash::error(message)
        }
    };

    redirect_with_flash("/", flash, secret)
}
