//! Coordinate annotation API routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

use crate::annotations::{AnnotationKind, AnnotationResponse, CreateAnnotationRequest};
use crate::db::AnnotationRepository;
use crate::error::{AppError, Result, ValidationError};
use crate::state::AppState;

/// Create the coordinates router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/coordinates", post(create_coordinate))
        // The first segment shares one parameter name so the two routes can coexist
        .route("/api/coordinates/:id/:page_num", get(list_coordinates))
        .route("/api/coordinates/:id", delete(delete_coordinate))
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub coordinate_id: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}

async fn create_coordinate(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateAnnotationRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>> {
    let Json(request) = body.map_err(|rejection| {
        AppError::Validation(ValidationError::invalid(rejection.body_text()))
    })?;

    let new_annotation = request.validate()?;
    let drift = new_annotation.mapping_drift();
    if drift > 1.0 {
        tracing::debug!(
            "Client coordinates differ from screen / scale_factor by {:.2} pt",
            drift
        );
    }

    let annotation = AnnotationRepository::new(state.db())
        .create(&new_annotation)
        .await?;

    tracing::debug!(
        "Saved {} {} on document {} page {}",
        new_annotation.kind,
        annotation.id,
        annotation.document_id,
        annotation.page_number
    );

    let message = match new_annotation.kind {
        AnnotationKind::Point => "Point saved successfully",
        AnnotationKind::Area => "Area saved successfully",
    };

    Ok(Json(CreatedResponse {
        success: true,
        coordinate_id: annotation.id,
        message: message.to_string(),
    }))
}

async fn list_coordinates(
    State(state): State<AppState>,
    Path((doc_id, page_num)): Path<(i64, i64)>,
) -> Result<Json<Vec<AnnotationResponse>>> {
    let annotations = AnnotationRepository::new(state.db())
        .list_for_page(doc_id, page_num)
        .await?;

    Ok(Json(annotations.into_iter().map(Into::into).collect()))
}

async fn delete_coordinate(
    State(state): State<AppState>,
    Path(coord_id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    let deleted = AnnotationRepository::new(state.db()).delete(coord_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Coordinate not found: {}", coord_id)));
    }

    Ok(Json(DeletedResponse {
        success: true,
        message: "Coordinate deleted successfully".to_string(),
    }))
}
