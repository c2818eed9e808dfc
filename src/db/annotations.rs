//! Coordinate annotation database operations

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::annotations::{AnnotationKind, NewAnnotation};
use crate::error::{AppError, Result};

use super::now_timestamp;

/// Annotation record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Annotation {
    pub id: i64,
    pub document_id: i64,
    pub page_number: i64,
    pub x: f64,
    pub y: f64,
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale_factor: f64,
    pub description: Option<String>,
    pub coordinate_type: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub timestamp: String,
}

impl Annotation {
    /// Stored shape; unknown values read as points
    pub fn kind(&self) -> AnnotationKind {
        self.coordinate_type.parse().unwrap_or_default()
    }
}

/// Annotation repository
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific annotation
    pub async fn get(&self, id: i64) -> Result<Option<Annotation>> {
        let annotation = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, document_id, page_number, x, y, screen_x, screen_y, scale_factor,
                   description, coordinate_type, width, height, timestamp
            FROM pdf_coordinates
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(annotation)
    }

    /// List annotations on one page, newest first
    pub async fn list_for_page(&self, document_id: i64, page_number: i64) -> Result<Vec<Annotation>> {
        let annotations = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, document_id, page_number, x, y, screen_x, screen_y, scale_factor,
                   description, coordinate_type, width, height, timestamp
            FROM pdf_coordinates
            WHERE document_id = ? AND page_number = ?
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(document_id)
        .bind(page_number)
        .fetch_all(self.pool)
        .await?;

        Ok(annotations)
    }

    /// Create a new annotation
    pub async fn create(&self, data: &NewAnnotation) -> Result<Annotation> {
        let now = now_timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO pdf_coordinates (document_id, page_number, x, y, screen_x, screen_y,
                                         scale_factor, description, coordinate_type,
                                         width, height, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.document_id)
        .bind(data.page_number)
        .bind(data.x)
        .bind(data.y)
        .bind(data.screen_x)
        .bind(data.screen_y)
        .bind(data.scale_factor)
        .bind(&data.description)
        .bind(data.kind.as_str())
        .bind(data.width)
        .bind(data.height)
        .bind(&now)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created annotation".to_string()))
    }

    /// Delete an annotation
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pdf_coordinates WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count annotations for a document
    #[cfg(test)]
    pub async fn count_for_document(&self, document_id: i64) -> Result<i64> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM pdf_coordinates
            WHERE document_id = ?
            "#,
        )
        .bind(document_id)
        .fetch_one(self.pool)
        .await?;

        Ok(result.0)
    }
}
