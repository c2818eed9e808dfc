//! Document database operations

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

use super::now_timestamp;

/// Uploaded PDF record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub page_count: i64,
    pub upload_date: String,
    pub original_width: f64,
    pub original_height: f64,
}

/// Fields of a document row before insertion
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub page_count: i64,
    pub original_width: f64,
    pub original_height: f64,
}

/// Document repository
pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific document
    pub async fn get(&self, id: i64) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, filename, original_filename, file_path, page_count,
                   upload_date, original_width, original_height
            FROM pdf_documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(document)
    }

    /// List all documents, newest upload first
    pub async fn list(&self) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, filename, original_filename, file_path, page_count,
                   upload_date, original_width, original_height
            FROM pdf_documents
            ORDER BY upload_date DESC, id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(documents)
    }

    /// Insert a document row
    pub async fn create(&self, data: &NewDocument) -> Result<Document> {
        let now = now_timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO pdf_documents (filename, original_filename, file_path, page_count,
                                       upload_date, original_width, original_height)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.filename)
        .bind(&data.original_filename)
        .bind(&data.file_path)
        .bind(data.page_count)
        .bind(&now)
        .bind(data.original_width)
        .bind(data.original_height)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created document".to_string()))
    }

    /// Delete a document and all of its annotations in one transaction
    ///
    /// Returns false when no such document exists.
    pub async fn delete_cascade(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let annotations = sqlx::query("DELETE FROM pdf_coordinates WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM pdf_documents WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(
            "Deleted document {} with {} annotations",
            id,
            annotations.rows_affected()
        );

        Ok(true)
    }
}
