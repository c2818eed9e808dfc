//! Document store
//!
//! Creating a document writes the upload to disk, inspects it with MuPDF
//! and inserts the metadata row. Deleting removes the file first and then
//! the rows (annotations and document) in one transaction. The file removal
//! and the transaction are not atomic: a crash in between leaves a row whose
//! file is gone, which later renders report as render errors.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::allowed_file;
use crate::db::{Document, DocumentRepository, NewDocument};
use crate::error::{AppError, Result};
use crate::pdf::{PdfError, RenderService};

use super::filename::sanitize_filename;

#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
    upload_dir: PathBuf,
    renderer: RenderService,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool, upload_dir: impl Into<PathBuf>, renderer: RenderService) -> Self {
        Self {
            pool,
            upload_dir: upload_dir.into(),
            renderer,
        }
    }

    /// Store an uploaded PDF and record its page count and page 1 size
    pub async fn create_document(&self, data: &[u8], original_filename: &str) -> Result<Document> {
        if original_filename.is_empty() {
            return Err(AppError::BadRequest("No file was selected".to_string()));
        }
        if !allowed_file(original_filename) {
            return Err(AppError::BadRequest(
                "File type not allowed. Only PDF files are accepted.".to_string(),
            ));
        }

        let original_filename = sanitize_filename(original_filename);
        let filename = format!("{}.pdf", Uuid::new_v4());
        let file_path = self.upload_dir.join(&filename);

        tokio::fs::write(&file_path, data).await?;

        let info = match self.renderer.inspect(&file_path).await {
            Ok(info) => info,
            Err(e) => {
                self.discard(&file_path).await;
                // Anything that stops inspection (including a timeout) is a parse failure
                let err = match e {
                    PdfError::Parse(_) => e,
                    other => PdfError::Parse(other.to_string()),
                };
                return Err(err.into());
            }
        };

        let new_document = NewDocument {
            filename,
            original_filename,
            file_path: file_path.to_string_lossy().into_owned(),
            page_count: info.page_count,
            original_width: info.width,
            original_height: info.height,
        };

        let document = match DocumentRepository::new(&self.pool).create(&new_document).await {
            Ok(document) => document,
            Err(e) => {
                self.discard(&file_path).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Stored document {} '{}' ({} pages, {}x{} pt)",
            document.id,
            document.original_filename,
            document.page_count,
            document.original_width,
            document.original_height
        );

        Ok(document)
    }

    /// Get a document by id
    pub async fn get_document(&self, id: i64) -> Result<Document> {
        DocumentRepository::new(&self.pool)
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", id)))
    }

    /// All documents, newest upload first
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        DocumentRepository::new(&self.pool).list().await
    }

    /// Delete a document, its file and all of its annotations
    ///
    /// A backing file that is already gone is not an error.
    pub async fn delete_document(&self, id: i64) -> Result<Document> {
        let document = self.get_document(id).await?;

        match tokio::fs::remove_file(&document.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("File for document {} already removed: {}", id, document.file_path);
            }
            Err(e) => return Err(e.into()),
        }

        if !DocumentRepository::new(&self.pool).delete_cascade(id).await? {
            return Err(AppError::NotFound(format!("Document not found: {}", id)));
        }

        tracing::info!("Deleted document {} '{}'", id, document.original_filename);
        Ok(document)
    }

    /// Remove a stored upload that did not become a document
    async fn discard(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!("Failed to remove rejected upload {}: {}", path.display(), e);
        }
    }
}
