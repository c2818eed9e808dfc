//! Async rendering service
//!
//! Runs MuPDF work on the blocking thread pool with a timeout so that a
//! pathological PDF fails its own request instead of stalling forever.
//! The blocking thread may keep running after a timeout, but the request
//! completes.
//!
//! Rendered pages are written to the temp directory as
//! `page_{document}_{page}_{dpi}.png`. Every request re-renders and
//! overwrites the artifact; nothing is served from a cache.

use std::path::{Path, PathBuf};

use tokio::time::{timeout, Duration};

use crate::db::Document;

use super::mapping::{rendered_size, RENDER_DPI};
use super::renderer;
use super::types::{PdfError, PdfInfo, RenderedPage};

#[derive(Debug, Clone)]
pub struct RenderService {
    temp_dir: PathBuf,
    timeout: Duration,
}

impl RenderService {
    pub fn new(temp_dir: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Directory holding rendered page images
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Name of the artifact for a given page render
    pub fn temp_filename(document_id: i64, page: i64, dpi: u32) -> String {
        format!("page_{}_{}_{}.png", document_id, page, dpi)
    }

    /// Read page count and first-page size of a stored PDF
    pub async fn inspect(&self, path: &Path) -> Result<PdfInfo, PdfError> {
        let path = path.to_path_buf();
        self.run_blocking(move || renderer::inspect(&path)).await
    }

    /// Render a page (1-indexed) of `document` at [`RENDER_DPI`]
    ///
    /// The page number is checked against the stored page count before the
    /// file is opened.
    pub async fn render_page(
        &self,
        document: &Document,
        page: i64,
    ) -> Result<RenderedPage, PdfError> {
        if page < 1 || page > document.page_count {
            return Err(PdfError::InvalidPage {
                page,
                page_count: document.page_count,
            });
        }

        let source = PathBuf::from(&document.file_path);
        let image = self
            .run_blocking(move || renderer::rasterize(&source, page, RENDER_DPI))
            .await?;

        // Stored dimensions describe page 1; other pages may legitimately differ
        let (expected_w, expected_h) =
            rendered_size(document.original_width, document.original_height, RENDER_DPI);
        if (image.width as f64 - expected_w).abs() > 1.0
            || (image.height as f64 - expected_h).abs() > 1.0
        {
            tracing::debug!(
                "Document {} page {} rendered at {}x{}, page 1 size gives {:.0}x{:.0}",
                document.id,
                page,
                image.width,
                image.height,
                expected_w,
                expected_h
            );
        }

        let filename = Self::temp_filename(document.id, page, RENDER_DPI);
        let path = self.temp_dir.join(&filename);
        tokio::fs::write(&path, &image.png).await?;

        tracing::debug!(
            "Rendered document {} page {} ({}x{}) to {}",
            document.id,
            page,
            image.width,
            image.height,
            path.display()
        );

        Ok(RenderedPage {
            filename,
            path,
            image_width: image.width,
            image_height: image.height,
            dpi: RENDER_DPI,
        })
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T, PdfError>
    where
        F: FnOnce() -> Result<T, PdfError> + Send + 'static,
        T: Send + 'static,
    {
        match timeout(self.timeout, tokio::task::spawn_blocking(f)).await {
            Ok(join_result) => join_result
                .map_err(|e| PdfError::Render(format!("Task join error: {}", e)))?,
            Err(_) => Err(PdfError::Timeout(self.timeout.as_secs())),
        }
    }
}
