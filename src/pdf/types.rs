//! PDF data and error types

use std::path::PathBuf;

use thiserror::Error;

/// PDF processing errors
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    Parse(String),
    #[error("Failed to render page: {0}")]
    Render(String),
    #[error("Page {page} not found (document has {page_count} pages)")]
    InvalidPage { page: i64, page_count: i64 },
    #[error("Image encoding error: {0}")]
    Image(String),
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Facts read from a PDF at upload time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfInfo {
    pub page_count: i64,
    /// Page 1 width in points
    pub width: f64,
    /// Page 1 height in points
    pub height: f64,
}

/// An encoded page image
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// A page rendered into the temp directory
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub filename: String,
    pub path: PathBuf,
    pub image_width: u32,
    pub image_height: u32,
    pub dpi: u32,
}
