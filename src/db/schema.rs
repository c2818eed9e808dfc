//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Uploaded PDF documents
CREATE TABLE IF NOT EXISTS pdf_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    -- Generated storage name (<uuid>.pdf)
    filename TEXT NOT NULL,
    original_filename TEXT NOT NULL,
    file_path TEXT NOT NULL,
    page_count INTEGER NOT NULL CHECK (page_count >= 1),
    upload_date TEXT NOT NULL,
    -- Page 1 size in PDF points, used for coordinate mapping
    original_width REAL NOT NULL CHECK (original_width > 0),
    original_height REAL NOT NULL CHECK (original_height > 0)
);

CREATE INDEX IF NOT EXISTS idx_documents_upload_date ON pdf_documents(upload_date);

-- Point and area annotations
CREATE TABLE IF NOT EXISTS pdf_coordinates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES pdf_documents(id) ON DELETE CASCADE,
    page_number INTEGER NOT NULL,
    -- PDF point-space position
    x REAL NOT NULL,
    y REAL NOT NULL,
    -- Pixel position on the rendered page
    screen_x REAL NOT NULL,
    screen_y REAL NOT NULL,
    scale_factor REAL NOT NULL,
    description TEXT,
    -- 'point' or 'area'
    coordinate_type TEXT NOT NULL DEFAULT 'point',
    -- Area size, NULL for points
    width REAL,
    height REAL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_coordinates_page ON pdf_coordinates(document_id, page_number);
CREATE INDEX IF NOT EXISTS idx_coordinates_timestamp ON pdf_coordinates(timestamp);
"#;
