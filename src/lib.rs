//! PDF coordinate capture server
//!
//! Upload PDFs, render their pages to PNG at 150 DPI, and record point and
//! area annotations in PDF point space.
//!
//! # Modules
//!
//! - `library`: uploaded documents and their files
//! - `pdf`: MuPDF inspection, rasterization and the point/pixel mapping
//! - `annotations` / `db`: annotation validation and SQLite persistence
//! - `routes`: the HTTP surface

pub mod annotations;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod html;
pub mod library;
pub mod pdf;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;
