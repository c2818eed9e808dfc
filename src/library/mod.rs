//! Uploaded document library
//!
//! Owns the uploaded PDF files and their metadata rows. Annotations are
//! stored separately but are removed together with their document.

mod filename;
mod store;

pub use filename::sanitize_filename;
pub use store::DocumentStore;
