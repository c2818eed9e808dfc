//! Point and area annotations captured on rendered pages

mod types;

pub use types::{AnnotationKind, AnnotationResponse, CreateAnnotationRequest, NewAnnotation};
