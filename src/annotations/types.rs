//! Coordinate annotation types
//!
//! An annotation marks either a single point or a rectangular area on one
//! page of a document. Every annotation carries the position in PDF point
//! space, the position in rendered pixel space, and the scale factor that
//! related the two when it was captured.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::Annotation;
use crate::error::ValidationError;
use crate::pdf::mapping::to_pdf_space;

/// Shape of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// A single clicked position
    #[default]
    Point,
    /// A dragged rectangle; `x`/`y` is its top-left corner
    Area,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Point => "point",
            AnnotationKind::Area => "area",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(AnnotationKind::Point),
            "area" => Ok(AnnotationKind::Area),
            other => Err(format!("type must be 'point' or 'area', got '{}'", other)),
        }
    }
}

/// Body of `POST /api/coordinates` as sent by the client
///
/// Every field is optional at this stage so that all missing fields can be
/// reported together by [`CreateAnnotationRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAnnotationRequest {
    pub document_id: Option<i64>,
    pub page_number: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub screen_x: Option<f64>,
    pub screen_y: Option<f64>,
    pub scale_factor: Option<f64>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// A fully validated annotation ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnotation {
    pub document_id: i64,
    pub page_number: i64,
    pub kind: AnnotationKind,
    pub x: f64,
    pub y: f64,
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale_factor: f64,
    pub description: Option<String>,
    /// Set only for areas
    pub width: Option<f64>,
    /// Set only for areas
    pub height: Option<f64>,
}

impl CreateAnnotationRequest {
    /// Check required fields and produce a typed annotation
    ///
    /// `type` defaults to point. Areas take `width`/`height` from the
    /// request, defaulting to 0; zero-sized areas are accepted. Points never
    /// store a size.
    pub fn validate(self) -> Result<NewAnnotation, ValidationError> {
        let mut errors = ValidationError::default();

        fn require<T: Copy + Default>(value: Option<T>, name: &str, errors: &mut ValidationError) -> T {
            match value {
                Some(v) => v,
                None => {
                    errors.missing.push(name.to_string());
                    T::default()
                }
            }
        }

        let document_id = require(self.document_id, "document_id", &mut errors);
        let page_number = require(self.page_number, "page_number", &mut errors);
        let x = require(self.x, "x", &mut errors);
        let y = require(self.y, "y", &mut errors);
        let screen_x = require(self.screen_x, "screen_x", &mut errors);
        let screen_y = require(self.screen_y, "screen_y", &mut errors);
        let scale_factor = require(self.scale_factor, "scale_factor", &mut errors);

        if self.page_number.is_some() && page_number < 1 {
            errors
                .invalid
                .push(format!("page_number must be at least 1, got {}", page_number));
        }

        let kind = match self.kind.as_deref() {
            None => AnnotationKind::Point,
            Some(raw) => match raw.parse() {
                Ok(kind) => kind,
                Err(reason) => {
                    errors.invalid.push(reason);
                    AnnotationKind::Point
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let (width, height) = match kind {
            AnnotationKind::Point => (None, None),
            AnnotationKind::Area => (
                Some(self.width.unwrap_or(0.0)),
                Some(self.height.unwrap_or(0.0)),
            ),
        };

        Ok(NewAnnotation {
            document_id,
            page_number,
            kind,
            x,
            y,
            screen_x,
            screen_y,
            scale_factor,
            description: self.description,
            width,
            height,
        })
    }
}

impl NewAnnotation {
    /// Largest distance, in points, between the submitted PDF position and
    /// the one implied by `screen / scale_factor`
    ///
    /// Values are stored as sent; this only measures how far the client's
    /// own mapping strayed.
    pub fn mapping_drift(&self) -> f64 {
        if self.scale_factor <= 0.0 {
            return f64::INFINITY;
        }
        let (px, py) = to_pdf_space(self.screen_x, self.screen_y, self.scale_factor);
        (px - self.x).abs().max((py - self.y).abs())
    }
}

/// Serialized form of an annotation in page listings
///
/// `width`/`height` are present only for areas.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationResponse {
    pub id: i64,
    pub document_id: i64,
    pub page_number: i64,
    pub x: f64,
    pub y: f64,
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale_factor: f64,
    pub description: Option<String>,
    pub timestamp: String,
    pub coordinate_type: AnnotationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl From<Annotation> for AnnotationResponse {
    fn from(annotation: Annotation) -> Self {
        let kind = annotation.kind();
        let (width, height) = match kind {
            AnnotationKind::Point => (None, None),
            AnnotationKind::Area => (
                Some(annotation.width.unwrap_or(0.0)),
                Some(annotation.height.unwrap_or(0.0)),
            ),
        };

        Self {
            id: annotation.id,
            document_id: annotation.document_id,
            page_number: annotation.page_number,
            x: annotation.x,
            y: annotation.y,
            screen_x: annotation.screen_x,
            screen_y: annotation.screen_y,
            scale_factor: annotation.scale_factor,
            description: annotation.description,
            timestamp: annotation.timestamp,
            coordinate_type: kind,
            width,
            height,
        }
    }
}
