//! PDF inspection and page rendering
//!
//! Provides page-count/dimension inspection and fixed-DPI rasterization
//! using the MuPDF library, plus the point/pixel coordinate mapping that
//! stored annotations rely on.

pub mod mapping;
mod renderer;
mod service;
mod types;

pub use mapping::{scale_factor, RENDER_DPI};
pub use renderer::{inspect, rasterize};
pub use service::RenderService;
pub use types::{PdfError, PdfInfo, RasterImage, RenderedPage};
