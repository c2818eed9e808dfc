//! Point-space / pixel-space mapping
//!
//! PDF coordinates are expressed in points (72 per inch). Pages are rendered
//! at a fixed DPI, so a rendered pixel covers `72 / dpi` points. Annotations
//! store both spaces together with the scale factor that related them, which
//! is only meaningful while pages keep rendering at [`RENDER_DPI`].

/// Native PDF resolution
pub const PDF_POINTS_PER_INCH: f64 = 72.0;

/// Resolution used for every page render
pub const RENDER_DPI: u32 = 150;

/// Pixels per PDF point at `dpi`
pub fn scale_factor(dpi: u32) -> f64 {
    dpi as f64 / PDF_POINTS_PER_INCH
}

/// Expected pixel size of a page of `width` x `height` points rendered at `dpi`
pub fn rendered_size(width: f64, height: f64, dpi: u32) -> (f64, f64) {
    let scale = scale_factor(dpi);
    (width * scale, height * scale)
}

/// Convert a pixel position on the rendered image to PDF points
pub fn to_pdf_space(screen_x: f64, screen_y: f64, scale: f64) -> (f64, f64) {
    (screen_x / scale, screen_y / scale)
}

/// Convert a PDF point position to a pixel position on the rendered image
#[cfg(test)]
pub fn to_screen_space(x: f64, y: f64, scale: f64) -> (f64, f64) {
    (x * scale, y * scale)
}
