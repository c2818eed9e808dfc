//! Blocking MuPDF operations
//!
//! MuPDF's `fz_context` is not thread-safe, so every call opens its own
//! document instance and drops it before returning. Callers on the async
//! runtime go through [`super::RenderService`], which moves these calls to
//! the blocking pool.

use std::io::Cursor;
use std::path::Path;

use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::mapping::scale_factor;
use super::types::{PdfError, PdfInfo, RasterImage};

fn open_document(path: &Path) -> Result<Document, mupdf::Error> {
    let path_str = path.to_string_lossy();
    Document::open(&*path_str)
}

/// Read page count and page 1 dimensions
///
/// Page 1 is assumed to be representative of the whole document.
pub fn inspect(path: &Path) -> Result<PdfInfo, PdfError> {
    let parse_err = |e: mupdf::Error| PdfError::Parse(e.to_string());
    let doc = open_document(path).map_err(parse_err)?;

    let page_count = doc.page_count().map_err(parse_err)? as i64;
    if page_count < 1 {
        return Err(PdfError::Parse("document has no pages".to_string()));
    }

    let page = doc.load_page(0).map_err(parse_err)?;
    let bounds = page.bounds().map_err(parse_err)?;
    let width = (bounds.x1 - bounds.x0) as f64;
    let height = (bounds.y1 - bounds.y0) as f64;

    if !(width > 0.0 && height > 0.0) {
        return Err(PdfError::Parse(format!(
            "invalid page size {}x{}",
            width, height
        )));
    }

    Ok(PdfInfo {
        page_count,
        width,
        height,
    })
}

/// Rasterize one page (1-indexed) at `dpi` and encode it as PNG
pub fn rasterize(path: &Path, page_number: i64, dpi: u32) -> Result<RasterImage, PdfError> {
    let render_err = |e: mupdf::Error| PdfError::Render(e.to_string());
    let doc = open_document(path).map_err(render_err)?;

    let page_count = doc.page_count().map_err(render_err)? as i64;
    if page_number < 1 || page_number > page_count {
        return Err(PdfError::InvalidPage {
            page: page_number,
            page_count,
        });
    }

    let page = doc.load_page((page_number - 1) as i32).map_err(render_err)?;

    let scale = scale_factor(dpi) as f32;
    let matrix = Matrix::new_scale(scale, scale);

    // to_pixmap signature: (ctm, colorspace, alpha, show_extras) -> Pixmap
    let colorspace = Colorspace::device_rgb();
    let pixmap = page
        .to_pixmap(&matrix, &colorspace, false, true)
        .map_err(render_err)?;

    encode_png(&pixmap)
}

fn encode_png(pixmap: &Pixmap) -> Result<RasterImage, PdfError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize; // components per pixel

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(r);
            let b = samples.get(offset + 2).copied().unwrap_or(r);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    let img = image::RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| PdfError::Image("Failed to create image buffer".to_string()))?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| PdfError::Image(e.to_string()))?;

    Ok(RasterImage { png, width, height })
}
