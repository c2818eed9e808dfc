//! Server-rendered HTML pages
//!
//! The library index (upload form + document list) and the page viewer
//! shell. The viewer itself is driven by `/static/viewer.js`, which reads
//! the document parameters from `data-*` attributes on `#viewer`.

use html_escape::encode_text as text;

use crate::db::Document;
use crate::flash::Flash;
use crate::pdf::{scale_factor, RENDER_DPI};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f4f5f7; color: #222; }
header { background: #2b3a55; color: #fff; padding: 0.75rem 1.5rem; }
header a { color: #fff; text-decoration: none; }
main { padding: 1.5rem; }
.flash { padding: 0.6rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.flash-success { background: #dff3e3; border: 1px solid #9bd3a7; }
.flash-error { background: #fbe2e2; border: 1px solid #e6a1a1; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #ddd; }
form.inline { display: inline; }
.layout { display: flex; gap: 1.5rem; align-items: flex-start; }
.toolbar { margin-bottom: 0.75rem; display: flex; gap: 0.5rem; align-items: center; flex-wrap: wrap; }
#pdf-container { position: relative; background: #fff; box-shadow: 0 1px 4px rgba(0,0,0,.2); }
#pdf-canvas { display: block; cursor: crosshair; }
#pdf-canvas.loading { opacity: 0.4; }
.coordinate-marker { position: absolute; width: 10px; height: 10px; margin: -5px 0 0 -5px;
  border-radius: 50%; background: rgba(255,0,0,.8); pointer-events: none; z-index: 5; }
.area-marker { position: absolute; border: 2px solid rgba(0,160,0,.8);
  background: rgba(0,255,0,.1); pointer-events: none; z-index: 5; }
aside { width: 22rem; }
.coordinate-item { background: #fff; border: 1px solid #ddd; border-radius: 4px; padding: 0.5rem; margin-bottom: 0.5rem; }
#capture-panel[hidden] { display: none; }
#capture-panel { background: #fff; border: 1px solid #bbb; padding: 0.75rem; margin-bottom: 1rem; }
"#;

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let flash_html = flash
        .map(|f| {
            format!(
                r#"<div class="flash flash-{}">{}</div>"#,
                f.level.as_str(),
                text(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<header><a href="/">PDF Coordinates</a></header>
<main>
{flash_html}
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    )
}

/// Library page: upload form and every stored document, newest first
pub fn index_page(documents: &[Document], flash: Option<&Flash>) -> String {
    let mut body = String::from(
        r#"<section>
<h2>Upload a PDF</h2>
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="file" accept=".pdf,application/pdf" required>
<button type="submit">Upload</button>
</form>
</section>
<section>
<h2>Documents</h2>
"#,
    );

    if documents.is_empty() {
        body.push_str("<p>No documents uploaded yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>File</th><th>Pages</th><th>Size (pt)</th><th>Uploaded</th><th></th></tr>\n",
        );
        for document in documents {
            body.push_str(&format!(
                r#"<tr>
<td><a href="/view/{id}">{name}</a></td>
<td>{pages}</td>
<td>{width:.1} x {height:.1}</td>
<td>{date}</td>
<td><form class="inline" action="/delete/{id}" method="post" onsubmit="return confirm('Delete this document and all of its coordinates?');"><button type="submit">Delete</button></form></td>
</tr>
"#,
                id = document.id,
                name = text(&document.original_filename),
                pages = document.page_count,
                width = document.original_width,
                height = document.original_height,
                date = text(&document.upload_date),
            ));
        }
        body.push_str("</table>\n");
    }
    body.push_str("</section>\n");

    layout("PDF Coordinates", flash, &body)
}

/// Viewer shell for one document
pub fn viewer_page(document: &Document, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<h2>{name}</h2>
<div id="viewer"
     data-document-id="{id}"
     data-total-pages="{pages}"
     data-original-width="{width}"
     data-original-height="{height}">
<div class="toolbar">
<button id="prev-page" type="button">&larr;</button>
<label>Page <input id="current-page" type="number" min="1" max="{pages}" value="1"> of {pages}</label>
<button id="next-page" type="button">&rarr;</button>
<button id="zoom-out" type="button">-</button>
<input id="zoom-slider" type="range" min="0.25" max="3" step="0.25" value="1">
<button id="zoom-in" type="button">+</button>
<span id="zoom-display">100%</span>
<span>DPI <span id="dpi-info">{dpi}</span>, scale <span id="scale-factor">{scale:.2}</span></span>
<span>screen (<span id="mouse-x">0</span>, <span id="mouse-y">0</span>)
pdf (<span id="pdf-x">0.00</span>, <span id="pdf-y">0.00</span>)</span>
</div>
<div class="layout">
<div id="pdf-container"><canvas id="pdf-canvas"></canvas></div>
<aside>
<div id="capture-panel" hidden>
<div id="capture-summary"></div>
<input id="coordinate-description" type="text" placeholder="Description (optional)">
<button id="save-coordinate" type="button">Save</button>
<button id="cancel-coordinate" type="button">Cancel</button>
</div>
<div class="toolbar">
<strong>Coordinates on this page</strong>
<button id="clear-coordinates" type="button">Clear page</button>
</div>
<div id="coordinates-list"></div>
</aside>
</div>
</div>
<script src="/static/viewer.js"></script>
"#,
        name = text(&document.original_filename),
        id = document.id,
        pages = document.page_count,
        width = document.original_width,
        height = document.original_height,
        dpi = RENDER_DPI,
        scale = scale_factor(RENDER_DPI),
    );

    let title = format!("{} - PDF Coordinates", document.original_filename);
    layout(&title, flash, &body)
}
