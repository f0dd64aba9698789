//! PDF assembly on top of the layout planner.
//!
//! Drawing uses the built-in Helvetica faces so no font files are needed at
//! runtime. All positions come from the planner; this module only converts
//! points to millimetres and writes text runs.

use std::io::BufWriter;

use log::debug;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::RenderError;
use crate::layout::{self, HardTruncate, LayoutOptions, LineWrap, RenderProfile};
use crate::model::ReportRecord;

const PT_TO_MM: f64 = 25.4 / 72.0;

/// A finished document, complete and ready for any sink.
///
/// The byte buffer requires no further seeking or rewinding: callers can hand
/// it to a download response or an upload client as-is.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    /// The complete PDF content.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
}

/// Renders `record` with the default hard-truncation line wrap.
///
/// Pure computation over in-memory buffers: no filesystem or network access,
/// no shared state, safe to call concurrently for independent records.
pub fn render(
    record: &ReportRecord,
    profile: &RenderProfile,
    options: &LayoutOptions,
) -> Result<RenderedDocument, RenderError> {
    render_with_wrap(record, profile, options, &HardTruncate::default())
}

/// Renders `record` with a caller-provided line wrap strategy.
pub fn render_with_wrap(
    record: &ReportRecord,
    profile: &RenderProfile,
    options: &LayoutOptions,
    wrap: &dyn LineWrap,
) -> Result<RenderedDocument, RenderError> {
    let pages = layout::plan(record, profile, options, wrap);

    let page_width = Mm(options.page_width * PT_TO_MM);
    let page_height = Mm(options.page_height * PT_TO_MM);
    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("Daily Site Report {}", record.formatted_date()),
        page_width,
        page_height,
        "Page 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(page_width, page_height, format!("Page {}", index + 1));
            doc.get_page(page_index).get_layer(layer_index)
        };

        for line in &page.lines {
            if line.text.is_empty() {
                continue;
            }
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(
                line.text.clone(),
                line.size,
                Mm(line.x * PT_TO_MM),
                Mm(line.y * PT_TO_MM),
                font,
            );
        }
    }

    let page_count = pages.len();
    let mut writer = BufWriter::new(Vec::with_capacity(16 * 1024));
    doc.save(&mut writer)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|err| RenderError::Finalize(err.to_string()))?;

    debug!("rendered {} page(s), {} bytes", page_count, bytes.len());
    Ok(RenderedDocument { bytes, page_count })
}
