mod error;
mod fonts;
pub mod generate;
pub mod images;
pub mod markdown;
mod model;
pub mod pdf;
pub mod session;
pub mod trip;

pub use error::Error;
pub use model::{
    HeadingKind, ItineraryDocument, LayoutBlock, RenderableDocument, Span, TripMeta,
    WatermarkImage,
};

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, NaiveDateTime};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A finished export, ready to be offered as a download.
pub struct ExportedDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// `travel_plan_<destination>_<YYYYmmdd_HHMMSS>.pdf`
pub fn export_file_name(destination: &str, generated_at: NaiveDateTime) -> String {
    let dest: String = destination
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!(
        "travel_plan_{dest}_{}.pdf",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn export_itinerary(
    doc: &ItineraryDocument,
    watermark_images: Vec<WatermarkImage>,
) -> Result<ExportedDocument, Error> {
    let t0 = Instant::now();

    let renderable = markdown::format(&doc.raw_text, &doc.trip_meta, watermark_images);
    let t_format = t0.elapsed();

    let rendered = pdf::render(&renderable)?;
    let t_render = t0.elapsed();

    log::info!(
        "Timing: format={:.1}ms, render={:.1}ms ({} blocks, {} pages, output {} bytes)",
        t_format.as_secs_f64() * 1000.0,
        (t_render - t_format).as_secs_f64() * 1000.0,
        renderable.blocks.len(),
        rendered.page_count,
        rendered.bytes.len(),
    );

    Ok(ExportedDocument {
        file_name: export_file_name(
            &doc.trip_meta.destination,
            Local::now().naive_local(),
        ),
        mime_type: PDF_MIME_TYPE,
        bytes: rendered.bytes,
        page_count: rendered.page_count,
    })
}

/// Write an export into `out_dir` under its generated file name.
pub fn save_export(exported: &ExportedDocument, out_dir: &Path) -> Result<PathBuf, Error> {
    let t0 = Instant::now();
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&exported.file_name);
    std::fs::write(&path, &exported.bytes)?;
    log::info!(
        "Wrote {} in {:.1}ms",
        path.display(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(path)
}
