// Pipeline module - drives placement and rendering across pages
//
// Placement for every selected page is computed in parallel (each run owns
// its generator); the finished instance lists are then drawn sequentially
// onto the shared document.

use lopdf::{Document, ObjectId};
use rayon::prelude::*;
use std::path::Path;

use crate::config::{PageSelection, PreviewConfig};
use crate::error::GuardmarkError;
use crate::render::document::effective_media_box;
use crate::render::{render_instances, DocumentCanvas, PreviewSurface, RenderReport};
use crate::watermark::{
    place_with_limits, Page, Placement, PlacementLimits, WatermarkConfig, WatermarkError,
};

/// Summary of a stamping run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampReport {
    pub pages_total: usize,
    pub pages_stamped: usize,
    pub instances_drawn: usize,
    pub instances_skipped: usize,
    /// Pages whose placement hit the instance limit
    pub pages_truncated: usize,
}

/// One selected page of a document.
struct PageJob {
    number: u32,
    id: ObjectId,
    origin: (f64, f64),
    page: Page,
}

/// Place marks on `page` keeping `margin` free on every side.
///
/// The engine sees the inset page; the resulting instances are translated
/// back into full-page coordinates. A page with nothing left inside the
/// margin yields no instances.
pub fn place_with_margin(
    config: &WatermarkConfig,
    page: &Page,
    margin: f64,
) -> Result<Placement, WatermarkError> {
    page.validate()?;
    if margin <= 0.0 {
        return place_with_limits(config, page, &PlacementLimits::default());
    }

    let Some(inner) = page.inset(margin) else {
        config.validate()?;
        return Ok(Placement {
            instances: Vec::new(),
            truncated: false,
        });
    };

    let mut placement = place_with_limits(config, &inner, &PlacementLimits::default())?;
    for instance in &mut placement.instances {
        instance.x += margin;
        instance.y += margin;
    }
    Ok(placement)
}

/// Stamp the selected pages of `doc`.
pub fn stamp_document(
    doc: &mut Document,
    config: &WatermarkConfig,
    selection: &PageSelection,
) -> Result<StampReport, GuardmarkError> {
    config.checked()?;
    selection.validate().map_err(GuardmarkError::Config)?;

    let pages = doc.get_pages();
    let mut report = StampReport {
        pages_total: pages.len(),
        ..StampReport::default()
    };

    let mut jobs = Vec::new();
    for (number, id) in pages {
        if !selection.includes(number) {
            continue;
        }
        let (llx, lly, urx, ury) = effective_media_box(doc, id).ok_or_else(|| {
            WatermarkError::Document(format!("page {} has no usable MediaBox", number))
        })?;
        jobs.push(PageJob {
            number,
            id,
            origin: (llx, lly),
            page: Page::new(urx - llx, ury - lly)?,
        });
    }

    let placements: Vec<Placement> = jobs
        .par_iter()
        .map(|job| place_with_margin(config, &job.page, selection.margin))
        .collect::<Result<_, _>>()?;

    let font_id = DocumentCanvas::add_font(doc);

    for (job, placement) in jobs.iter().zip(placements) {
        let mut canvas = DocumentCanvas::with_origin(&job.page, job.origin.0, job.origin.1);
        let rendered = render_instances(&mut canvas, &placement.instances);
        canvas.install(doc, job.id, font_id)?;

        tracing::info!(
            page = job.number,
            width = job.page.width,
            height = job.page.height,
            drawn = rendered.drawn.len(),
            skipped = rendered.skipped.len(),
            "Page stamped"
        );

        report.pages_stamped += 1;
        report.instances_drawn += rendered.drawn.len();
        report.instances_skipped += rendered.skipped.len();
        if placement.truncated {
            report.pages_truncated += 1;
        }
    }

    Ok(report)
}

/// Load a PDF, stamp it and write the result.
pub fn stamp_file(
    input: &Path,
    output: &Path,
    config: &WatermarkConfig,
    selection: &PageSelection,
) -> Result<StampReport, GuardmarkError> {
    let mut doc = Document::load(input)?;
    let report = stamp_document(&mut doc, config, selection)?;
    doc.save(output)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        pages = report.pages_stamped,
        instances = report.instances_drawn,
        "Document written"
    );
    Ok(report)
}

/// Render a preview of one page.
pub fn render_preview(
    config: &WatermarkConfig,
    page: &Page,
    margin: f64,
    preview: &PreviewConfig,
) -> Result<(PreviewSurface, RenderReport), GuardmarkError> {
    preview.validate().map_err(GuardmarkError::Config)?;

    let placement = place_with_margin(config, page, margin)?;
    let mut surface = PreviewSurface::new(page, preview.scale, preview.background)?;
    let report = render_instances(&mut surface, &placement.instances);

    tracing::info!(
        width = surface.image().width(),
        height = surface.image().height(),
        drawn = report.drawn.len(),
        skipped = report.skipped.len(),
        "Preview rendered"
    );
    Ok((surface, report))
}

/// Render a preview of one page and write it to `path` as PNG.
pub fn write_preview(
    config: &WatermarkConfig,
    page: &Page,
    margin: f64,
    preview: &PreviewConfig,
    path: &Path,
) -> Result<RenderReport, GuardmarkError> {
    let (surface, report) = render_preview(config, page, margin, preview)?;
    surface.save_png(path)?;

    tracing::info!(path = %path.display(), "Preview written");
    Ok(report)
}
