mod layout;
mod watermark;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{FontSet, to_winansi_bytes};
use crate::markdown::parse_inline;
use crate::model::{HeadingKind, LayoutBlock, RenderableDocument, Span};

use layout::{Alignment, TextLine, build_lines, render_lines};
use watermark::{EmbeddedImage, PdfCanvas, embed_images};

pub use watermark::{
    DecorationSlot, DrawAttempt, PageCanvas, PageDecoration, PageWatermarkState, Watermarker,
};

pub const PAGE_WIDTH: f32 = 612.0; // US Letter
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN_X: f32 = 54.0; // 0.75 in
pub const MARGIN_Y: f32 = 64.8; // 0.9 in

const BULLET_INDENT: f32 = 20.0;
const BULLET_FONT_SIZE: f32 = 10.0;
const ASCENDER_RATIO: f32 = 0.75;

struct BlockStyle {
    font_size: f32,
    leading: f32,
    color: [u8; 3],
    bold: bool,
    alignment: Alignment,
    space_before: f32,
    space_after: f32,
}

const TITLE: BlockStyle = BlockStyle {
    font_size: 24.0,
    leading: 28.0,
    color: [0x1f, 0x29, 0x33],
    bold: true,
    alignment: Alignment::Center,
    space_before: 0.0,
    space_after: 6.0,
};

const SUBTITLE: BlockStyle = BlockStyle {
    font_size: 11.0,
    leading: 15.0,
    color: [0x4b, 0x55, 0x63],
    bold: false,
    alignment: Alignment::Center,
    space_before: 0.0,
    space_after: 8.0,
};

const DAY_HEADER: BlockStyle = BlockStyle {
    font_size: 16.0,
    leading: 20.0,
    color: [0x25, 0x63, 0xeb],
    bold: true,
    alignment: Alignment::Left,
    space_before: 16.0,
    space_after: 12.0,
};

const AIRLINE_HEADER: BlockStyle = BlockStyle {
    font_size: 14.0,
    leading: 18.0,
    color: [0x05, 0x96, 0x69],
    bold: true,
    alignment: Alignment::Left,
    space_before: 20.0,
    space_after: 12.0,
};

const SUBHEADING: BlockStyle = BlockStyle {
    font_size: 12.0,
    leading: 16.0,
    color: [0x1f, 0x29, 0x33],
    bold: true,
    alignment: Alignment::Left,
    space_before: 4.0,
    space_after: 8.0,
};

const BODY: BlockStyle = BlockStyle {
    font_size: 10.0,
    leading: 14.0,
    color: [0x37, 0x41, 0x51],
    bold: false,
    alignment: Alignment::Left,
    space_before: 0.0,
    space_after: 6.0,
};

fn styled_spans(text: &str, style: &BlockStyle) -> Vec<Span> {
    let mut spans = parse_inline(text);
    if style.bold {
        for span in &mut spans {
            span.bold = true;
        }
    }
    spans
}

pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub decorations: Vec<PageDecoration>,
}

/// Flows blocks top to bottom, opening a new page (and decorating it) when
/// the next line no longer fits above the bottom margin.
struct Paginator<'a> {
    fonts: &'a FontSet,
    images: &'a [Option<EmbeddedImage>],
    watermarker: Watermarker,
    decorations: Vec<PageDecoration>,
    finished: Vec<Content>,
    current: Content,
    cursor_y: f32,
    at_page_top: bool,
}

impl<'a> Paginator<'a> {
    fn new(fonts: &'a FontSet, images: &'a [Option<EmbeddedImage>]) -> Self {
        let mut paginator = Self {
            fonts,
            images,
            watermarker: Watermarker::new(images.len()),
            decorations: Vec::new(),
            finished: Vec::new(),
            current: Content::new(),
            cursor_y: PAGE_HEIGHT - MARGIN_Y,
            at_page_top: true,
        };
        paginator.decorate_current();
        paginator
    }

    fn decorate_current(&mut self) {
        let mut canvas = PdfCanvas {
            content: &mut self.current,
            images: self.images,
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
        };
        let decoration = self.watermarker.decorate_page(&mut canvas);
        self.decorations.push(decoration);
    }

    fn new_page(&mut self) {
        self.finished
            .push(std::mem::replace(&mut self.current, Content::new()));
        self.cursor_y = PAGE_HEIGHT - MARGIN_Y;
        self.at_page_top = true;
        self.decorate_current();
    }

    fn remaining(&self) -> f32 {
        self.cursor_y - MARGIN_Y
    }

    fn spacer(&mut self, height: f32) {
        if height > self.remaining() {
            self.new_page();
        } else {
            self.cursor_y -= height;
        }
    }

    fn space_before(&mut self, space: f32) {
        // Dropped at the top of a page.
        if !self.at_page_top {
            self.cursor_y -= space.min(self.remaining());
        }
    }

    /// Place wrapped lines, splitting across pages as needed.
    fn lines(
        &mut self,
        lines: &[TextLine],
        style: &BlockStyle,
        margin_left: f32,
        text_width: f32,
        mut on_first_line: impl FnMut(&mut Content, f32),
    ) {
        let mut rest = lines;
        let mut first = true;
        while !rest.is_empty() {
            let fit = (self.remaining() / style.leading).floor().max(0.0) as usize;
            if fit == 0 {
                if self.at_page_top {
                    // A line taller than the whole frame: place it anyway.
                    self.place(&rest[..1], style, margin_left, text_width, &mut on_first_line, first);
                    rest = &rest[1..];
                    first = false;
                } else {
                    self.new_page();
                }
                continue;
            }
            let n = fit.min(rest.len());
            self.place(&rest[..n], style, margin_left, text_width, &mut on_first_line, first);
            rest = &rest[n..];
            first = false;
            if !rest.is_empty() {
                self.new_page();
            }
        }
    }

    fn place(
        &mut self,
        lines: &[TextLine],
        style: &BlockStyle,
        margin_left: f32,
        text_width: f32,
        on_first_line: &mut impl FnMut(&mut Content, f32),
        first: bool,
    ) {
        let baseline = self.cursor_y - style.font_size * ASCENDER_RATIO;
        if first {
            on_first_line(&mut self.current, baseline);
        }
        render_lines(
            &mut self.current,
            lines,
            style.alignment,
            margin_left,
            text_width,
            baseline,
            style.leading,
            style.font_size,
            style.color,
        );
        self.cursor_y -= lines.len() as f32 * style.leading;
        self.at_page_top = false;
    }

    fn paragraph(&mut self, text: &str, style: &BlockStyle) {
        let text_width = PAGE_WIDTH - 2.0 * MARGIN_X;
        let spans = styled_spans(text, style);
        let lines = build_lines(&spans, self.fonts, style.font_size, text_width);
        if lines.is_empty() {
            return;
        }
        self.space_before(style.space_before);
        self.lines(&lines, style, MARGIN_X, text_width, |_, _| {});
        self.cursor_y -= style.space_after.min(self.remaining().max(0.0));
    }

    fn bullet_item(&mut self, text: &str) {
        let style = &BODY;
        let margin_left = MARGIN_X + BULLET_INDENT;
        let text_width = PAGE_WIDTH - MARGIN_X - margin_left;
        let spans = styled_spans(text, style);
        let lines = build_lines(&spans, self.fonts, style.font_size, text_width);
        if lines.is_empty() {
            return;
        }
        let bullet_font = self.fonts.regular.pdf_name.clone();
        let color = style.color;
        self.lines(&lines, style, margin_left, text_width, |content, baseline| {
            content.set_fill_rgb(
                color[0] as f32 / 255.0,
                color[1] as f32 / 255.0,
                color[2] as f32 / 255.0,
            );
            content.begin_text();
            content.set_font(Name(bullet_font.as_bytes()), BULLET_FONT_SIZE);
            content.next_line(MARGIN_X + BULLET_INDENT / 2.0 - 3.0, baseline);
            content.show(Str(&to_winansi_bytes("\u{2022}")));
            content.end_text();
            content.set_fill_gray(0.0);
        });
        self.cursor_y -= style.space_after.min(self.remaining().max(0.0));
    }

    fn block(&mut self, block: &LayoutBlock) {
        match block {
            LayoutBlock::Spacer(height) => self.spacer(*height),
            LayoutBlock::Title(text) => self.paragraph(text, &TITLE),
            LayoutBlock::Subtitle(text) => self.paragraph(text, &SUBTITLE),
            LayoutBlock::SectionHeading { text, kind } => {
                let style = match kind {
                    HeadingKind::Day => &DAY_HEADER,
                    HeadingKind::Airline => &AIRLINE_HEADER,
                };
                self.paragraph(text, style);
            }
            LayoutBlock::Subheading(text) => self.paragraph(text, &SUBHEADING),
            LayoutBlock::Body(text) => self.paragraph(text, &BODY),
            LayoutBlock::BulletList { items } => {
                for item in items {
                    self.bullet_item(item);
                }
            }
        }
    }

    fn finish(mut self) -> (Vec<Content>, Vec<PageDecoration>) {
        self.finished.push(self.current);
        (self.finished, self.decorations)
    }
}

pub fn render(doc: &RenderableDocument) -> Result<RenderedPdf, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: fonts, images and the two opacity states
    let fonts = FontSet::register(&mut pdf, &mut alloc);
    let images = embed_images(&mut pdf, &mut alloc, &doc.watermark_images);

    let gs_refs: Vec<(&str, Ref)> = if images.is_empty() {
        Vec::new()
    } else {
        let primary = alloc();
        pdf.ext_graphics(primary)
            .non_stroking_alpha(watermark::PRIMARY_OPACITY);
        let secondary = alloc();
        pdf.ext_graphics(secondary)
            .non_stroking_alpha(watermark::SECONDARY_OPACITY);
        vec![
            (watermark::PRIMARY_GS, primary),
            (watermark::SECONDARY_GS, secondary),
        ]
    };

    let t_resources = t0.elapsed();

    // Phase 2: flow blocks onto pages
    let mut paginator = Paginator::new(&fonts, &images);
    for block in &doc.blocks {
        paginator.block(block);
    }
    let (contents, decorations) = paginator.finish();

    let t_layout = t0.elapsed();

    // Phase 3: allocate page and content IDs now that page count is known
    let n = contents.len();
    if n == 0 {
        return Err(Error::Render("layout produced no pages".into()));
    }
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let image_pairs: Vec<(String, Ref)> = images
        .iter()
        .flatten()
        .map(|img| (img.pdf_name.clone(), img.xobj_ref))
        .collect();

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for entry in fonts.entries() {
                font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }
        if !image_pairs.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_pairs {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
        if !gs_refs.is_empty() {
            let mut states = resources.ext_g_states();
            for (name, gs_ref) in &gs_refs {
                states.pair(Name(name.as_bytes()), *gs_ref);
            }
        }
    }

    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: resources={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} pages, {} watermark images)",
        t_resources.as_secs_f64() * 1000.0,
        (t_layout - t_resources).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        n,
        images.iter().flatten().count(),
    );

    Ok(RenderedPdf {
        bytes: pdf.finish(),
        page_count: n,
        decorations,
    })
}
