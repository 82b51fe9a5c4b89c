use std::io::Cursor;

use pdf_writer::{Content, Filter, Name, Pdf, Ref};

use crate::error::Error;
use crate::model::WatermarkImage;

const INCH: f32 = 72.0;

pub(super) const PRIMARY_GS: &str = "GsWm1";
pub(super) const SECONDARY_GS: &str = "GsWm2";
pub(super) const PRIMARY_OPACITY: f32 = 0.07;
pub(super) const SECONDARY_OPACITY: f32 = 0.05;

/// Page counter shared by every decoration callback of one document build.
#[derive(Debug, Default)]
pub struct PageWatermarkState {
    pub page_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationSlot {
    /// Large, bottom-right.
    Primary,
    /// Smaller, top-left; only used with two or more images.
    Secondary,
}

impl DecorationSlot {
    /// Bounding box `(x, y, width, height)` on a page of the given size.
    pub fn bounds(self, page_width: f32, page_height: f32) -> (f32, f32, f32, f32) {
        match self {
            DecorationSlot::Primary => {
                let side = 3.5 * INCH;
                (page_width - side - 0.5 * INCH, 0.5 * INCH, side, side)
            }
            DecorationSlot::Secondary => {
                let side = 2.5 * INCH;
                (0.5 * INCH, page_height - 3.0 * INCH, side, side)
            }
        }
    }

    fn gs_name(self) -> &'static str {
        match self {
            DecorationSlot::Primary => PRIMARY_GS,
            DecorationSlot::Secondary => SECONDARY_GS,
        }
    }
}

/// Something a page decoration can be drawn onto.
pub trait PageCanvas {
    fn draw_image(&mut self, image_index: usize, slot: DecorationSlot) -> Result<(), Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawAttempt {
    pub image_index: usize,
    pub drawn: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDecoration {
    pub page_index: usize,
    pub primary: Option<DrawAttempt>,
    pub secondary: Option<DrawAttempt>,
}

/// Rotates the available images across pages. One instance per document build.
pub struct Watermarker {
    image_count: usize,
    state: PageWatermarkState,
}

impl Watermarker {
    pub fn new(image_count: usize) -> Self {
        Self {
            image_count,
            state: PageWatermarkState::default(),
        }
    }

    pub fn pages_decorated(&self) -> usize {
        self.state.page_index
    }

    /// Called once at the start of every page, before any text is placed.
    /// Draw failures are logged and leave the page without that decoration.
    pub fn decorate_page(&mut self, canvas: &mut dyn PageCanvas) -> PageDecoration {
        let page_index = self.state.page_index;
        self.state.page_index += 1;

        let mut decoration = PageDecoration {
            page_index,
            primary: None,
            secondary: None,
        };
        if self.image_count == 0 {
            return decoration;
        }

        let primary = page_index % self.image_count;
        decoration.primary = Some(attempt(canvas, primary, DecorationSlot::Primary, page_index));

        if self.image_count > 1 {
            let secondary = (primary + 1) % self.image_count;
            decoration.secondary = Some(attempt(
                canvas,
                secondary,
                DecorationSlot::Secondary,
                page_index,
            ));
        }
        decoration
    }
}

fn attempt(
    canvas: &mut dyn PageCanvas,
    image_index: usize,
    slot: DecorationSlot,
    page_index: usize,
) -> DrawAttempt {
    let drawn = match canvas.draw_image(image_index, slot) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Error adding watermark on page {}: {e}", page_index + 1);
            false
        }
    };
    DrawAttempt { image_index, drawn }
}

/// An image written into the PDF as an XObject.
pub(super) struct EmbeddedImage {
    pub(super) pdf_name: String,
    pub(super) xobj_ref: Ref,
    pub(super) pixel_width: u32,
    pub(super) pixel_height: u32,
}

/// Embed every watermark image up front. Images that cannot be decoded stay
/// `None` so their slot in the rotation fails at draw time.
pub(super) fn embed_images(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    images: &[WatermarkImage],
) -> Vec<Option<EmbeddedImage>> {
    images
        .iter()
        .enumerate()
        .map(|(i, img)| {
            let pdf_name = format!("Im{}", i + 1);
            match embed_image(pdf, alloc, img, pdf_name) {
                Ok(embedded) => Some(embedded),
                Err(e) => {
                    log::warn!("Could not embed watermark image from {}: {e}", img.source);
                    None
                }
            }
        })
        .collect()
}

fn embed_image(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    img: &WatermarkImage,
    pdf_name: String,
) -> Result<EmbeddedImage, Error> {
    let format = image::guess_format(&img.data)?;
    let decoded = image::ImageReader::with_format(Cursor::new(&img.data), format).decode()?;
    let (w, h) = (decoded.width(), decoded.height());
    if w == 0 || h == 0 {
        return Err(Error::Image(format!("{} has no pixels", img.source)));
    }
    let xobj_ref = alloc();

    // Baseline JPEGs pass straight through; everything else is re-encoded.
    let passthrough_gray = matches!(decoded.color(), image::ColorType::L8);
    let passthrough_rgb = matches!(decoded.color(), image::ColorType::Rgb8);
    if format == image::ImageFormat::Jpeg && (passthrough_gray || passthrough_rgb) {
        let mut xobj = pdf.image_xobject(xobj_ref, &img.data);
        xobj.filter(Filter::DctDecode);
        xobj.width(w as i32);
        xobj.height(h as i32);
        if passthrough_gray {
            xobj.color_space().device_gray();
        } else {
            xobj.color_space().device_rgb();
        }
        xobj.bits_per_component(8);
    } else {
        let rgba = decoded.to_rgba8();
        let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
        let rgb_data: Vec<u8> = rgba
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

        let smask_ref = if has_alpha {
            let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
            let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
            let mask_ref = alloc();
            let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
            mask.filter(Filter::FlateDecode);
            mask.width(w as i32);
            mask.height(h as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
            Some(mask_ref)
        } else {
            None
        };

        let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
        xobj.filter(Filter::FlateDecode);
        xobj.width(w as i32);
        xobj.height(h as i32);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        if let Some(mask_ref) = smask_ref {
            xobj.s_mask(mask_ref);
        }
    }

    Ok(EmbeddedImage {
        pdf_name,
        xobj_ref,
        pixel_width: w,
        pixel_height: h,
    })
}

/// Largest rect with the image's aspect ratio that fits the box, centred.
pub(super) fn fit_in_box(
    pixel_width: u32,
    pixel_height: u32,
    (bx, by, bw, bh): (f32, f32, f32, f32),
) -> (f32, f32, f32, f32) {
    let scale = (bw / pixel_width as f32).min(bh / pixel_height as f32);
    let w = pixel_width as f32 * scale;
    let h = pixel_height as f32 * scale;
    (bx + (bw - w) / 2.0, by + (bh - h) / 2.0, w, h)
}

/// Draws decorations into a page's content stream.
pub(super) struct PdfCanvas<'a> {
    pub(super) content: &'a mut Content,
    pub(super) images: &'a [Option<EmbeddedImage>],
    pub(super) page_width: f32,
    pub(super) page_height: f32,
}

impl PageCanvas for PdfCanvas<'_> {
    fn draw_image(&mut self, image_index: usize, slot: DecorationSlot) -> Result<(), Error> {
        let img = self
            .images
            .get(image_index)
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::Image(format!("watermark image {image_index} is not usable")))?;

        let (x, y, w, h) = fit_in_box(
            img.pixel_width,
            img.pixel_height,
            slot.bounds(self.page_width, self.page_height),
        );
        self.content.save_state();
        self.content.set_parameters(Name(slot.gs_name().as_bytes()));
        self.content.transform([w, 0.0, 0.0, h, x, y]);
        self.content.x_object(Name(img.pdf_name.as_bytes()));
        self.content.restore_state();
        Ok(())
    }
}
