use chrono::NaiveDate;

#[derive(Clone, Debug, PartialEq)]
pub struct TripMeta {
    pub source_city: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_count: u32, // inclusive, >= 1
}

/// Generated itinerary text together with the trip it was generated for.
/// Replaced wholesale on every successful generation.
#[derive(Clone, Debug)]
pub struct ItineraryDocument {
    pub raw_text: String,
    pub trip_meta: TripMeta,
}

impl ItineraryDocument {
    pub fn new(raw_text: impl Into<String>, trip_meta: TripMeta) -> Self {
        Self {
            raw_text: raw_text.into(),
            trip_meta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingKind {
    Day,
    Airline,
}

/// One styled unit of the document body. Text keeps its inline `**bold**`
/// markers; they are resolved into spans at render time.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutBlock {
    Title(String),
    Subtitle(String),
    SectionHeading { text: String, kind: HeadingKind },
    Subheading(String),
    BulletList { items: Vec<String> },
    Body(String),
    Spacer(f32), // points
}

/// A run of text with uniform weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn regular(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WatermarkImage {
    pub data: Vec<u8>,
    pub source: String, // where the bytes came from, for logging
}

/// Formatter output: the block sequence plus the images used to decorate pages.
pub struct RenderableDocument {
    pub blocks: Vec<LayoutBlock>,
    pub watermark_images: Vec<WatermarkImage>,
}
