use crate::model::{
    HeadingKind, LayoutBlock, RenderableDocument, Span, TripMeta, WatermarkImage,
};
use crate::trip::display_date;

const INCH: f32 = 72.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontMatterLabel {
    TravelDates,
    ExpectedTemperature,
    Weather,
    WhatToWear,
}

impl FrontMatterLabel {
    pub const ALL: [FrontMatterLabel; 4] = [
        FrontMatterLabel::TravelDates,
        FrontMatterLabel::ExpectedTemperature,
        FrontMatterLabel::Weather,
        FrontMatterLabel::WhatToWear,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            FrontMatterLabel::TravelDates => "**Travel Dates:**",
            FrontMatterLabel::ExpectedTemperature => "**Expected Temperature:**",
            FrontMatterLabel::Weather => "**Weather:**",
            FrontMatterLabel::WhatToWear => "**What to Wear:**",
        }
    }

    /// Label of a trimmed line, if it is a front-matter line.
    pub fn of_line(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| line.starts_with(l.prefix()))
    }
}

/// Result of the metadata pass over the raw text. Both lists hold trimmed,
/// non-blank lines in source order.
#[derive(Debug, Default)]
pub struct Extracted<'a> {
    pub front_matter: Vec<&'a str>,
    pub body: Vec<&'a str>,
}

/// Section starts are `##` headers; a lone `#` title or `#1` is not one.
fn is_heading(line: &str) -> bool {
    line.starts_with("##")
}

fn heading_text(line: &str) -> &str {
    line.trim_start_matches('#').trim()
}

fn is_airline_indicator(line: &str) -> bool {
    line.contains('\u{2708}') || line.to_lowercase().contains("airline")
}

fn is_subheading(line: &str) -> bool {
    line.len() >= 4 && line.starts_with("**") && line.ends_with("**")
}

/// `---`, `***`, `___` and longer runs.
fn is_thematic_break(line: &str) -> bool {
    let mut chars = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = chars.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_')
        && line.chars().filter(|c| !c.is_whitespace()).count() >= 3
        && chars.all(|c| c == first)
}

fn bullet_item(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("* ") {
        return Some(rest.trim());
    }
    line.strip_prefix('-')
        .or_else(|| line.strip_prefix('\u{2022}'))
        .map(str::trim)
}

/// Phase 1: split the raw text into hoisted front-matter and the body stream.
///
/// Front-matter lines are only collected before the first heading, and each
/// label at most once. They never reach the body, wherever they appear.
pub fn extract_front_matter(raw_text: &str) -> Extracted<'_> {
    let mut out = Extracted::default();
    let mut seen: Vec<FrontMatterLabel> = Vec::new();
    let mut in_sections = false;

    for line in raw_text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if let Some(label) = FrontMatterLabel::of_line(line) {
            if !in_sections && !seen.contains(&label) {
                seen.push(label);
                out.front_matter.push(line);
            } else {
                log::debug!("Dropping repeated front-matter line: {line}");
            }
            continue;
        }
        if is_heading(line) {
            in_sections = true;
        }
        out.body.push(line);
    }
    out
}

/// Phase 2: title area. Falls back to the trip metadata when the generated
/// text carried no front-matter at all.
pub fn title_blocks(front_matter: &[&str], meta: &TripMeta) -> Vec<LayoutBlock> {
    let mut blocks = vec![
        LayoutBlock::Spacer(0.5 * INCH),
        LayoutBlock::Title("Travel Itinerary".to_string()),
        LayoutBlock::Spacer(0.1 * INCH),
        LayoutBlock::Title(format!("{} \u{2192} {}", meta.source_city, meta.destination)),
        LayoutBlock::Spacer(0.3 * INCH),
    ];

    if front_matter.is_empty() {
        blocks.push(LayoutBlock::Subtitle(format!(
            "**Travel Dates:** {} - {}",
            display_date(meta.start_date),
            display_date(meta.end_date)
        )));
        let plural = if meta.day_count != 1 { "s" } else { "" };
        blocks.push(LayoutBlock::Subtitle(format!(
            "**Duration:** {} day{plural}",
            meta.day_count
        )));
    } else {
        blocks.extend(
            front_matter
                .iter()
                .map(|line| LayoutBlock::Subtitle(line.to_string())),
        );
    }

    blocks.push(LayoutBlock::Spacer(0.4 * INCH));
    blocks.push(LayoutBlock::Spacer(12.0));
    blocks
}

struct BodyBuilder {
    blocks: Vec<LayoutBlock>,
    pending_bullets: Vec<String>,
    // Once the airline section starts, every later heading belongs to it.
    in_airline_section: bool,
}

impl BodyBuilder {
    fn flush_bullets(&mut self) {
        if !self.pending_bullets.is_empty() {
            self.blocks.push(LayoutBlock::BulletList {
                items: std::mem::take(&mut self.pending_bullets),
            });
        }
    }

    fn push_line(&mut self, line: &str) {
        if FrontMatterLabel::of_line(line).is_some() || is_thematic_break(line) {
            return;
        }

        if is_airline_indicator(line) {
            self.in_airline_section = true;
        }

        if is_heading(line) {
            self.flush_bullets();
            let kind = if self.in_airline_section {
                HeadingKind::Airline
            } else {
                HeadingKind::Day
            };
            self.blocks.push(LayoutBlock::Spacer(8.0));
            self.blocks.push(LayoutBlock::SectionHeading {
                text: heading_text(line).to_string(),
                kind,
            });
        } else if is_subheading(line) {
            self.flush_bullets();
            self.blocks.push(LayoutBlock::Subheading(line.to_string()));
        } else if let Some(item) = bullet_item(line) {
            if !item.is_empty() {
                self.pending_bullets.push(item.to_string());
            }
        } else {
            self.flush_bullets();
            self.blocks.push(LayoutBlock::Body(line.to_string()));
        }
    }
}

/// Phase 3: turn the body stream into blocks, grouping consecutive bullet
/// lines into a single list.
pub fn body_blocks(lines: &[&str]) -> Vec<LayoutBlock> {
    let mut builder = BodyBuilder {
        blocks: Vec::new(),
        pending_bullets: Vec::new(),
        in_airline_section: false,
    };
    for line in lines {
        let line = line.trim();
        if !line.is_empty() {
            builder.push_line(line);
        }
    }
    builder.flush_bullets();
    builder.blocks
}

pub fn format_blocks(raw_text: &str, meta: &TripMeta) -> Vec<LayoutBlock> {
    let extracted = extract_front_matter(raw_text);
    let mut blocks = title_blocks(&extracted.front_matter, meta);
    blocks.extend(body_blocks(&extracted.body));
    blocks
}

pub fn format(
    raw_text: &str,
    meta: &TripMeta,
    watermark_images: Vec<WatermarkImage>,
) -> RenderableDocument {
    RenderableDocument {
        blocks: format_blocks(raw_text, meta),
        watermark_images,
    }
}

/// Split `**bold**` markup into spans. An unpaired trailing marker is kept
/// as literal text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut parts: Vec<String> = text.split("**").map(str::to_string).collect();
    if parts.len() % 2 == 0
        && let Some(last) = parts.pop()
        && let Some(prev) = parts.last_mut()
    {
        prev.push_str("**");
        prev.push_str(&last);
    }

    parts
        .into_iter()
        .enumerate()
        .filter(|(_, p)| !p.is_empty())
        .map(|(i, p)| Span {
            text: p,
            bold: i % 2 == 1,
        })
        .collect()
}
