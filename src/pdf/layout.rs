use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontSet, substitute_unmappable, to_winansi_bytes};
use crate::model::Span;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Alignment {
    Left,
    Center,
}

pub(super) struct WordChunk {
    pub(super) pdf_font: String,
    pub(super) text: String,
    pub(super) x_offset: f32, // x relative to line start
    pub(super) width: f32,
}

pub(super) struct TextLine {
    pub(super) chunks: Vec<WordChunk>,
    pub(super) total_width: f32,
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    TextLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

/// Layout spans into wrapped lines.
/// No space is inserted between spans unless the preceding text ended with
/// whitespace or the new span starts with whitespace ("**Weather:** Mild"
/// keeps its single space, "**bold**," stays glued to the comma).
pub(super) fn build_lines(
    spans: &[Span],
    fonts: &FontSet,
    font_size: f32,
    max_width: f32,
) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_chunks: Vec<WordChunk> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut prev_ended_with_ws = false;
    let mut prev_space_w: f32 = 0.0;

    for span in spans {
        let entry = fonts.for_span(span);
        let text = substitute_unmappable(&span.text);
        let space_w = entry.space_width(font_size);
        let starts_with_ws = text.starts_with(char::is_whitespace);

        let mut first_word = true;
        for word in text.split_whitespace() {
            // Emoji and other glyphs Helvetica lacks vanish entirely.
            if to_winansi_bytes(word).is_empty() {
                continue;
            }
            let ww = entry.word_width(word, font_size);

            let need_space =
                !current_chunks.is_empty() && (!first_word || starts_with_ws || prev_ended_with_ws);

            // Space belongs to this span unless it trailed the previous one
            let effective_space_w = if !first_word || starts_with_ws {
                space_w
            } else {
                prev_space_w
            };

            let proposed_x = if need_space {
                current_x + effective_space_w
            } else {
                current_x
            };

            if !current_chunks.is_empty() && proposed_x + ww > max_width {
                lines.push(finish_line(&mut current_chunks));
                current_x = 0.0;
            } else {
                current_x = proposed_x;
            }

            current_chunks.push(WordChunk {
                pdf_font: entry.pdf_name.clone(),
                text: word.to_string(),
                x_offset: current_x,
                width: ww,
            });
            current_x += ww;
            first_word = false;
        }

        prev_ended_with_ws = text.ends_with(char::is_whitespace);
        prev_space_w = space_w;
    }

    if !current_chunks.is_empty() {
        lines.push(finish_line(&mut current_chunks));
    }
    lines
}

/// Render pre-built lines starting at `first_baseline_y`, one `line_pitch` apart.
pub(super) fn render_lines(
    content: &mut Content,
    lines: &[TextLine],
    alignment: Alignment,
    margin_left: f32,
    text_width: f32,
    first_baseline_y: f32,
    line_pitch: f32,
    font_size: f32,
    color: [u8; 3],
) {
    if lines.iter().all(|l| l.chunks.is_empty()) {
        return;
    }

    content.set_fill_rgb(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    );
    content.begin_text();
    let mut cur_font_name = String::new();
    let mut td_x = 0.0_f32;
    let mut td_y = 0.0_f32;

    for (line_num, line) in lines.iter().enumerate() {
        let y = first_baseline_y - line_num as f32 * line_pitch;
        let line_start_x = match alignment {
            Alignment::Center => margin_left + (text_width - line.total_width) / 2.0,
            Alignment::Left => margin_left,
        };

        for chunk in &line.chunks {
            let x = line_start_x + chunk.x_offset;
            if cur_font_name != chunk.pdf_font {
                content.set_font(Name(chunk.pdf_font.as_bytes()), font_size);
                cur_font_name.clear();
                cur_font_name.push_str(&chunk.pdf_font);
            }
            content.next_line(x - td_x, y - td_y);
            td_x = x;
            td_y = y;
            content.show(Str(&to_winansi_bytes(&chunk.text)));
        }
    }
    content.end_text();
    content.set_fill_gray(0.0);
}
