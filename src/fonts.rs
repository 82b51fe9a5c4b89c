use pdf_writer::{Name, Pdf, Ref};

use crate::model::Span;

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) widths_1000: Vec<f32>,
}

impl FontEntry {
    fn byte_width_1000(&self, byte: u8) -> f32 {
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn word_width(&self, word: &str, font_size: f32) -> f32 {
        to_winansi_bytes(word)
            .iter()
            .map(|&b| self.byte_width_1000(b) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.byte_width_1000(b' ') * font_size / 1000.0
    }
}

/// Regular and bold Helvetica, the only faces the itinerary uses.
pub(crate) struct FontSet {
    pub(crate) regular: FontEntry,
    pub(crate) bold: FontEntry,
}

impl FontSet {
    pub(crate) fn register(pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> Self {
        Self {
            regular: register_base_font(pdf, false, "F1".to_string(), alloc),
            bold: register_base_font(pdf, true, "F2".to_string(), alloc),
        }
    }

    pub(crate) fn for_span(&self, span: &Span) -> &FontEntry {
        if span.bold { &self.bold } else { &self.regular }
    }

    pub(crate) fn entries(&self) -> [&FontEntry; 2] {
        [&self.regular, &self.bold]
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Replace characters Helvetica cannot show with a readable ASCII stand-in.
/// Anything else outside WinAnsi (emoji, variation selectors) is dropped later
/// by `to_winansi_bytes`.
pub(crate) fn substitute_unmappable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2192}' => out.push_str("->"),
            '\u{2190}' => out.push_str("<-"),
            '\u{2212}' => out.push('-'),
            '\u{2264}' => out.push_str("<="),
            '\u{2265}' => out.push_str(">="),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase a-z (average)
            0x95 => 350.0,                        // bullet
            _ => 556.0,
        })
        .collect()
}

/// Approximate Helvetica-Bold widths, same layout as `helvetica_widths`.
fn helvetica_bold_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,
            33..=47 => 333.0,
            48..=57 => 556.0,
            58..=64 => 333.0,
            73 => 278.0,
            74 => 556.0,
            77 => 833.0,
            87 => 944.0,                          // W
            65..=90 => 722.0,
            91..=96 => 333.0,
            105 | 106 | 108 => 278.0,             // i j l
            102 | 116 => 333.0,                   // f t
            109 => 889.0,                         // m
            119 => 778.0,                         // w
            97..=122 => 611.0,
            0x95 => 350.0,
            _ => 611.0,
        })
        .collect()
}

pub(crate) fn register_base_font(
    pdf: &mut Pdf,
    bold: bool,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
) -> FontEntry {
    let font_ref = alloc();
    let base_font: &[u8] = if bold { b"Helvetica-Bold" } else { b"Helvetica" };
    pdf.type1_font(font_ref)
        .base_font(Name(base_font))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    log::debug!(
        "register_base_font: {} as {pdf_name}",
        String::from_utf8_lossy(base_font)
    );

    FontEntry {
        pdf_name,
        font_ref,
        widths_1000: if bold {
            helvetica_bold_widths()
        } else {
            helvetica_widths()
        },
    }
}
