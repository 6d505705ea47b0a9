//! Advance widths and byte encoding for the built-in Helvetica faces.
//!
//! Both faces are used with WinAnsiEncoding, so Latin-1 text maps to its own
//! code point and common typographic punctuation lives in 0x80..=0x9F. Widths
//! are the standard AFM values in 1/1000 em.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    pub fn base_name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"Helvetica",
            Font::Bold => b"Helvetica-Bold",
        }
    }

    /// Name of the font in each page's resource dictionary.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }

    fn metrics(self) -> &'static Metrics {
        match self {
            Font::Regular => &HELVETICA,
            Font::Bold => &HELVETICA_BOLD,
        }
    }
}

/// Name of the predefined encoding both fonts are declared with.
pub const ENCODING: &[u8] = b"WinAnsiEncoding";

pub const BULLET: char = '\u{2022}';
const REPLACEMENT: u8 = b'?';

/// WinAnsi glyphs outside Latin-1: `(char, byte, regular width, bold width)`.
const PUNCTUATION: [(char, u8, u16, u16); 9] = [
    ('\u{20AC}', 0x80, 556, 556),
    ('\u{2026}', 0x85, 1000, 1000),
    ('\u{2018}', 0x91, 222, 278),
    ('\u{2019}', 0x92, 222, 278),
    ('\u{201C}', 0x93, 333, 500),
    ('\u{201D}', 0x94, 333, 500),
    (BULLET, 0x95, 350, 350),
    ('\u{2013}', 0x96, 556, 556),
    ('\u{2014}', 0x97, 1000, 1000),
];

struct Metrics {
    /// 0x20..=0x7E
    ascii: [u16; 95],
    /// 0xA0..=0xFF
    latin1: [u16; 96],
}

#[rustfmt::skip]
static HELVETICA: Metrics = Metrics {
    ascii: [
        278, 278, 355, 556, 556, 889, 667, 222, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        222, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
    ],
    latin1: [
        278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
    ],
};

#[rustfmt::skip]
static HELVETICA_BOLD: Metrics = Metrics {
    ascii: [
        278, 333, 474, 556, 556, 889, 722, 278, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        278, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
    ],
    latin1: [
        278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
        611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
    ],
};

/// Maps one character to the byte the PDF will show.
pub fn encode_char(ch: char) -> u8 {
    match ch {
        ' '..='~' | '\u{A0}'..='\u{FF}' => ch as u8,
        _ => PUNCTUATION
            .iter()
            .find(|(glyph, ..)| *glyph == ch)
            .map_or(REPLACEMENT, |(_, byte, ..)| *byte),
    }
}

pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

fn glyph_units(byte: u8, font: Font) -> u16 {
    let metrics = font.metrics();
    match byte {
        0x20..=0x7E => metrics.ascii[usize::from(byte - 0x20)],
        0xA0..=0xFF => metrics.latin1[usize::from(byte - 0xA0)],
        _ => PUNCTUATION
            .iter()
            .find(|(_, code, ..)| *code == byte)
            .map(|&(_, _, regular, bold)| match font {
                Font::Regular => regular,
                Font::Bold => bold,
            })
            .unwrap_or(metrics.ascii[usize::from(REPLACEMENT - 0x20)]),
    }
}

/// Width of `text` in points when set in `font` at `size`.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|ch| u32::from(glyph_units(encode_char(ch), font)))
        .sum();
    units as f32 * size / 1000.0
}
