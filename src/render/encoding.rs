//! WinAnsi text encoding for the standard Helvetica font.

use super::RenderSkip;

/// The 0x80-0x9F block of WinAnsiEncoding. 0x81, 0x8D, 0x8F, 0x90 and 0x9D
/// are undefined.
const HIGH_BLOCK: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Code point of a character in WinAnsiEncoding.
///
/// Printable ASCII and Latin-1 map to themselves. Everything else comes from
/// the 0x80-0x9F block.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' => Some(ch as u8),
        '\u{A0}'..='\u{FF}' => Some(ch as u32 as u8),
        _ => HIGH_BLOCK
            .iter()
            .find(|(mapped, _)| *mapped == ch)
            .map(|(_, byte)| *byte),
    }
}

/// Encode `text`, failing on the first character WinAnsi cannot represent.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>, RenderSkip> {
    text.chars()
        .map(|ch| win_ansi_byte(ch).ok_or(RenderSkip::UnsupportedGlyph { ch }))
        .collect()
}
