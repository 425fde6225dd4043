// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text encoding for the standard Helvetica font.

/// Average Helvetica advance width as a fraction of the font size.
const AVG_GLYPH_WIDTH_EM: f32 = 0.5;

/// WinAnsi codes 0x80..=0x9F. `None` marks the five unassigned codes.
const HIGH_CODES: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

/// Text encoded for a WinAnsi simple font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodedText {
    pub bytes: Vec<u8>,
    /// Characters that had no WinAnsi code and were written as `?`.
    pub replaced: usize,
}

fn code_for(ch: char) -> Option<u8> {
    match ch as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => Some(code as u8),
        _ => HIGH_CODES
            .iter()
            .position(|&mapped| mapped == Some(ch))
            .map(|index| 0x80 + index as u8),
    }
}

/// Encode `text` as single-byte WinAnsi.
///
/// Printable ASCII and U+00A0–U+00FF keep their code point as the byte. The
/// typographic characters WinAnsi places at 0x80–0x9F (curly quotes, dashes,
/// bullet, euro sign and the like) map through its table. Anything else
/// becomes `?`.
pub(crate) fn encode(text: &str) -> EncodedText {
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = 0;
    for ch in text.chars() {
        match code_for(ch) {
            Some(byte) => bytes.push(byte),
            None => {
                bytes.push(b'?');
                replaced += 1;
            }
        }
    }
    EncodedText { bytes, replaced }
}

/// Decode WinAnsi bytes. Unassigned codes fall back to their Latin-1 reading.
pub(crate) fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| match byte {
            0x80..=0x9F => HIGH_CODES[usize::from(byte - 0x80)].unwrap_or(byte as char),
            _ => byte as char,
        })
        .collect()
}

/// Estimated rendered width, in points, of `glyphs` encoded glyphs.
pub(crate) fn estimated_width(glyphs: usize, font_size: f32) -> f32 {
    glyphs as f32 * AVG_GLYPH_WIDTH_EM * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let encoded = encode("http://a.example/x?y=(1)");
        assert_eq!(encoded.bytes, b"http://a.example/x?y=(1)");
        assert_eq!(encoded.replaced, 0);
    }

    #[test]
    fn latin1_maps_to_single_bytes() {
        let encoded = encode("café");
        assert_eq!(encoded.bytes, [b'c', b'a', b'f', 0xE9]);
        assert_eq!(encoded.replaced, 0);
    }

    #[test]
    fn typographic_characters_use_the_high_table() {
        let encoded = encode("’“”–—€•");
        assert_eq!(encoded.bytes, [0x92, 0x93, 0x94, 0x96, 0x97, 0x80, 0x95]);
        assert_eq!(encoded.replaced, 0);
    }

    #[test]
    fn c1_control_characters_are_replaced() {
        let encoded = encode("a\u{0081}b\u{0092}");
        assert_eq!(encoded.bytes, b"a?b?");
        assert_eq!(encoded.replaced, 2);
    }

    #[test]
    fn unmappable_characters_are_replaced() {
        let encoded = encode("a→b日");
        assert_eq!(encoded.bytes, b"a?b?");
        assert_eq!(encoded.replaced, 2);
    }

    #[test]
    fn decode_reverses_encode() {
        let text = "“Notes” – café € 5 • ok";
        assert_eq!(decode(&encode(text).bytes), text);
    }

    #[test]
    fn width_scales_with_size() {
        assert_eq!(estimated_width(10, 12.0), 60.0);
        assert_eq!(estimated_width(0, 12.0), 0.0);
    }
}
