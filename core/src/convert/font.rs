//! Built-in 6x12 glyph table for the printable ASCII range.
//!
//! Each glyph is twelve 6-bit row masks, bit 5 = leftmost pixel, the
//! same bit order as tile-packet row masks. Caps sit on the baseline at
//! row 9; descenders use rows 10-11. Characters outside 0x20..=0x7E
//! render as the fallback box.

use crate::vram::{Block, TILE_HEIGHT, TILE_WIDTH};

pub const GLYPH_WIDTH: usize = TILE_WIDTH;
pub const GLYPH_HEIGHT: usize = TILE_HEIGHT;

/// Row masks for ASCII 0x20..=0x7F, in code order.
#[rustfmt::skip]
const GLYPHS: [[u8; GLYPH_HEIGHT]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x08, 0x00, 0x00], // '!'
    [0x00, 0x00, 0x14, 0x14, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '"'
    [0x00, 0x00, 0x14, 0x14, 0x3E, 0x14, 0x14, 0x3E, 0x14, 0x14, 0x00, 0x00], // '#'
    [0x00, 0x00, 0x08, 0x1E, 0x28, 0x1C, 0x0A, 0x3C, 0x08, 0x00, 0x00, 0x00], // '$'
    [0x00, 0x00, 0x30, 0x32, 0x04, 0x08, 0x10, 0x26, 0x06, 0x00, 0x00, 0x00], // '%'
    [0x00, 0x00, 0x10, 0x28, 0x28, 0x10, 0x2A, 0x24, 0x1A, 0x00, 0x00, 0x00], // '&'
    [0x00, 0x00, 0x08, 0x08, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '\''
    [0x00, 0x00, 0x04, 0x08, 0x10, 0x10, 0x10, 0x10, 0x08, 0x04, 0x00, 0x00], // '('
    [0x00, 0x00, 0x10, 0x08, 0x04, 0x04, 0x04, 0x04, 0x08, 0x10, 0x00, 0x00], // ')'
    [0x00, 0x00, 0x00, 0x08, 0x2A, 0x1C, 0x2A, 0x08, 0x00, 0x00, 0x00, 0x00], // '*'
    [0x00, 0x00, 0x00, 0x08, 0x08, 0x3E, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00], // '+'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x08, 0x10], // ','
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x3E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '-'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00, 0x00], // '.'
    [0x00, 0x00, 0x02, 0x02, 0x04, 0x08, 0x10, 0x20, 0x20, 0x00, 0x00, 0x00], // '/'
    [0x00, 0x00, 0x1C, 0x22, 0x26, 0x2A, 0x32, 0x22, 0x22, 0x1C, 0x00, 0x00], // '0'
    [0x00, 0x00, 0x08, 0x18, 0x08, 0x08, 0x08, 0x08, 0x08, 0x1C, 0x00, 0x00], // '1'
    [0x00, 0x00, 0x1C, 0x22, 0x02, 0x04, 0x08, 0x10, 0x20, 0x3E, 0x00, 0x00], // '2'
    [0x00, 0x00, 0x1C, 0x22, 0x02, 0x0C, 0x02, 0x02, 0x22, 0x1C, 0x00, 0x00], // '3'
    [0x00, 0x00, 0x04, 0x0C, 0x14, 0x24, 0x3E, 0x04, 0x04, 0x04, 0x00, 0x00], // '4'
    [0x00, 0x00, 0x3E, 0x20, 0x20, 0x3C, 0x02, 0x02, 0x22, 0x1C, 0x00, 0x00], // '5'
    [0x00, 0x00, 0x0C, 0x10, 0x20, 0x3C, 0x22, 0x22, 0x22, 0x1C, 0x00, 0x00], // '6'
    [0x00, 0x00, 0x3E, 0x02, 0x04, 0x04, 0x08, 0x08, 0x10, 0x10, 0x00, 0x00], // '7'
    [0x00, 0x00, 0x1C, 0x22, 0x22, 0x1C, 0x22, 0x22, 0x22, 0x1C, 0x00, 0x00], // '8'
    [0x00, 0x00, 0x1C, 0x22, 0x22, 0x1E, 0x02, 0x02, 0x04, 0x18, 0x00, 0x00], // '9'
    [0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x00, 0x00, 0x00], // ':'
    [0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x08, 0x10, 0x00], // ';'
    [0x00, 0x00, 0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02, 0x00, 0x00, 0x00], // '<'
    [0x00, 0x00, 0x00, 0x00, 0x3E, 0x00, 0x3E, 0x00, 0x00, 0x00, 0x00, 0x00], // '='
    [0x00, 0x00, 0x10, 0x08, 0x04, 0x02, 0x04, 0x08, 0x10, 0x00, 0x00, 0x00], // '>'
    [0x00, 0x00, 0x1C, 0x22, 0x02, 0x04, 0x08, 0x08, 0x00, 0x08, 0x00, 0x00], // '?'
    [0x00, 0x00, 0x1C, 0x22, 0x2E, 0x2A, 0x2E, 0x20, 0x20, 0x1E, 0x00, 0x00], // '@'
    [0x00, 0x00, 0x08, 0x14, 0x22, 0x22, 0x3E, 0x22, 0x22, 0x22, 0x00, 0x00], // 'A'
    [0x00, 0x00, 0x3C, 0x22, 0x22, 0x3C, 0x22, 0x22, 0x22, 0x3C, 0x00, 0x00], // 'B'
    [0x00, 0x00, 0x1C, 0x22, 0x20, 0x20, 0x20, 0x20, 0x22, 0x1C, 0x00, 0x00], // 'C'
    [0x00, 0x00, 0x38, 0x24, 0x22, 0x22, 0x22, 0x22, 0x24, 0x38, 0x00, 0x00], // 'D'
    [0x00, 0x00, 0x3E, 0x20, 0x20, 0x3C, 0x20, 0x20, 0x20, 0x3E, 0x00, 0x00], // 'E'
    [0x00, 0x00, 0x3E, 0x20, 0x20, 0x3C, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00], // 'F'
    [0x00, 0x00, 0x1C, 0x22, 0x20, 0x20, 0x26, 0x22, 0x22, 0x1E, 0x00, 0x00], // 'G'
    [0x00, 0x00, 0x22, 0x22, 0x22, 0x3E, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00], // 'H'
    [0x00, 0x00, 0x1C, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x1C, 0x00, 0x00], // 'I'
    [0x00, 0x00, 0x0E, 0x04, 0x04, 0x04, 0x04, 0x24, 0x24, 0x18, 0x00, 0x00], // 'J'
    [0x00, 0x00, 0x22, 0x24, 0x28, 0x30, 0x28, 0x24, 0x22, 0x22, 0x00, 0x00], // 'K'
    [0x00, 0x00, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x3E, 0x00, 0x00], // 'L'
    [0x00, 0x00, 0x22, 0x36, 0x2A, 0x2A, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00], // 'M'
    [0x00, 0x00, 0x22, 0x32, 0x2A, 0x26, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00], // 'N'
    [0x00, 0x00, 0x1C, 0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x1C, 0x00, 0x00], // 'O'
    [0x00, 0x00, 0x3C, 0x22, 0x22, 0x3C, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00], // 'P'
    [0x00, 0x00, 0x1C, 0x22, 0x22, 0x22, 0x22, 0x2A, 0x24, 0x1A, 0x00, 0x00], // 'Q'
    [0x00, 0x00, 0x3C, 0x22, 0x22, 0x3C, 0x28, 0x24, 0x22, 0x22, 0x00, 0x00], // 'R'
    [0x00, 0x00, 0x1C, 0x22, 0x20, 0x1C, 0x02, 0x02, 0x22, 0x1C, 0x00, 0x00], // 'S'
    [0x00, 0x00, 0x3E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00], // 'T'
    [0x00, 0x00, 0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x1C, 0x00, 0x00], // 'U'
    [0x00, 0x00, 0x22, 0x22, 0x22, 0x22, 0x22, 0x14, 0x14, 0x08, 0x00, 0x00], // 'V'
    [0x00, 0x00, 0x22, 0x22, 0x22, 0x2A, 0x2A, 0x2A, 0x36, 0x22, 0x00, 0x00], // 'W'
    [0x00, 0x00, 0x22, 0x22, 0x14, 0x08, 0x08, 0x14, 0x22, 0x22, 0x00, 0x00], // 'X'
    [0x00, 0x00, 0x22, 0x22, 0x14, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00], // 'Y'
    [0x00, 0x00, 0x3E, 0x02, 0x04, 0x08, 0x10, 0x20, 0x20, 0x3E, 0x00, 0x00], // 'Z'
    [0x00, 0x00, 0x1C, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1C, 0x00, 0x00], // '['
    [0x00, 0x00, 0x20, 0x20, 0x10, 0x08, 0x04, 0x02, 0x02, 0x00, 0x00, 0x00], // '\\'
    [0x00, 0x00, 0x1C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x1C, 0x00, 0x00], // ']'
    [0x00, 0x00, 0x08, 0x14, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '^'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3E, 0x00], // '_'
    [0x00, 0x00, 0x10, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '`'
    [0x00, 0x00, 0x00, 0x00, 0x1C, 0x02, 0x1E, 0x22, 0x22, 0x1E, 0x00, 0x00], // 'a'
    [0x00, 0x00, 0x20, 0x20, 0x3C, 0x22, 0x22, 0x22, 0x22, 0x3C, 0x00, 0x00], // 'b'
    [0x00, 0x00, 0x00, 0x00, 0x1C, 0x22, 0x20, 0x20, 0x22, 0x1C, 0x00, 0x00], // 'c'
    [0x00, 0x00, 0x02, 0x02, 0x1E, 0x22, 0x22, 0x22, 0x22, 0x1E, 0x00, 0x00], // 'd'
    [0x00, 0x00, 0x00, 0x00, 0x1C, 0x22, 0x3E, 0x20, 0x22, 0x1C, 0x00, 0x00], // 'e'
    [0x00, 0x00, 0x0C, 0x12, 0x10, 0x3C, 0x10, 0x10, 0x10, 0x10, 0x00, 0x00], // 'f'
    [0x00, 0x00, 0x00, 0x00, 0x1E, 0x22, 0x22, 0x22, 0x1E, 0x02, 0x22, 0x1C], // 'g'
    [0x00, 0x00, 0x20, 0x20, 0x3C, 0x22, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00], // 'h'
    [0x00, 0x00, 0x08, 0x00, 0x18, 0x08, 0x08, 0x08, 0x08, 0x1C, 0x00, 0x00], // 'i'
    [0x00, 0x00, 0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x24, 0x24, 0x18], // 'j'
    [0x00, 0x00, 0x20, 0x20, 0x22, 0x24, 0x38, 0x28, 0x24, 0x22, 0x00, 0x00], // 'k'
    [0x00, 0x00, 0x18, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x1C, 0x00, 0x00], // 'l'
    [0x00, 0x00, 0x00, 0x00, 0x34, 0x2A, 0x2A, 0x2A, 0x2A, 0x2A, 0x00, 0x00], // 'm'
    [0x00, 0x00, 0x00, 0x00, 0x3C, 0x22, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00], // 'n'
    [0x00, 0x00, 0x00, 0x00, 0x1C, 0x22, 0x22, 0x22, 0x22, 0x1C, 0x00, 0x00], // 'o'
    [0x00, 0x00, 0x00, 0x00, 0x3C, 0x22, 0x22, 0x22, 0x3C, 0x20, 0x20, 0x20], // 'p'
    [0x00, 0x00, 0x00, 0x00, 0x1E, 0x22, 0x22, 0x22, 0x1E, 0x02, 0x02, 0x02], // 'q'
    [0x00, 0x00, 0x00, 0x00, 0x2C, 0x32, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00], // 'r'
    [0x00, 0x00, 0x00, 0x00, 0x1E, 0x20, 0x1C, 0x02, 0x02, 0x3C, 0x00, 0x00], // 's'
    [0x00, 0x00, 0x10, 0x10, 0x3C, 0x10, 0x10, 0x10, 0x12, 0x0C, 0x00, 0x00], // 't'
    [0x00, 0x00, 0x00, 0x00, 0x22, 0x22, 0x22, 0x22, 0x22, 0x1E, 0x00, 0x00], // 'u'
    [0x00, 0x00, 0x00, 0x00, 0x22, 0x22, 0x22, 0x14, 0x14, 0x08, 0x00, 0x00], // 'v'
    [0x00, 0x00, 0x00, 0x00, 0x22, 0x22, 0x2A, 0x2A, 0x2A, 0x14, 0x00, 0x00], // 'w'
    [0x00, 0x00, 0x00, 0x00, 0x22, 0x14, 0x08, 0x08, 0x14, 0x22, 0x00, 0x00], // 'x'
    [0x00, 0x00, 0x00, 0x00, 0x22, 0x22, 0x22, 0x22, 0x1E, 0x02, 0x22, 0x1C], // 'y'
    [0x00, 0x00, 0x00, 0x00, 0x3E, 0x04, 0x08, 0x10, 0x20, 0x3E, 0x00, 0x00], // 'z'
    [0x00, 0x00, 0x04, 0x08, 0x08, 0x10, 0x08, 0x08, 0x08, 0x04, 0x00, 0x00], // '{'
    [0x00, 0x00, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00], // '|'
    [0x00, 0x00, 0x10, 0x08, 0x08, 0x04, 0x08, 0x08, 0x08, 0x10, 0x00, 0x00], // '}'
    [0x00, 0x00, 0x00, 0x00, 0x12, 0x2A, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00], // '~'
    [0x00, 0x00, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x00, 0x00], // DEL (fallback box)
];

/// Row masks for one character; unprintable characters get the
/// fallback box.
pub fn glyph(ch: char) -> &'static [u8; GLYPH_HEIGHT] {
    let code = ch as u32;
    if (0x20..0x7F).contains(&code) {
        &GLYPHS[(code - 0x20) as usize]
    } else {
        &GLYPHS[95]
    }
}

/// Rasterize one character into a tile, substituting foreground and
/// background palette indices for set and clear bits.
pub fn render(ch: char, foreground: u8, background: u8) -> Block {
    let rows = glyph(ch);
    let mut block = [[0u8; GLYPH_WIDTH]; GLYPH_HEIGHT];
    for (dy, out_row) in block.iter_mut().enumerate() {
        for (dx, out) in out_row.iter_mut().enumerate() {
            let set = rows[dy] >> (5 - dx) & 1 == 1;
            *out = if set { foreground } else { background } & 0x0F;
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_blank() {
        assert!(glyph(' ').iter().all(|&r| r == 0));
    }

    #[test]
    fn printable_glyphs_are_nonempty() {
        for code in 0x21u8..0x7F {
            let rows = glyph(code as char);
            assert!(
                rows.iter().any(|&r| r != 0),
                "glyph {:?} is blank",
                code as char
            );
        }
    }

    #[test]
    fn rows_fit_six_bits() {
        for code in 0x20u8..0x7F {
            for &row in glyph(code as char) {
                assert!(row <= 0x3F);
            }
        }
    }

    #[test]
    fn unprintable_falls_back_to_box() {
        assert_eq!(glyph('\u{1F600}'), glyph('\u{7F}'));
        assert!(glyph('\u{7F}').iter().any(|&r| r == 0x3F));
    }

    #[test]
    fn render_substitutes_indices() {
        let block = render('A', 3, 1);
        // Row 6 of 'A' is 0x3E: pixels 0-4 foreground, pixel 5 background
        assert_eq!(block[6][0], 3);
        assert_eq!(block[6][4], 3);
        assert_eq!(block[6][5], 1);
        // Top row is always background
        assert!(block[0].iter().all(|&p| p == 1));
    }
}
