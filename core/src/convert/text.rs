//! Text-to-tile conversion: one glyph tile per character, centered in
//! each event's tile-aligned bounding box.

use crate::model::{TextEvent, TextStyle, TrackOptions};
use crate::vram::{GRID_HEIGHT, GRID_WIDTH, TILE_HEIGHT, TILE_WIDTH};

use super::{CLEAR_CELLS, FontBlock, font};

/// Render a text clip's events into tile blocks.
///
/// Each event places one line of the clip's content: the line selected
/// by `line_index`, horizontally centered inside the event's box at
/// row `box_top + line_index`. Glyphs landing outside the 50x18 grid
/// are dropped. Emitted `packet` values are sequence numbers (0, 1,
/// ...); the scheduler re-bases them over the clip's content window.
pub fn text_to_blocks(
    content: &str,
    style: &TextStyle,
    events: &[TextEvent],
    opts: TrackOptions,
) -> Vec<FontBlock> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut seq = 0u32;

    for event in events {
        let Some(line) = lines.get(event.line_index as usize) else {
            continue;
        };
        let text_width = line.chars().count();
        let box_width = event.box_width as usize;
        let left = event.box_left as usize + box_width.saturating_sub(text_width) / 2;
        let by = event.box_top as usize + event.line_index as usize;
        if by >= GRID_HEIGHT {
            continue;
        }

        for (i, ch) in line.chars().enumerate() {
            let bx = left + i;
            if bx >= GRID_WIDTH {
                continue;
            }
            let glyph = font::render(ch, style.foreground, style.background);
            let mut cells = CLEAR_CELLS;
            for dy in 0..TILE_HEIGHT {
                for dx in 0..TILE_WIDTH {
                    cells[dy][dx] = u16::from(glyph[dy][dx]);
                }
            }
            blocks.push(FontBlock {
                bx: bx as u8,
                by: by as u8,
                cells,
                packet: seq,
                layer: opts.layer,
                channel: opts.channel,
            });
            seq += 1;
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(box_left: u8, box_top: u8, box_width: u8, line_index: u8) -> TextEvent {
        TextEvent {
            offset: 0,
            box_left,
            box_top,
            box_width,
            box_height: 1,
            line_index,
            word_index: 0,
            karaoke_type: 0,
            transition: None,
        }
    }

    #[test]
    fn centers_text_in_box() {
        // 4 characters in a 10-tile box starting at column 5:
        // left = 5 + (10 - 4) / 2 = 8
        let blocks = text_to_blocks(
            "HOLA",
            &TextStyle::default(),
            &[event(5, 3, 10, 0)],
            TrackOptions::default(),
        );
        assert_eq!(blocks.len(), 4);
        let columns: Vec<u8> = blocks.iter().map(|b| b.bx).collect();
        assert_eq!(columns, vec![8, 9, 10, 11]);
        assert!(blocks.iter().all(|b| b.by == 3));
    }

    #[test]
    fn line_index_selects_line_and_row() {
        let blocks = text_to_blocks(
            "one\ntwo",
            &TextStyle::default(),
            &[event(0, 5, 10, 1)],
            TrackOptions::default(),
        );
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.by == 6));
    }

    #[test]
    fn missing_line_contributes_nothing() {
        let blocks = text_to_blocks(
            "only",
            &TextStyle::default(),
            &[event(0, 0, 10, 4)],
            TrackOptions::default(),
        );
        assert!(blocks.is_empty());
    }

    #[test]
    fn glyphs_outside_grid_dropped() {
        // Box pushed to the right edge: text wider than what fits
        let blocks = text_to_blocks(
            "WIDE",
            &TextStyle::default(),
            &[event(48, 0, 4, 0)],
            TrackOptions::default(),
        );
        // left = 48, columns 48, 49 fit; 50, 51 dropped
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn row_outside_grid_dropped() {
        let blocks = text_to_blocks(
            "x",
            &TextStyle::default(),
            &[event(0, 17, 4, 1)],
            TrackOptions::default(),
        );
        assert!(blocks.is_empty());
    }

    #[test]
    fn sequence_numbers_run_across_events() {
        let blocks = text_to_blocks(
            "ab\ncd",
            &TextStyle::default(),
            &[event(0, 0, 4, 0), event(0, 2, 4, 1)],
            TrackOptions::default(),
        );
        let seqs: Vec<u32> = blocks.iter().map(|b| b.packet).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn colors_substituted_from_style() {
        let style = TextStyle {
            foreground: 7,
            background: 2,
            ..TextStyle::default()
        };
        let blocks = text_to_blocks("I", &style, &[event(0, 0, 1, 0)], TrackOptions::default());
        let cells = &blocks[0].cells;
        // 'I' row 2 is 0x1C: columns 1-3 foreground
        assert_eq!(cells[2][1], 7);
        assert_eq!(cells[2][0], 2);
    }
}
