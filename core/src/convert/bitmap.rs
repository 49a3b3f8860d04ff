//! Bitmap-to-block conversion: nearest-neighbor sampling of a 16-color
//! source image into the 50x18 block grid, revealed in transition
//! order.
//!
//! The source scales to the full 300x216 screen (`sx = W / 300`,
//! `sy = H / 216`); the event's destination rectangle clips which
//! pixels are produced. Each transition step reveals one block,
//! scheduled `step * length / steps` packets into the reveal window so
//! a transition spreads evenly over its length in packets.

use crate::compositor::TRANSPARENT;
use crate::model::{BmpEvent, TrackOptions};
use crate::vram::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_HEIGHT, TILE_WIDTH};

use super::{CLEAR_CELLS, FontBlock};

/// Convert one BMP event into scheduled blocks. `content_start` is the
/// absolute packet index of the first content slot (past the clip's
/// prelude). An event with a zero transition length contributes
/// nothing.
pub fn bitmap_to_blocks(
    event: &BmpEvent,
    content_start: u32,
    opts: TrackOptions,
) -> Vec<FontBlock> {
    let steps = event.transition.len();
    let length = event.transition_length;
    if steps == 0 || length == 0 {
        return Vec::new();
    }

    let sx = event.source.width as f64 / SCREEN_WIDTH as f64;
    let sy = event.source.height as f64 / SCREEN_HEIGHT as f64;

    // Destination rectangle in screen pixels, clamped to the display.
    let dest_left = event.x_offset.max(0) as usize;
    let dest_top = event.y_offset.max(0) as usize;
    let dest_right = (event.x_offset + event.width as i32).clamp(0, SCREEN_WIDTH as i32) as usize;
    let dest_bottom =
        (event.y_offset + event.height as i32).clamp(0, SCREEN_HEIGHT as i32) as usize;
    if dest_left >= dest_right || dest_top >= dest_bottom {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    for (step, (bx, by)) in event.transition.iter().enumerate() {
        let (px, py) = (bx as usize * TILE_WIDTH, by as usize * TILE_HEIGHT);
        // Skip blocks that never intersect the destination; the step
        // index still advances so the reveal keeps its pacing.
        if px + TILE_WIDTH <= dest_left
            || px >= dest_right
            || py + TILE_HEIGHT <= dest_top
            || py >= dest_bottom
        {
            continue;
        }

        let mut cells = CLEAR_CELLS;
        for dy in 0..TILE_HEIGHT {
            let y = py + dy;
            for dx in 0..TILE_WIDTH {
                let x = px + dx;
                if x < dest_left || x >= dest_right || y < dest_top || y >= dest_bottom {
                    continue;
                }
                let src_x = (x as f64 * sx) as usize;
                let src_y = (y as f64 * sy) as usize;
                let index = if src_x < event.source.width && src_y < event.source.height {
                    event.source.pixel(src_x, src_y)
                } else {
                    event.fill_index & 0x0F
                };
                cells[dy][dx] = if event.should_composite && index == event.composite_index & 0x0F {
                    TRANSPARENT
                } else {
                    u16::from(index)
                };
            }
        }

        blocks.push(FontBlock {
            bx,
            by,
            cells,
            packet: content_start + (step as u64 * u64::from(length) / steps as u64) as u32,
            layer: opts.layer,
            channel: opts.channel,
        });
    }
    blocks
}
