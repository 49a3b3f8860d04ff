//! Converters that turn clip content into scheduled tile blocks.
//!
//! Both converters produce [`FontBlock`]s: one 6x12 cell grid targeting
//! a block coordinate at a packet index, on a z-layer. The scheduler
//! feeds them through the compositor and the tile encoder.

pub mod bitmap;
pub mod font;
pub mod text;

pub use bitmap::bitmap_to_blocks;
pub use text::text_to_blocks;

use crate::compositor::TRANSPARENT;
use crate::vram::{TILE_HEIGHT, TILE_WIDTH};

/// A 6x12 grid of compositor cells; `TRANSPARENT` punches a hole.
pub type BlockCells = [[u16; TILE_WIDTH]; TILE_HEIGHT];

/// An all-transparent cell grid.
pub const CLEAR_CELLS: BlockCells = [[TRANSPARENT; TILE_WIDTH]; TILE_HEIGHT];

/// One block write produced by a converter, not yet committed to the
/// wire. Ephemeral: generated per clip, consumed by the scheduler.
#[derive(Clone, Debug)]
pub struct FontBlock {
    pub bx: u8,
    pub by: u8,
    pub cells: BlockCells,
    /// Scheduled packet index. Bitmap conversion emits absolute packet
    /// numbers; text conversion emits sequence numbers the scheduler
    /// re-bases over the clip's content window.
    pub packet: u32,
    pub layer: u8,
    pub channel: u8,
}
