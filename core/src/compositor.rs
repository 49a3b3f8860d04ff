//! Multi-layer pixel compositor with z-ordering and transparency.
//!
//! Eight 300x216 layers stacked back (layer 0) to front (layer 7).
//! Cells hold a 9-bit value; 256 is the transparent sentinel. Reading a
//! composited block resolves each pixel to the first non-transparent
//! layer scanning from the back, falling back to the current
//! memory-preset index when every layer is transparent.
//!
//! One compositor exists per export run and is cleared to all
//! transparent on construction.

use crate::vram::{Block, EMPTY_BLOCK, GRID_HEIGHT, GRID_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_HEIGHT, TILE_WIDTH};

/// Number of z-layers.
pub const LAYER_COUNT: usize = 8;

/// Cell value meaning "no pixel on this layer".
pub const TRANSPARENT: u16 = 256;

const LAYER_CELLS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

pub struct Compositor {
    // All eight layers in one allocation, layer-major.
    cells: Vec<u16>,
    preset_index: u8,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            cells: vec![TRANSPARENT; LAYER_COUNT * LAYER_CELLS],
            preset_index: 0,
        }
    }

    /// Background index used where every layer is transparent.
    pub fn set_preset_index(&mut self, index: u8) {
        self.preset_index = index & 0x0F;
    }

    pub fn preset_index(&self) -> u8 {
        self.preset_index
    }

    /// Write a 6x12 block of palette indices into one layer. Out-of-grid
    /// coordinates and out-of-range layers are silently dropped.
    pub fn write_block(&mut self, bx: usize, by: usize, layer: usize, block: &Block) {
        if bx >= GRID_WIDTH || by >= GRID_HEIGHT || layer >= LAYER_COUNT {
            return;
        }
        let (px, py) = (bx * TILE_WIDTH, by * TILE_HEIGHT);
        let base_layer = layer * LAYER_CELLS;
        for (dy, row) in block.iter().enumerate() {
            let base = base_layer + (py + dy) * SCREEN_WIDTH + px;
            for (dx, &index) in row.iter().enumerate() {
                self.cells[base + dx] = u16::from(index & 0x0F);
            }
        }
    }

    /// Write a 6x12 block where `TRANSPARENT` cells punch holes instead
    /// of pixels (used when a bitmap's composite flag keeps lower layers
    /// visible through its fill color).
    pub fn write_block_cells(&mut self, bx: usize, by: usize, layer: usize, cells: &[[u16; TILE_WIDTH]; TILE_HEIGHT]) {
        if bx >= GRID_WIDTH || by >= GRID_HEIGHT || layer >= LAYER_COUNT {
            return;
        }
        let (px, py) = (bx * TILE_WIDTH, by * TILE_HEIGHT);
        let base_layer = layer * LAYER_CELLS;
        for (dy, row) in cells.iter().enumerate() {
            let base = base_layer + (py + dy) * SCREEN_WIDTH + px;
            for (dx, &cell) in row.iter().enumerate() {
                self.cells[base + dx] = cell.min(TRANSPARENT);
            }
        }
    }

    /// Reset one layer to all transparent.
    pub fn clear_layer(&mut self, layer: usize) {
        if layer >= LAYER_COUNT {
            return;
        }
        let base = layer * LAYER_CELLS;
        self.cells[base..base + LAYER_CELLS].fill(TRANSPARENT);
    }

    /// Resolve the composited 6x12 block at (bx, by): per pixel, the
    /// first non-transparent layer value from layer 0 upward, else the
    /// preset index.
    pub fn read_composited_block(&self, bx: usize, by: usize) -> Block {
        let mut block = EMPTY_BLOCK;
        if bx >= GRID_WIDTH || by >= GRID_HEIGHT {
            return block;
        }
        let (px, py) = (bx * TILE_WIDTH, by * TILE_HEIGHT);
        for (dy, row) in block.iter_mut().enumerate() {
            let cell_base = (py + dy) * SCREEN_WIDTH + px;
            for (dx, out) in row.iter_mut().enumerate() {
                *out = self.resolve(cell_base + dx);
            }
        }
        block
    }

    fn resolve(&self, cell: usize) -> u8 {
        for layer in 0..LAYER_COUNT {
            let value = self.cells[layer * LAYER_CELLS + cell];
            if value != TRANSPARENT {
                return value as u8;
            }
        }
        self.preset_index
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}
