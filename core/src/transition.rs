//! Transition engine: ordered block-reveal sequences.
//!
//! A transition is an ordered list of (bx, by) block coordinates. At
//! step `i` of a running transition, blocks `0..=i` of the list are
//! visible and the remainder still shows the background. Because the
//! pipeline diffs every composited block against VRAM before emitting,
//! realizing step `i` costs exactly one block write: the newly revealed
//! coordinate. Transition files carry 768 entries; the built-in default
//! sweeps the full 50x18 grid column by column.

use crate::vram::{GRID_HEIGHT, GRID_WIDTH};

/// Number of coordinate pairs in a transition file.
pub const FILE_COORD_COUNT: usize = 768;

/// An ordered reveal sequence over the block grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    coords: Vec<(u8, u8)>,
}

impl Transition {
    /// The default reveal order: column-major sweep over the whole
    /// grid, top to bottom within each column, left to right.
    pub fn column_major() -> Self {
        let mut coords = Vec::with_capacity(GRID_WIDTH * GRID_HEIGHT);
        for bx in 0..GRID_WIDTH as u8 {
            for by in 0..GRID_HEIGHT as u8 {
                coords.push((bx, by));
            }
        }
        Self { coords }
    }

    /// Build from explicit zero-based coordinates (a loaded transition
    /// file). Coordinates outside the grid are dropped.
    pub fn from_coords(coords: Vec<(u8, u8)>) -> Self {
        let coords = coords
            .into_iter()
            .filter(|&(bx, by)| (bx as usize) < GRID_WIDTH && (by as usize) < GRID_HEIGHT)
            .collect();
        Self { coords }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Block revealed at step `i`.
    pub fn get(&self, i: usize) -> Option<(u8, u8)> {
        self.coords.get(i).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.coords.iter().copied()
    }

    /// Truncate the sequence to at most `len` steps.
    pub fn truncated(&self, len: usize) -> Self {
        Self {
            coords: self.coords[..self.coords.len().min(len)].to_vec(),
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::column_major()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_major_covers_grid_once() {
        let t = Transition::column_major();
        assert_eq!(t.len(), GRID_WIDTH * GRID_HEIGHT);
        let mut seen = [[false; GRID_HEIGHT]; GRID_WIDTH];
        for (bx, by) in t.iter() {
            assert!(!seen[bx as usize][by as usize], "duplicate coordinate");
            seen[bx as usize][by as usize] = true;
        }
    }

    #[test]
    fn column_major_order() {
        let t = Transition::column_major();
        assert_eq!(t.get(0), Some((0, 0)));
        assert_eq!(t.get(1), Some((0, 1)));
        assert_eq!(t.get(17), Some((0, 17)));
        assert_eq!(t.get(18), Some((1, 0)));
    }

    #[test]
    fn from_coords_drops_out_of_grid() {
        let t = Transition::from_coords(vec![(0, 0), (50, 0), (0, 18), (49, 17)]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(0), Some((0, 0)));
        assert_eq!(t.get(1), Some((49, 17)));
    }

    #[test]
    fn truncated_limits_steps() {
        let t = Transition::column_major().truncated(10);
        assert_eq!(t.len(), 10);
        let full = Transition::column_major().truncated(10_000);
        assert_eq!(full.len(), GRID_WIDTH * GRID_HEIGHT);
    }
}
