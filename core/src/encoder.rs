//! Tile-level color compression: turn one 6x12 block of palette indices
//! into the fewest tile packets whose cumulative effect on VRAM equals
//! the block.
//!
//! Strategy by number of distinct colors:
//!
//! | Colors | Packets | Form                                            |
//! |--------|---------|-------------------------------------------------|
//! | 1      | 1       | COPY, color0 == color1, all row bits set        |
//! | 2      | 1       | COPY, color1 = majority color                   |
//! | 3      | 2       | COPY of the two most frequent + one XOR         |
//! | 4+     | <= 4    | bit-plane COPY then XORs over the index OR      |
//!
//! The 3-color form is the dedicated COPY+XOR pair: third-color pixels
//! are written as the dominant color by the COPY, then flipped by an
//! XOR whose color is `dominant ^ third`.

use crate::packet::Packet;
use crate::vram::{Block, Vram};

/// Encode `block` for position (bx, by) against current VRAM content.
///
/// Returns no packets when VRAM already shows the block (the caller has
/// already resolved `block` through the compositor, so equality means
/// the tile needs nothing on the wire).
pub fn encode(bx: usize, by: usize, block: &Block, vram: &Vram) -> Vec<Packet> {
    if vram.block_equals(bx, by, block) {
        return Vec::new();
    }

    let mut counts = [0u32; 16];
    for row in block {
        for &p in row {
            counts[(p & 0x0F) as usize] += 1;
        }
    }
    // Used colors ordered by frequency, ties broken by index.
    let mut used: Vec<u8> = (0u8..16).filter(|&c| counts[c as usize] > 0).collect();
    used.sort_by_key(|&c| std::cmp::Reverse(counts[c as usize]));

    let (bx, by) = (bx as u8, by as u8);
    match used.len() {
        1 => {
            let c = used[0];
            vec![Packet::tile_block(false, c, c, by, bx, &[0x3F; 12])]
        }
        2 => {
            let (majority, minority) = (used[0], used[1]);
            let rows = row_masks(block, |p| p == majority);
            vec![Packet::tile_block(false, minority, majority, by, bx, &rows)]
        }
        3 => {
            let (first, second, third) = (used[0], used[1], used[2]);
            // COPY writes third-color pixels as `first`; the XOR flips
            // them, since first ^ (first ^ third) == third.
            let copy_rows = row_masks(block, |p| p == second);
            let xor_rows = row_masks(block, |p| p == third);
            vec![
                Packet::tile_block(false, first, second, by, bx, &copy_rows),
                Packet::tile_block(true, 0, first ^ third, by, bx, &xor_rows),
            ]
        }
        _ => bit_planes(block, bx, by),
    }
}

/// Bit-plane decomposition for blocks with four or more colors. One
/// packet per set bit in the OR of all used indices, highest bit first:
/// a COPY establishes the first plane over a zero background, the
/// remaining planes XOR in.
fn bit_planes(block: &Block, bx: u8, by: u8) -> Vec<Packet> {
    let mut or_all = 0u8;
    for row in block {
        for &p in row {
            or_all |= p & 0x0F;
        }
    }

    let mut packets = Vec::new();
    let mut first = true;
    for bit in (0..4).rev() {
        let plane = 1u8 << bit;
        if or_all & plane == 0 {
            continue;
        }
        let rows = row_masks(block, |p| p & plane != 0);
        packets.push(Packet::tile_block(!first, 0, plane, by, bx, &rows));
        first = false;
    }
    packets
}

/// Twelve 6-bit row masks, bit `5 - x` set where `predicate(pixel)`.
fn row_masks(block: &Block, predicate: impl Fn(u8) -> bool) -> [u8; 12] {
    let mut rows = [0u8; 12];
    for (dy, row) in block.iter().enumerate() {
        for (dx, &p) in row.iter().enumerate() {
            if predicate(p & 0x0F) {
                rows[dy] |= 1 << (5 - dx);
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{SUB_TILE_COPY, SUB_TILE_XOR};
    use crate::vram::{EMPTY_BLOCK, TILE_HEIGHT, TILE_WIDTH};

    /// Apply tile packets to a VRAM the way a player would.
    fn apply(vram: &mut Vram, packets: &[Packet]) {
        for p in packets {
            let color0 = p.payload_byte(0);
            let color1 = p.payload_byte(1);
            let by = p.payload_byte(2) as usize;
            let bx = p.payload_byte(3) as usize;
            for dy in 0..TILE_HEIGHT {
                let mask = p.payload_byte(4 + dy);
                for dx in 0..TILE_WIDTH {
                    let bit = mask >> (5 - dx) & 1;
                    let value = if bit == 1 { color1 } else { color0 };
                    let (x, y) = (bx * TILE_WIDTH + dx, by * TILE_HEIGHT + dy);
                    match p.subcommand() {
                        SUB_TILE_COPY => vram.set_pixel(x, y, value),
                        SUB_TILE_XOR => {
                            let old = vram.get_pixel(x, y);
                            vram.set_pixel(x, y, old ^ value);
                        }
                        _ => panic!("not a tile packet"),
                    }
                }
            }
        }
    }

    fn block_with(f: impl Fn(usize, usize) -> u8) -> Block {
        let mut block = EMPTY_BLOCK;
        for (dy, row) in block.iter_mut().enumerate() {
            for (dx, p) in row.iter_mut().enumerate() {
                *p = f(dx, dy);
            }
        }
        block
    }

    #[test]
    fn unchanged_block_emits_nothing() {
        let mut vram = Vram::new();
        let block = block_with(|dx, _| (dx % 4) as u8);
        vram.write_block(3, 3, &block);
        assert!(encode(3, 3, &block, &vram).is_empty());
    }

    #[test]
    fn single_color_one_copy_all_bits() {
        let vram = Vram::new();
        let block = [[7; 6]; 12];
        let packets = encode(0, 0, &block, &vram);
        assert_eq!(packets.len(), 1);
        let p = &packets[0];
        assert_eq!(p.subcommand(), SUB_TILE_COPY);
        assert_eq!(p.payload_byte(0), 7);
        assert_eq!(p.payload_byte(1), 7);
        for i in 4..16 {
            assert_eq!(p.payload_byte(i), 0x3F);
        }
    }

    #[test]
    fn two_color_majority_is_color1() {
        // Block at (10, 5): one full row (six pixels) of color 3 on a
        // color-1 field.
        let block = block_with(|_, dy| if dy == 2 { 3 } else { 1 });
        let vram = Vram::new();
        let packets = encode(10, 5, &block, &vram);
        assert_eq!(packets.len(), 1);
        let p = &packets[0];
        assert_eq!(p.subcommand(), SUB_TILE_COPY);
        assert_eq!(p.payload_byte(0), 1); // minority
        assert_eq!(p.payload_byte(1), 3); // majority
        assert_eq!(p.payload_byte(2), 5); // row
        assert_eq!(p.payload_byte(3), 10); // column
        // Only row 2 carries color 3
        for dy in 0..12 {
            let expected = if dy == 2 { 0x3F } else { 0x00 };
            assert_eq!(p.payload_byte(4 + dy), expected);
        }
    }

    #[test]
    fn two_color_round_trip() {
        let block = block_with(|dx, dy| if (dx + dy) % 2 == 0 { 4 } else { 9 });
        let mut vram = Vram::new();
        let packets = encode(7, 2, &block, &vram);
        assert_eq!(packets.len(), 1);
        apply(&mut vram, &packets);
        assert!(vram.block_equals(7, 2, &block));
    }

    #[test]
    fn three_color_copy_then_xor() {
        // Color 2 dominant, color 5 second, color 7 third.
        let block = block_with(|dx, dy| match (dx, dy) {
            (0, 0) | (1, 0) => 7,
            (_, 0..=3) => 5,
            _ => 2,
        });
        let mut vram = Vram::new();
        let packets = encode(4, 4, &block, &vram);
        assert_eq!(packets.len(), 2);

        let copy = &packets[0];
        assert_eq!(copy.subcommand(), SUB_TILE_COPY);
        assert_eq!(copy.payload_byte(0), 2);
        assert_eq!(copy.payload_byte(1), 5);

        let xor = &packets[1];
        assert_eq!(xor.subcommand(), SUB_TILE_XOR);
        assert_eq!(xor.payload_byte(0), 0);
        assert_eq!(xor.payload_byte(1), 2 ^ 7); // == 5
        // XOR rows mark exactly the color-7 pixels
        assert_eq!(xor.payload_byte(4), 0b11 << 4);
        for dy in 1..12 {
            assert_eq!(xor.payload_byte(4 + dy), 0);
        }

        apply(&mut vram, &packets);
        assert!(vram.block_equals(4, 4, &block));
    }

    #[test]
    fn four_color_bit_planes_reconstruct() {
        let block = block_with(|dx, dy| ((dx + dy * 6) % 16) as u8);
        let mut vram = Vram::new();
        let packets = encode(0, 0, &block, &vram);
        // OR of 0..=15 is 0xF: four planes, first COPY then three XORs.
        assert_eq!(packets.len(), 4);
        assert_eq!(packets[0].subcommand(), SUB_TILE_COPY);
        assert_eq!(packets[0].payload_byte(0), 0);
        assert_eq!(packets[0].payload_byte(1), 8); // highest bit first
        for p in &packets[1..] {
            assert_eq!(p.subcommand(), SUB_TILE_XOR);
        }
        apply(&mut vram, &packets);
        assert!(vram.block_equals(0, 0, &block));
    }

    #[test]
    fn four_color_skips_unused_planes() {
        // Colors 1, 2, 4, 8: OR is 0xF, all four planes present.
        // Colors 1, 3, 5, 7: OR is 0x7, three planes.
        let block = block_with(|dx, _| [1u8, 3, 5, 7][dx % 4]);
        let vram = Vram::new();
        let packets = encode(0, 0, &block, &vram);
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].payload_byte(1), 4);
        assert_eq!(packets[1].payload_byte(1), 2);
        assert_eq!(packets[2].payload_byte(1), 1);
    }

    #[test]
    fn three_color_over_dirty_vram_reconstructs() {
        // COPY overwrites whatever was there, so prior VRAM content
        // must not leak through.
        let block = block_with(|dx, _| [2u8, 2, 5, 2, 7, 2][dx]);
        let mut vram = Vram::new();
        vram.clear(0xC);
        let packets = encode(20, 10, &block, &vram);
        apply(&mut vram, &packets);
        assert!(vram.block_equals(20, 10, &block));
    }
}
