//! Transition completeness: applying a full-length transition's packets
//! leaves every block of the coordinate list at its intended color, in
//! reveal order.

use cdg_core::model::{BmpEvent, Clip, ClipKind, IndexedImage};
use cdg_core::palette::DEFAULT_PALETTE;
use cdg_core::prelude::*;
use cdg_core::replay::Replayer;
use cdg_core::transition::Transition;

fn bmp_clip_with_transition(transition: Transition, length: u32) -> Clip {
    let steps = transition.len() as u32;
    Clip {
        track: 0,
        start: 300,
        duration: 100 + length.max(steps),
        kind: ClipKind::Bmp {
            events: vec![BmpEvent {
                offset: 0,
                source: IndexedImage::solid(300, 216, 7, DEFAULT_PALETTE),
                x_offset: 0,
                y_offset: 0,
                width: 300,
                height: 216,
                fill_index: 0,
                border_index: 0,
                composite_index: 0,
                should_composite: false,
                load_palette: true,
                transition,
                transition_length: length,
            }],
        },
    }
}

#[test]
fn full_transition_reveals_every_listed_block() {
    let coords: Vec<(u8, u8)> = vec![(0, 0), (49, 17), (25, 9), (10, 3), (3, 10), (40, 16)];
    let transition = Transition::from_coords(coords.clone());
    let clip = bmp_clip_with_transition(transition, coords.len() as u32);
    let end = clip.end();

    let mut exp = Exporter::new(end);
    exp.register(clip).unwrap();
    let out = exp.run().unwrap();
    let state = Replayer::from_bytes(&out.bytes).unwrap().final_state();

    for (bx, by) in coords {
        let block = state.vram.read_block(bx as usize, by as usize);
        assert!(
            block.iter().flatten().all(|&p| p == 7),
            "block ({bx}, {by}) not revealed"
        );
    }
}

#[test]
fn default_transition_reveals_whole_grid() {
    let clip = bmp_clip_with_transition(Transition::column_major(), 900);
    let end = clip.end();
    let mut exp = Exporter::new(end);
    exp.register(clip).unwrap();
    let out = exp.run().unwrap();
    let state = Replayer::from_bytes(&out.bytes).unwrap().final_state();
    for y in 0..216 {
        for x in 0..300 {
            assert_eq!(state.vram.get_pixel(x, y), 7);
        }
    }
}

#[test]
fn zero_length_transition_emits_prelude_only() {
    let clip = bmp_clip_with_transition(Transition::column_major(), 0);
    let end = clip.end();
    let mut exp = Exporter::new(end);
    exp.register(clip).unwrap();
    let out = exp.run().unwrap();

    // Prelude packets: palette pair, border, sixteen clears. No tile
    // packets anywhere in the stream.
    let tile_count = out
        .bytes
        .chunks_exact(24)
        .filter(|f| f[0] == 0x09 && (f[1] == 0x06 || f[1] == 0x26))
        .count();
    assert_eq!(tile_count, 0);
    let preset_count = out
        .bytes
        .chunks_exact(24)
        .filter(|f| f[0] == 0x09 && f[1] == 0x01)
        .count();
    assert_eq!(preset_count, 16);
}

#[test]
fn reveal_order_is_monotonic_in_the_stream() {
    // With a reversed sweep, later coordinates of the list must appear
    // later in the packet stream.
    let coords: Vec<(u8, u8)> = (0..10).map(|i| (i as u8, 0)).collect();
    let transition = Transition::from_coords(coords);
    let clip = bmp_clip_with_transition(transition, 10);
    let end = clip.end();
    let mut exp = Exporter::new(end);
    exp.register(clip).unwrap();
    let out = exp.run().unwrap();

    let mut seen_columns = Vec::new();
    for frame in out.bytes.chunks_exact(24) {
        if frame[0] == 0x09 && frame[1] == 0x06 && frame[5] == 7 {
            seen_columns.push(frame[7] & 0x3F); // block column
        }
    }
    let mut sorted = seen_columns.clone();
    sorted.sort_unstable();
    assert_eq!(seen_columns, sorted);
    assert_eq!(seen_columns.len(), 10);
}
