//! The clip scheduler: owns export time, drives the converters and the
//! tile encoder, and places every produced packet into a fixed
//! packet-indexed slot array.
//!
//! # Placement rules
//!
//! A packet targets an absolute slot. If the slot is taken, the
//! allocator probes outward (`p+1, p-1, p+2, p-2, ...`) inside the
//! clip's window. If the whole neighborhood is full, the remaining
//! packets of the event relocate to the nearest forward run of empty
//! slots that fits them. Only as a last resort are occupied slots
//! overwritten, always beyond the reserved prelude and always logged.
//!
//! The reserved prelude `0..=250` never receives clip content; the only
//! occupant is the scroll-copy anchor injected at packet 250.

use std::collections::HashMap;

use crate::compositor::Compositor;
use crate::convert::{self, FontBlock};
use crate::encoder;
use crate::export::ExportError;
use crate::model::{BmpEvent, Clip, ClipKind, TextStyle, TrackOptions};
use crate::packet::Packet;
use crate::palette::{DEFAULT_PALETTE, LeaseManager, PALETTE_SIZE, Palette, Rgb};
use crate::vram::Vram;

/// Last packet of the reserved prelude, inclusive.
pub const RESERVED_PRELUDE_END: u32 = 250;

/// Number of repeated memory-preset packets in a BMP clip prelude.
/// Sixteen clears guarantee the screen wipe lands on frame-skipping
/// players.
pub const MEMORY_PRESET_REPEATS: u32 = 16;

/// Cap on how far one event advances the same-start serialization
/// offset.
const START_OFFSET_CAP: u32 = 1024;

pub struct Scheduler {
    slots: Vec<Packet>,
    vram: Vram,
    compositor: Compositor,
    palette: Palette,
    /// Index occupancy over time: every palette replacement releases
    /// the old leases and takes new ones, clip-scoped for BMP tables
    /// and unlimited for global palette clips.
    leases: LeaseManager,
    /// Serialization offsets keyed by nominal start packet, so clips
    /// and events sharing a start packet queue up instead of colliding.
    start_offsets: HashMap<u32, u32>,
    /// Per-track subcode channel assignment.
    track_channels: [u8; 8],
    overwrites: u32,
    clips_scheduled: u32,
}

impl Scheduler {
    pub fn new(total_packets: u32, track_channels: [u8; 8]) -> Self {
        Self {
            slots: vec![Packet::empty(); total_packets as usize],
            vram: Vram::new(),
            compositor: Compositor::new(),
            palette: Palette::new(),
            leases: LeaseManager::new(),
            start_offsets: HashMap::new(),
            track_channels,
            overwrites: 0,
            clips_scheduled: 0,
        }
    }

    /// Schedule every clip and finish the slot array. Clips are taken
    /// in chronological order of start packet; ties keep registration
    /// order.
    pub fn run(&mut self, clips: &[Clip]) -> Result<(), ExportError> {
        self.inject_anchor();

        let mut order: Vec<usize> = (0..clips.len()).collect();
        order.sort_by_key(|&i| clips[i].start);

        for index in order {
            let clip = &clips[index];
            if clip.duration == 0 {
                tracing::debug!(index, kind = clip.kind_name(), "zero-duration clip skipped");
                continue;
            }
            match &clip.kind {
                ClipKind::Bmp { events } => self.schedule_bmp(clip, events)?,
                ClipKind::Text {
                    content,
                    style,
                    events,
                } => self.schedule_text(clip, content, style, events)?,
                ClipKind::Scroll {
                    color,
                    h_dir,
                    h_offset,
                    v_dir,
                    v_offset,
                } => {
                    self.schedule_scroll(clip, *color, *h_dir, *h_offset, *v_dir, *v_offset)?;
                }
                ClipKind::PaletteGlobal { colors } => {
                    self.palette.replace(colors, clip.start);
                    self.track_palette_leases(colors, clip.start, None, "palette clip");
                    let group = vec![
                        (clip.start, Packet::palette_low(colors)),
                        (clip.start + 1, Packet::palette_high(colors)),
                    ];
                    self.commit_group(group, clip.start, clip.end())?;
                }
            }
            self.clips_scheduled += 1;
        }

        self.finalize(!clips.is_empty());
        Ok(())
    }

    /// The scroll-copy anchor at packet 250, zero offsets. A no-op for
    /// players, preserved for byte-exact compatibility with reference
    /// output.
    fn inject_anchor(&mut self) {
        let anchor = RESERVED_PRELUDE_END as usize;
        if anchor < self.slots.len() {
            self.slots[anchor] = Packet::scroll_copy(0, 0, 0, 0, 0);
        }
    }

    // -----------------------------------------------------------------
    // Per-variant scheduling
    // -----------------------------------------------------------------

    fn schedule_bmp(&mut self, clip: &Clip, events: &[BmpEvent]) -> Result<(), ExportError> {
        let opts = self.track_options(clip.track);
        for event in events {
            let nominal = clip.start + event.offset;
            let start = nominal + self.start_offset(nominal);
            let mut group: Vec<(u32, Packet)> = Vec::new();

            if event.load_palette {
                self.palette.replace(&event.source.palette, start);
                self.track_palette_leases(
                    &event.source.palette,
                    start,
                    Some(clip.end().saturating_sub(start)),
                    "bmp palette",
                );
            }
            group.push((start, Packet::palette_low(self.palette.entries())));
            group.push((start + 1, Packet::palette_high(self.palette.entries())));
            group.push((start + 2, Packet::border_preset(event.border_index)));
            for repeat in 0..MEMORY_PRESET_REPEATS {
                group.push((
                    start + 3 + repeat,
                    Packet::memory_preset(event.fill_index, repeat as u8),
                ));
            }
            self.vram.clear(event.fill_index);
            self.compositor.set_preset_index(event.fill_index);

            let content_start = start + 3 + MEMORY_PRESET_REPEATS;
            let blocks = convert::bitmap_to_blocks(event, content_start, opts);
            self.encode_blocks(&blocks, &mut group);

            let emitted = group.len() as u32;
            self.commit_group(group, start, clip.end())?;
            self.advance_start_offset(nominal, emitted);
        }
        Ok(())
    }

    fn schedule_text(
        &mut self,
        clip: &Clip,
        content: &str,
        style: &TextStyle,
        events: &[crate::model::TextEvent],
    ) -> Result<(), ExportError> {
        let opts = self.track_options(clip.track);
        let nominal = clip.start;
        let start = nominal + self.start_offset(nominal);
        let mut group: Vec<(u32, Packet)> = Vec::new();

        if style.default_palette != 0 {
            self.palette.replace(&DEFAULT_PALETTE, start);
        }
        group.push((start, Packet::palette_low(self.palette.entries())));
        group.push((start + 1, Packet::palette_high(self.palette.entries())));
        group.push((start + 2, Packet::memory_preset(style.background, 0)));
        self.vram.clear(style.background);
        self.compositor.set_preset_index(style.background);

        // Distribute the tiles across the remainder of the clip.
        let blocks = convert::text_to_blocks(content, style, events, opts);
        let content_start = start + 3;
        let window = clip.end().saturating_sub(content_start).max(1);
        let step = (window / blocks.len().max(1) as u32).max(1);
        let rebased: Vec<FontBlock> = blocks
            .into_iter()
            .map(|mut b| {
                b.packet = content_start + b.packet * step;
                b
            })
            .collect();
        self.encode_blocks(&rebased, &mut group);

        let emitted = group.len() as u32;
        self.commit_group(group, start, clip.end())?;
        self.advance_start_offset(nominal, emitted);
        Ok(())
    }

    fn schedule_scroll(
        &mut self,
        clip: &Clip,
        color: u8,
        h_dir: u8,
        h_offset: u8,
        v_dir: u8,
        v_offset: u8,
    ) -> Result<(), ExportError> {
        let start = clip.start + self.start_offset(clip.start);
        let group = vec![
            (start, Packet::scroll_preset(color, h_dir, h_offset, v_dir, v_offset)),
            (start + 1, Packet::scroll_copy(color, h_dir, h_offset, v_dir, v_offset)),
        ];
        self.commit_group(group, start, clip.end())?;
        self.advance_start_offset(clip.start, 2);
        Ok(())
    }

    /// Run converter output through the compositor and the tile
    /// encoder, appending wire packets to `group` and committing the
    /// resulting pixels to the VRAM model.
    fn encode_blocks(&mut self, blocks: &[FontBlock], group: &mut Vec<(u32, Packet)>) {
        for block in blocks {
            let (bx, by) = (block.bx as usize, block.by as usize);
            self.compositor
                .write_block_cells(bx, by, block.layer as usize, &block.cells);
            let composited = self.compositor.read_composited_block(bx, by);
            let packets = encoder::encode(bx, by, &composited, &self.vram);
            if packets.is_empty() {
                continue;
            }
            for (i, packet) in packets.into_iter().enumerate() {
                group.push((block.packet + i as u32, packet));
            }
            self.vram.write_block(bx, by, &composited);
        }
    }

    // -----------------------------------------------------------------
    // Slot allocation
    // -----------------------------------------------------------------

    /// Commit one event's packet group. Each packet first probes around
    /// its target inside `[window_start, window_end)`; when the
    /// neighborhood is full the remaining packets relocate to the
    /// nearest forward empty run; any still-unplaced packet overwrites
    /// its target.
    fn commit_group(
        &mut self,
        group: Vec<(u32, Packet)>,
        window_start: u32,
        window_end: u32,
    ) -> Result<(), ExportError> {
        let total = self.slots.len() as u32;
        let mut pending: Vec<(u32, Packet)> = Vec::new();

        for (target, packet) in group {
            let target = self.clamp_reserved(target);
            if target >= total {
                return Err(ExportError::PlacementOutOfRange { packet: target, total });
            }
            match self.probe(target, window_start, window_end) {
                Some(slot) => self.slots[slot as usize] = packet,
                None => pending.push((target, packet)),
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        // Relocate the leftover packets as one contiguous run.
        let first_target = pending[0].0;
        if let Some(base) = self.find_empty_run(first_target, pending.len() as u32) {
            tracing::warn!(
                from = first_target,
                to = base,
                count = pending.len(),
                "packet group relocated to forward empty run"
            );
            for (i, (_, packet)) in pending.into_iter().enumerate() {
                self.slots[(base + i as u32) as usize] = packet;
            }
            return Ok(());
        }

        // Last resort: destructive overwrite beyond the reserve.
        for (target, packet) in pending {
            tracing::warn!(packet = target, "slot collision: overwriting occupied slot");
            self.overwrites += 1;
            self.slots[target as usize] = packet;
        }
        Ok(())
    }

    /// Outward probe around `target`: `p, p+1, p-1, p+2, p-2, ...`,
    /// bounded by the clip window, the reserve, and the slot array.
    fn probe(&self, target: u32, window_start: u32, window_end: u32) -> Option<u32> {
        let total = self.slots.len() as u32;
        let lo = window_start.max(RESERVED_PRELUDE_END + 1);
        let hi = window_end.min(total);
        let in_window = |p: u32| p >= lo && p < hi;

        if in_window(target) && self.slots[target as usize].is_empty() {
            return Some(target);
        }
        let span = hi.saturating_sub(lo);
        for delta in 1..span {
            let fwd = target.saturating_add(delta);
            if in_window(fwd) && self.slots[fwd as usize].is_empty() {
                return Some(fwd);
            }
            if let Some(back) = target.checked_sub(delta)
                && in_window(back)
                && self.slots[back as usize].is_empty()
            {
                return Some(back);
            }
        }
        None
    }

    /// First contiguous run of `len` empty slots at or after `from`,
    /// searching the whole remaining array.
    fn find_empty_run(&self, from: u32, len: u32) -> Option<u32> {
        let total = self.slots.len() as u32;
        let start = from.max(RESERVED_PRELUDE_END + 1);
        let mut run_base = start;
        let mut run_len = 0u32;
        for p in start..total {
            if self.slots[p as usize].is_empty() {
                if run_len == 0 {
                    run_base = p;
                }
                run_len += 1;
                if run_len >= len {
                    return Some(run_base);
                }
            } else {
                run_len = 0;
            }
        }
        None
    }

    /// Targets inside the reserved prelude relocate to just past it,
    /// with a diagnostic.
    fn clamp_reserved(&self, target: u32) -> u32 {
        if target <= RESERVED_PRELUDE_END {
            tracing::warn!(
                requested = target,
                relocated = RESERVED_PRELUDE_END + 1,
                "placement inside reserved prelude relocated"
            );
            RESERVED_PRELUDE_END + 1
        } else {
            target
        }
    }

    fn start_offset(&self, nominal: u32) -> u32 {
        self.start_offsets.get(&nominal).copied().unwrap_or(0)
    }

    fn advance_start_offset(&mut self, nominal: u32, emitted: u32) {
        *self.start_offsets.entry(nominal).or_insert(0) += emitted.min(START_OFFSET_CAP);
    }

    fn track_options(&self, track: u8) -> TrackOptions {
        TrackOptions {
            layer: track & 0x07,
            channel: self.track_channels[(track & 0x07) as usize],
        }
    }

    /// A table replacement takes over every index at once: the lease
    /// that held an index is truncated at the replacement packet and a
    /// fresh one starts there. Superseding first frees the index, so
    /// the preferred slot always wins and lease placement stays
    /// deterministic.
    fn track_palette_leases(
        &mut self,
        colors: &[Rgb; PALETTE_SIZE],
        at: u32,
        duration: Option<u32>,
        label: &str,
    ) {
        for (index, &color) in colors.iter().enumerate() {
            self.leases.supersede(index, at);
            self.leases.lease_color(color, duration, Some(index), at, label);
        }
    }

    // -----------------------------------------------------------------
    // Finalization
    // -----------------------------------------------------------------

    /// Empty slots already serialize as no-op filler; the only work
    /// left is the final-slot guarantee: players derive the stream's
    /// duration from the last non-empty packet.
    fn finalize(&mut self, any_clips: bool) {
        if !any_clips || self.slots.is_empty() {
            return;
        }
        let last = self.slots.len() - 1;
        if !self.slots[last].is_empty() {
            return;
        }
        if let Some(tail) = self.slots.iter().rposition(|p| !p.is_empty()) {
            self.slots[last] = self.slots[tail];
        } else {
            // Nothing scheduled at all: fall back to a palette load so
            // the stream still has a recognizable tail.
            self.slots[last] = Packet::palette_low(self.palette.entries());
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn slots(&self) -> &[Packet] {
        &self.slots
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn leases(&self) -> &LeaseManager {
        &self.leases
    }

    pub fn overwrite_count(&self) -> u32 {
        self.overwrites
    }

    pub fn clips_scheduled(&self) -> u32 {
        self.clips_scheduled
    }

    /// Serialize the slot array to wire bytes.
    pub fn emit(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.slots.len() * crate::packet::PACKET_SIZE);
        for slot in &self.slots {
            out.extend_from_slice(slot.as_bytes());
        }
        out
    }
}
