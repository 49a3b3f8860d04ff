//! Reference replayer: reconstruct display state at any packet index
//! by applying a packet stream against a VRAM and palette model.
//!
//! Replay cost is bounded by snapshots taken every
//! [`SNAPSHOT_INTERVAL`] packets; `state_at` replays forward from the
//! nearest one. Used by round-trip tests and by the inspect command's
//! frame dumps.

use crate::packet::{
    PACKET_SIZE, Packet, SUB_BORDER_PRESET, SUB_MEMORY_PRESET, SUB_PALETTE_HIGH, SUB_PALETTE_LOW,
    SUB_TILE_COPY, SUB_TILE_XOR,
};
use crate::palette::{DEFAULT_PALETTE, PALETTE_SIZE, Rgb};
use crate::vram::{TILE_HEIGHT, TILE_WIDTH, Vram};

/// Packets between VRAM snapshots.
pub const SNAPSHOT_INTERVAL: u32 = 512;

#[derive(Debug)]
pub enum ReplayError {
    /// Stream length is not a multiple of the packet size.
    BadLength { bytes: usize },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadLength { bytes } => {
                write!(f, "stream of {bytes} bytes is not a whole number of 24-byte packets")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

/// Display state at one instant: pixels, palette, border color.
#[derive(Clone)]
pub struct ReplayState {
    pub vram: Vram,
    pub palette: [Rgb; PALETTE_SIZE],
    pub border: u8,
}

impl ReplayState {
    fn initial() -> Self {
        Self {
            vram: Vram::new(),
            palette: DEFAULT_PALETTE,
            border: 0,
        }
    }

    /// Apply one packet the way a player would. Scroll content moves
    /// are ignored; generated streams only carry zero-offset anchors.
    fn apply(&mut self, packet: &Packet) {
        if !packet.is_graphics() {
            return;
        }
        match packet.subcommand() {
            SUB_MEMORY_PRESET => self.vram.clear(packet.payload_byte(0)),
            SUB_BORDER_PRESET => self.border = packet.payload_byte(0) & 0x0F,
            SUB_TILE_COPY | SUB_TILE_XOR => self.apply_tile(packet),
            SUB_PALETTE_LOW => {
                self.palette[..8].copy_from_slice(&packet.unpack_palette());
            }
            SUB_PALETTE_HIGH => {
                self.palette[8..].copy_from_slice(&packet.unpack_palette());
            }
            _ => {}
        }
    }

    fn apply_tile(&mut self, packet: &Packet) {
        let color0 = packet.payload_byte(0) & 0x0F;
        let color1 = packet.payload_byte(1) & 0x0F;
        let by = (packet.payload_byte(2) & 0x1F) as usize;
        let bx = (packet.payload_byte(3) & 0x3F) as usize;
        let xor = packet.subcommand() == SUB_TILE_XOR;
        for dy in 0..TILE_HEIGHT {
            let mask = packet.payload_byte(4 + dy);
            for dx in 0..TILE_WIDTH {
                let value = if mask >> (5 - dx) & 1 == 1 { color1 } else { color0 };
                let (x, y) = (bx * TILE_WIDTH + dx, by * TILE_HEIGHT + dy);
                if xor {
                    let old = self.vram.get_pixel(x, y);
                    self.vram.set_pixel(x, y, old ^ value);
                } else {
                    self.vram.set_pixel(x, y, value);
                }
            }
        }
    }
}

/// A packet stream with precomputed periodic snapshots.
pub struct Replayer {
    packets: Vec<Packet>,
    /// `snapshots[i]` is the state after the first `i * SNAPSHOT_INTERVAL`
    /// packets; `snapshots[0]` is the power-on state.
    snapshots: Vec<ReplayState>,
}

impl Replayer {
    /// Parse a raw CDG stream.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        if bytes.len() % PACKET_SIZE != 0 {
            return Err(ReplayError::BadLength { bytes: bytes.len() });
        }
        let packets = bytes
            .chunks_exact(PACKET_SIZE)
            .map(Packet::from_bytes)
            .collect();
        Ok(Self::new(packets))
    }

    pub fn new(packets: Vec<Packet>) -> Self {
        let mut snapshots = vec![ReplayState::initial()];
        let mut state = ReplayState::initial();
        for (i, packet) in packets.iter().enumerate() {
            state.apply(packet);
            if (i + 1) as u32 % SNAPSHOT_INTERVAL == 0 {
                snapshots.push(state.clone());
            }
        }
        Self { packets, snapshots }
    }

    pub fn packet_count(&self) -> u32 {
        self.packets.len() as u32
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Display state after applying packets `0..=packet`, replayed
    /// forward from the nearest snapshot at or before it.
    pub fn state_at(&self, packet: u32) -> ReplayState {
        let applied_goal = (packet as usize + 1).min(self.packets.len());
        let snap_index = (applied_goal / SNAPSHOT_INTERVAL as usize).min(self.snapshots.len() - 1);
        let mut state = self.snapshots[snap_index].clone();
        let applied = snap_index * SNAPSHOT_INTERVAL as usize;
        for p in &self.packets[applied..applied_goal] {
            state.apply(p);
        }
        state
    }

    /// Final display state of the whole stream.
    pub fn final_state(&self) -> ReplayState {
        match self.packet_count() {
            0 => ReplayState::initial(),
            n => self.state_at(n - 1),
        }
    }
}
