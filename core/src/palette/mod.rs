//! Palette lifecycle: the global 16-entry color table, change tracking
//! by half (entries 0-7 vs 8-15), and the optional lease allocator.

pub mod lease;

pub use lease::{Lease, LeaseManager, LeaseStatus};

/// Number of palette entries a CD+G display can show at once.
pub const PALETTE_SIZE: usize = 16;

/// One palette color, stored at 8 bits per channel. The wire carries
/// 4 bits per channel; [`Rgb::quantize`] snaps a color to exactly what
/// a player will reconstruct.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Truncate to the 4-bit wire precision and expand back. Idempotent;
    /// identity on channels that are already multiples of 17.
    pub fn quantize(self) -> Self {
        Self {
            r: (self.r / 17) * 17,
            g: (self.g / 17) * 17,
            b: (self.b / 17) * 17,
        }
    }
}

/// Power-on palette. Matches the historical tool's default table:
/// black, yellow, gray, white, a blue ramp, a red ramp, a green ramp,
/// then cyan, magenta, and dark gray. All channels are multiples of 17
/// so the table survives the 4-bit wire unchanged.
pub const DEFAULT_PALETTE: [Rgb; PALETTE_SIZE] = [
    Rgb::new(0, 0, 0),       // 0: black
    Rgb::new(255, 255, 0),   // 1: yellow
    Rgb::new(136, 136, 136), // 2: gray
    Rgb::new(255, 255, 255), // 3: white
    Rgb::new(0, 0, 136),     // 4: dark blue
    Rgb::new(0, 0, 255),     // 5: blue
    Rgb::new(102, 102, 255), // 6: light blue
    Rgb::new(136, 0, 0),     // 7: dark red
    Rgb::new(255, 0, 0),     // 8: red
    Rgb::new(255, 102, 102), // 9: light red
    Rgb::new(0, 136, 0),     // 10: dark green
    Rgb::new(0, 255, 0),     // 11: green
    Rgb::new(102, 255, 102), // 12: light green
    Rgb::new(0, 255, 255),   // 13: cyan
    Rgb::new(255, 0, 255),   // 14: magenta
    Rgb::new(68, 68, 68),    // 15: dark gray
];

/// A recorded palette mutation: which halves changed at which packet.
/// Consecutive changes at the same packet are merged into one event so
/// the emitter issues at most one low and one high load per instant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PaletteEvent {
    pub packet: u32,
    pub low_changed: bool,
    pub high_changed: bool,
}

/// The export-scoped palette: current entries plus the change log the
/// scheduler consumes to place palette-load packets.
pub struct Palette {
    entries: [Rgb; PALETTE_SIZE],
    events: Vec<PaletteEvent>,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            entries: DEFAULT_PALETTE,
            events: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Rgb {
        self.entries[index]
    }

    /// Set one entry at `packet`, marking the containing half dirty.
    pub fn set_entry(&mut self, index: usize, color: Rgb, packet: u32) {
        self.entries[index] = color;
        self.record(packet, index < 8, index >= 8);
    }

    /// Replace the whole table (a BMP clip loading its embedded colors).
    /// Both halves are marked dirty.
    pub fn replace(&mut self, table: &[Rgb; PALETTE_SIZE], packet: u32) {
        self.entries = *table;
        self.record(packet, true, true);
    }

    /// Change events in packet order, same-packet events merged.
    pub fn events(&self) -> &[PaletteEvent] {
        &self.events
    }

    fn record(&mut self, packet: u32, low: bool, high: bool) {
        if let Some(last) = self.events.last_mut()
            && last.packet == packet
        {
            last.low_changed |= low;
            last.high_changed |= high;
            return;
        }
        self.events.push(PaletteEvent {
            packet,
            low_changed: low,
            high_changed: high,
        });
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
