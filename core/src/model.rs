//! The clip data model the scheduler consumes.
//!
//! Clips are a closed sum type; the scheduler dispatches on the variant
//! with one function per kind. Ownership flows from the project tree
//! downward: clips are immutable once registered with an exporter.

use crate::palette::{PALETTE_SIZE, Rgb};
use crate::transition::Transition;

/// A fully resident 16-color indexed source image (decoded from a BMP
/// by the project layer).
#[derive(Clone, Debug)]
pub struct IndexedImage {
    pub width: usize,
    pub height: usize,
    pub palette: [Rgb; PALETTE_SIZE],
    /// Row-major, one palette index per pixel, `width * height` long.
    pub pixels: Vec<u8>,
}

impl IndexedImage {
    /// Pixel at (x, y), masked to 4 bits; 0 outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] & 0x0F
        } else {
            0
        }
    }

    /// A solid single-color image (used by tests and fills).
    pub fn solid(width: usize, height: usize, index: u8, palette: [Rgb; PALETTE_SIZE]) -> Self {
        Self {
            width,
            height,
            palette,
            pixels: vec![index & 0x0F; width * height],
        }
    }
}

/// Z-layer and subchannel assignment derived from a clip's track.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackOptions {
    pub layer: u8,
    pub channel: u8,
}

/// One bitmap draw within a BMP clip.
#[derive(Clone, Debug)]
pub struct BmpEvent {
    /// Packet offset of this event within the clip.
    pub offset: u32,
    pub source: IndexedImage,
    /// Destination rectangle in screen pixels.
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: u32,
    pub height: u32,
    /// Index used where sampling falls outside the source.
    pub fill_index: u8,
    /// Border-preset color emitted in the clip prelude.
    pub border_index: u8,
    /// With `should_composite`, pixels of this index become holes that
    /// expose lower layers.
    pub composite_index: u8,
    pub should_composite: bool,
    /// Whether this event replaces the global palette with the source's.
    pub load_palette: bool,
    pub transition: Transition,
    /// Packets the reveal is spread over. Zero means no content packets
    /// (the clip contributes only its prelude).
    pub transition_length: u32,
}

/// One text placement within a Text clip.
#[derive(Clone, Debug)]
pub struct TextEvent {
    pub offset: u32,
    /// Tile-aligned bounding box.
    pub box_left: u8,
    pub box_top: u8,
    pub box_width: u8,
    pub box_height: u8,
    pub line_index: u8,
    pub word_index: u16,
    pub karaoke_type: u8,
    pub transition: Option<Transition>,
}

/// Style carried by a Text clip as a whole.
#[derive(Clone, Debug)]
pub struct TextStyle {
    pub font_name: String,
    pub font_size: u32,
    pub foreground: u8,
    pub background: u8,
    pub outline: u8,
    pub frame: u8,
    pub karaoke_mode: u8,
    pub highlight_mode: u8,
    pub antialias: u8,
    pub default_palette: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_name: String::new(),
            font_size: 12,
            foreground: 1,
            background: 0,
            outline: 0,
            frame: 0,
            karaoke_mode: 0,
            highlight_mode: 0,
            antialias: 0,
            default_palette: 0,
        }
    }
}

/// Variant payloads.
#[derive(Clone, Debug)]
pub enum ClipKind {
    Bmp {
        events: Vec<BmpEvent>,
    },
    Text {
        content: String,
        style: TextStyle,
        events: Vec<TextEvent>,
    },
    Scroll {
        color: u8,
        h_dir: u8,
        h_offset: u8,
        v_dir: u8,
        v_offset: u8,
    },
    PaletteGlobal {
        colors: [Rgb; PALETTE_SIZE],
    },
}

/// A time-scheduled clip on one of eight tracks.
#[derive(Clone, Debug)]
pub struct Clip {
    /// Track 0-7; maps to a compositor layer and subcode channel.
    pub track: u8,
    /// First packet of the clip, inclusive.
    pub start: u32,
    pub duration: u32,
    pub kind: ClipKind,
}

impl Clip {
    /// One past the last packet this clip may touch.
    pub fn end(&self) -> u32 {
        self.start + self.duration
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ClipKind::Bmp { .. } => "bmp",
            ClipKind::Text { .. } => "text",
            ClipKind::Scroll { .. } => "scroll",
            ClipKind::PaletteGlobal { .. } => "palette",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DEFAULT_PALETTE;

    #[test]
    fn image_pixel_clamps_outside() {
        let img = IndexedImage::solid(4, 4, 9, DEFAULT_PALETTE);
        assert_eq!(img.pixel(0, 0), 9);
        assert_eq!(img.pixel(4, 0), 0);
        assert_eq!(img.pixel(0, 4), 0);
    }

    #[test]
    fn image_pixel_masks_index() {
        let img = IndexedImage {
            width: 1,
            height: 1,
            palette: DEFAULT_PALETTE,
            pixels: vec![0xFF],
        };
        assert_eq!(img.pixel(0, 0), 0x0F);
    }

    #[test]
    fn clip_end() {
        let clip = Clip {
            track: 0,
            start: 300,
            duration: 1800,
            kind: ClipKind::Scroll {
                color: 0,
                h_dir: 0,
                h_offset: 0,
                v_dir: 0,
                v_offset: 0,
            },
        };
        assert_eq!(clip.end(), 2100);
        assert_eq!(clip.kind_name(), "scroll");
    }
}
