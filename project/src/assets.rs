//! Asset loading and clip resolution: turn parsed project records into
//! core clips, reading the BMP and transition files they reference.
//!
//! Failure policy follows the historical tool: a missing or malformed
//! transition falls back to the default sweep with a warning, while a
//! missing or malformed BMP skips the whole clip with a warning. All
//! reads are blocking; every asset is fully resident before any of its
//! packets are produced.

use std::path::Path;

use cdg_core::model::{BmpEvent, Clip, ClipKind, IndexedImage, TextEvent, TextStyle};
use cdg_core::palette::{PALETTE_SIZE, Rgb};
use cdg_core::transition::Transition;

use crate::record::{ClipRecord, ClipRecordKind, ProjectFile};
use crate::{bmp, paths, transition_file};

/// Errors from loading a single asset file.
#[derive(Debug)]
pub enum AssetError {
    /// Underlying I/O error (file not found, permission denied, ...).
    Io(std::io::Error),

    /// BMP does not start with "BM".
    BadSignature,

    /// BMP is not 8 bits per pixel indexed.
    UnsupportedBpp { bpp: u16 },

    /// BMP DIB header smaller than BITMAPINFOHEADER.
    BadDibSize { size: u32 },

    /// BMP width or height unusable.
    BadDimensions { width: i32, height: i32 },

    /// BMP ends before its declared palette or pixel data.
    TruncatedBmp { len: usize },

    /// Transition file is not exactly 1,536 bytes.
    BadTransitionLength { len: usize },
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::BadSignature => write!(f, "not a BMP file (missing BM signature)"),
            Self::UnsupportedBpp { bpp } => {
                write!(f, "unsupported BMP depth: {bpp} bpp (need 8 bpp indexed)")
            }
            Self::BadDibSize { size } => write!(f, "BMP DIB header too small: {size} bytes"),
            Self::BadDimensions { width, height } => {
                write!(f, "unusable BMP dimensions {width}x{height}")
            }
            Self::TruncatedBmp { len } => write!(f, "BMP truncated at {len} bytes"),
            Self::BadTransitionLength { len } => {
                write!(f, "transition file is {len} bytes, expected 1536")
            }
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Path resolution and file loading for one export run.
pub struct AssetResolver {
    assets_root: String,
    normalize_paths: bool,
}

impl AssetResolver {
    pub fn new(assets_root: impl Into<String>) -> Self {
        Self {
            assets_root: assets_root.into(),
            normalize_paths: true,
        }
    }

    /// Disable path normalization (round-trip-fidelity serialization).
    pub fn without_normalization(mut self) -> Self {
        self.normalize_paths = false;
        self
    }

    fn resolve(&self, raw: &str) -> String {
        if self.normalize_paths {
            paths::normalize(raw, &self.assets_root)
        } else {
            raw.to_string()
        }
    }

    fn load_bmp(&self, raw: &str) -> Result<IndexedImage, AssetError> {
        let path = self.resolve(raw);
        let bytes = std::fs::read(Path::new(&path))?;
        bmp::decode(&bytes)
    }

    /// Load a transition, falling back to the default column-major
    /// sweep when the path is empty, missing, or malformed.
    fn load_transition(&self, raw: &str) -> Transition {
        if raw.is_empty() {
            return Transition::column_major();
        }
        let path = self.resolve(raw);
        let result = std::fs::read(Path::new(&path))
            .map_err(AssetError::from)
            .and_then(|bytes| transition_file::decode(&bytes));
        match result {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "transition unavailable, using default sweep");
                Transition::column_major()
            }
        }
    }
}

/// Resolve every clip record against the file system. Clips whose
/// assets cannot be loaded are skipped with a warning; the remaining
/// clips keep their registration order.
pub fn resolve_clips(project: &ProjectFile, resolver: &AssetResolver) -> Vec<Clip> {
    let mut clips = Vec::with_capacity(project.clips.len());
    for (index, record) in project.clips.iter().enumerate() {
        match resolve_clip(record, resolver) {
            Ok(clip) => clips.push(clip),
            Err(e) => {
                tracing::warn!(
                    index,
                    kind = record.kind_name(),
                    error = %e,
                    "clip skipped: asset unavailable"
                );
            }
        }
    }
    clips
}

fn resolve_clip(record: &ClipRecord, resolver: &AssetResolver) -> Result<Clip, AssetError> {
    let start = record.start.max(0) as u32;
    let duration = record.duration.max(0) as u32;
    let kind = match &record.kind {
        ClipRecordKind::Bmp { events } => {
            let mut resolved = Vec::with_capacity(events.len());
            for ev in events {
                let source = resolver.load_bmp(&ev.bmp_path)?;
                let transition = resolver.load_transition(&ev.transition_path);
                resolved.push(BmpEvent {
                    offset: ev.offset.max(0) as u32,
                    source,
                    x_offset: ev.x_offset,
                    y_offset: ev.y_offset,
                    width: ev.width.max(0) as u32,
                    height: ev.height.max(0) as u32,
                    fill_index: ev.fill_index & 0x0F,
                    border_index: ev.border_index & 0x0F,
                    composite_index: ev.composite_index & 0x0F,
                    should_composite: ev.should_composite != 0,
                    load_palette: ev.load_palette != 0,
                    transition,
                    transition_length: ev.transition_length.max(0) as u32,
                });
            }
            ClipKind::Bmp { events: resolved }
        }
        ClipRecordKind::Text {
            content,
            font_name,
            font_size,
            colors,
            karaoke_mode,
            highlight_mode,
            antialias,
            default_palette,
            events,
        } => ClipKind::Text {
            content: content.clone(),
            style: TextStyle {
                font_name: font_name.clone(),
                font_size: (*font_size).max(0) as u32,
                foreground: colors[0] & 0x0F,
                background: colors[1] & 0x0F,
                outline: colors[2] & 0x0F,
                frame: colors[3] & 0x0F,
                karaoke_mode: *karaoke_mode,
                highlight_mode: *highlight_mode,
                antialias: *antialias,
                default_palette: *default_palette,
            },
            events: events
                .iter()
                .map(|ev| TextEvent {
                    offset: ev.offset.max(0) as u32,
                    box_left: ev.box_left.clamp(0, 49) as u8,
                    box_top: ev.box_top.clamp(0, 17) as u8,
                    box_width: ev.box_width.clamp(0, 50) as u8,
                    box_height: ev.box_height.clamp(0, 18) as u8,
                    line_index: ev.line_index.clamp(0, 255) as u8,
                    word_index: ev.word_index.clamp(0, i32::from(u16::MAX)) as u16,
                    karaoke_type: ev.karaoke_type,
                    transition: if ev.transition_path.is_empty() {
                        None
                    } else {
                        Some(resolver.load_transition(&ev.transition_path))
                    },
                })
                .collect(),
        },
        ClipRecordKind::Scroll { events } => {
            let ev = events.first();
            ClipKind::Scroll {
                color: ev.map_or(0, |e| e.color & 0x0F),
                h_dir: ev.map_or(0, |e| e.h_dir),
                h_offset: ev.map_or(0, |e| e.h_offset),
                v_dir: ev.map_or(0, |e| e.v_dir),
                v_offset: ev.map_or(0, |e| e.v_offset),
            }
        }
        ClipRecordKind::PalGlobal { events } => {
            let mut colors = [Rgb::BLACK; PALETTE_SIZE];
            if let Some(ev) = events.first() {
                for (dst, src) in colors.iter_mut().zip(ev.colors.iter()) {
                    *dst = Rgb::new(src[0], src[1], src[2]);
                }
            }
            ClipKind::PaletteGlobal { colors }
        }
    };
    Ok(Clip {
        track: record.track,
        start,
        duration,
        kind,
    })
}
