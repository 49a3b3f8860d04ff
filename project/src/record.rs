//! Parsed project-file records.
//!
//! Records mirror the on-disk layout byte for byte: clips keep their
//! asset paths and raw integer fields, so parse -> write -> parse is a
//! structural identity. The asset resolver turns records into core
//! clips by loading the referenced files.

/// A parsed `.cmp` project file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectFile {
    pub audio_path: String,
    pub play_position: i32,
    /// One subcode channel byte per track.
    pub track_channels: [i8; 8],
    pub clips: Vec<ClipRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipRecord {
    pub track: u8,
    pub start: i32,
    pub duration: i32,
    pub kind: ClipRecordKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClipRecordKind {
    Bmp {
        events: Vec<BmpEventRecord>,
    },
    Text {
        content: String,
        font_name: String,
        font_size: i32,
        /// Foreground, background, outline, frame palette indices.
        colors: [u8; 4],
        karaoke_mode: u8,
        highlight_mode: u8,
        antialias: u8,
        default_palette: u8,
        events: Vec<TextEventRecord>,
    },
    Scroll {
        events: Vec<ScrollEventRecord>,
    },
    PalGlobal {
        events: Vec<PalEventRecord>,
    },
}

/// One bitmap event. Field order matches the wire: height precedes
/// width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BmpEventRecord {
    pub offset: i32,
    pub bmp_path: String,
    pub height: i32,
    pub width: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub fill_index: u8,
    pub border_index: u8,
    pub composite_index: u8,
    pub should_composite: u8,
    pub load_palette: u8,
    /// Empty string means the default transition.
    pub transition_path: String,
    pub transition_length: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEventRecord {
    pub offset: i32,
    pub box_left: i32,
    pub box_top: i32,
    pub box_width: i32,
    pub box_height: i32,
    pub line_index: i32,
    pub word_index: i32,
    pub karaoke_type: u8,
    pub transition_path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollEventRecord {
    pub offset: i32,
    pub color: u8,
    pub h_dir: u8,
    pub h_offset: u8,
    pub v_dir: u8,
    pub v_offset: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PalEventRecord {
    pub offset: i32,
    /// Sixteen RGB triples at 8 bits per channel.
    pub colors: [[u8; 3]; 16],
}

impl ClipRecord {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ClipRecordKind::Bmp { .. } => "bmp",
            ClipRecordKind::Text { .. } => "text",
            ClipRecordKind::Scroll { .. } => "scroll",
            ClipRecordKind::PalGlobal { .. } => "palette",
        }
    }
}
