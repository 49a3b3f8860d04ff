//! Big-endian binary reader for `.cmp` project files.
//!
//! The format is a sequence of null-terminated literal markers followed
//! by fixed-order fields. Strings are null-terminated; integers are
//! 32-bit big-endian. BMP events store height before width. The clip
//! count historically includes a trailing empty-marker position, so a
//! file whose last record is missing is accepted as `count - 1` clips.

use crate::record::{
    BmpEventRecord, ClipRecord, ClipRecordKind, PalEventRecord, ProjectFile, ScrollEventRecord,
    TextEventRecord,
};

pub const HEADER_MARKER: &[u8] = b"CDGMagic_ProjectFile::\0";
pub const AUDIO_MARKER: &[u8] = b"CDGMagic_AudioPlayback::\0";
pub const TRACK_MARKER: &[u8] = b"CDGMagic_TrackOptions::\0";
pub const BMP_CLIP_MARKER: &[u8] = b"CDGMagic_BMPClip::";
pub const TEXT_CLIP_MARKER: &[u8] = b"CDGMagic_TextClip::";
pub const SCROLL_CLIP_MARKER: &[u8] = b"CDGMagic_ScrollClip::";
pub const PAL_CLIP_MARKER: &[u8] = b"CDGMagic_PALGlobalClip::";

/// Project-file parse failures, with the byte offset where parsing
/// stopped.
#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    MissingMarker { offset: usize, expected: &'static str },
    Truncated { offset: usize, what: &'static str },
    UnknownClipType { offset: usize },
    UnterminatedString { offset: usize },
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingMarker { offset, expected } => {
                write!(f, "missing marker {expected:?} at byte {offset}")
            }
            Self::Truncated { offset, what } => {
                write!(f, "truncated {what} at byte {offset}")
            }
            Self::UnknownClipType { offset } => {
                write!(f, "unknown clip type at byte {offset}")
            }
            Self::UnterminatedString { offset } => {
                write!(f, "unterminated string at byte {offset}")
            }
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<std::io::Error> for ProjectError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, ProjectError> {
        let b = *self.data.get(self.pos).ok_or(ProjectError::Truncated {
            offset: self.pos,
            what,
        })?;
        self.pos += 1;
        Ok(b)
    }

    fn i32(&mut self, what: &'static str) -> Result<i32, ProjectError> {
        if self.pos + 4 > self.data.len() {
            return Err(ProjectError::Truncated {
                offset: self.pos,
                what,
            });
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.data[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(i32::from_be_bytes(raw))
    }

    fn cstring(&mut self) -> Result<String, ProjectError> {
        let start = self.pos;
        let nul = self.remaining().iter().position(|&b| b == 0).ok_or(
            ProjectError::UnterminatedString { offset: start },
        )?;
        let s = String::from_utf8_lossy(&self.data[start..start + nul]).into_owned();
        self.pos = start + nul + 1;
        Ok(s)
    }

    fn literal(&mut self, marker: &[u8], name: &'static str) -> Result<(), ProjectError> {
        if self.remaining().starts_with(marker) {
            self.pos += marker.len();
            Ok(())
        } else {
            Err(ProjectError::MissingMarker {
                offset: self.pos,
                expected: name,
            })
        }
    }

    fn starts_with(&self, marker: &[u8]) -> bool {
        self.remaining().starts_with(marker)
    }
}

/// Parse a complete `.cmp` image.
pub fn parse(data: &[u8]) -> Result<ProjectFile, ProjectError> {
    let mut r = Reader::new(data);
    r.literal(HEADER_MARKER, "CDGMagic_ProjectFile::")?;

    r.literal(AUDIO_MARKER, "CDGMagic_AudioPlayback::")?;
    let audio_path = r.cstring()?;
    let play_position = r.i32("audio play position")?;

    r.literal(TRACK_MARKER, "CDGMagic_TrackOptions::")?;
    let mut track_channels = [0i8; 8];
    for ch in &mut track_channels {
        *ch = r.u8("track channel")? as i8;
    }

    let clip_count = r.i32("clip count")?.max(0) as usize;
    let mut clips = Vec::with_capacity(clip_count);
    for index in 0..clip_count {
        // Trailing empty-marker tolerance: the count may include one
        // position past the real records.
        let last = index + 1 == clip_count;
        if last && (r.at_end() || r.remaining().iter().all(|&b| b == 0)) {
            break;
        }
        clips.push(parse_clip(&mut r)?);
    }

    Ok(ProjectFile {
        audio_path,
        play_position,
        track_channels,
        clips,
    })
}

fn parse_clip(r: &mut Reader<'_>) -> Result<ClipRecord, ProjectError> {
    if r.starts_with(BMP_CLIP_MARKER) {
        r.literal(BMP_CLIP_MARKER, "CDGMagic_BMPClip::")?;
        let (track, start, duration, event_count) = parse_clip_header(r)?;
        let mut events = Vec::with_capacity(event_count);
        for _ in 0..event_count {
            events.push(parse_bmp_event(r)?);
        }
        Ok(ClipRecord {
            track,
            start,
            duration,
            kind: ClipRecordKind::Bmp { events },
        })
    } else if r.starts_with(TEXT_CLIP_MARKER) {
        r.literal(TEXT_CLIP_MARKER, "CDGMagic_TextClip::")?;
        let (track, start, duration, event_count) = parse_clip_header(r)?;
        let content = r.cstring()?;
        let font_name = r.cstring()?;
        let font_size = r.i32("font size")?;
        let colors = [
            r.u8("foreground index")?,
            r.u8("background index")?,
            r.u8("outline index")?,
            r.u8("frame index")?,
        ];
        let karaoke_mode = r.u8("karaoke mode")?;
        let highlight_mode = r.u8("highlight mode")?;
        let antialias = r.u8("antialias mode")?;
        let default_palette = r.u8("default palette selector")?;
        let mut events = Vec::with_capacity(event_count);
        for _ in 0..event_count {
            events.push(parse_text_event(r)?);
        }
        Ok(ClipRecord {
            track,
            start,
            duration,
            kind: ClipRecordKind::Text {
                content,
                font_name,
                font_size,
                colors,
                karaoke_mode,
                highlight_mode,
                antialias,
                default_palette,
                events,
            },
        })
    } else if r.starts_with(SCROLL_CLIP_MARKER) {
        r.literal(SCROLL_CLIP_MARKER, "CDGMagic_ScrollClip::")?;
        let (track, start, duration, event_count) = parse_clip_header(r)?;
        let mut events = Vec::with_capacity(event_count);
        for _ in 0..event_count {
            events.push(ScrollEventRecord {
                offset: r.i32("scroll event offset")?,
                color: r.u8("scroll color")?,
                h_dir: r.u8("scroll h direction")?,
                h_offset: r.u8("scroll h offset")?,
                v_dir: r.u8("scroll v direction")?,
                v_offset: r.u8("scroll v offset")?,
            });
        }
        Ok(ClipRecord {
            track,
            start,
            duration,
            kind: ClipRecordKind::Scroll { events },
        })
    } else if r.starts_with(PAL_CLIP_MARKER) {
        r.literal(PAL_CLIP_MARKER, "CDGMagic_PALGlobalClip::")?;
        let (track, start, duration, event_count) = parse_clip_header(r)?;
        let mut events = Vec::with_capacity(event_count);
        for _ in 0..event_count {
            let offset = r.i32("palette event offset")?;
            let mut colors = [[0u8; 3]; 16];
            for rgb in &mut colors {
                rgb[0] = r.u8("palette red")?;
                rgb[1] = r.u8("palette green")?;
                rgb[2] = r.u8("palette blue")?;
            }
            events.push(PalEventRecord { offset, colors });
        }
        Ok(ClipRecord {
            track,
            start,
            duration,
            kind: ClipRecordKind::PalGlobal { events },
        })
    } else {
        Err(ProjectError::UnknownClipType { offset: r.pos })
    }
}

fn parse_clip_header(r: &mut Reader<'_>) -> Result<(u8, i32, i32, usize), ProjectError> {
    let track = r.u8("clip track")?;
    let start = r.i32("clip start")?;
    let duration = r.i32("clip duration")?;
    let event_count = r.i32("clip event count")?.max(0) as usize;
    Ok((track, start, duration, event_count))
}

fn parse_bmp_event(r: &mut Reader<'_>) -> Result<BmpEventRecord, ProjectError> {
    let offset = r.i32("bmp event offset")?;
    let bmp_path = r.cstring()?;
    // Height precedes width on the wire.
    let height = r.i32("bmp event height")?;
    let width = r.i32("bmp event width")?;
    let x_offset = r.i32("bmp event x offset")?;
    let y_offset = r.i32("bmp event y offset")?;
    let fill_index = r.u8("fill index")?;
    let border_index = r.u8("border index")?;
    let composite_index = r.u8("composite index")?;
    let should_composite = r.u8("composite flag")?;
    let load_palette = r.u8("palette flag")?;
    let transition_path = r.cstring()?;
    let transition_length = r.i32("transition length")?;
    Ok(BmpEventRecord {
        offset,
        bmp_path,
        height,
        width,
        x_offset,
        y_offset,
        fill_index,
        border_index,
        composite_index,
        should_composite,
        load_palette,
        transition_path,
        transition_length,
    })
}

fn parse_text_event(r: &mut Reader<'_>) -> Result<TextEventRecord, ProjectError> {
    Ok(TextEventRecord {
        offset: r.i32("text event offset")?,
        box_left: r.i32("text box left")?,
        box_top: r.i32("text box top")?,
        box_width: r.i32("text box width")?,
        box_height: r.i32("text box height")?,
        line_index: r.i32("text line index")?,
        word_index: r.i32("text word index")?,
        karaoke_type: r.u8("karaoke type")?,
        transition_path: r.cstring()?,
    })
}
