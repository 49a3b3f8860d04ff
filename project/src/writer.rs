//! Big-endian serializer for `.cmp` project files. Mirrors the parser
//! field for field; the clip count written is the real record count
//! (no trailing empty-marker position).

use crate::parser::{
    AUDIO_MARKER, BMP_CLIP_MARKER, HEADER_MARKER, PAL_CLIP_MARKER, SCROLL_CLIP_MARKER,
    TEXT_CLIP_MARKER, TRACK_MARKER,
};
use crate::record::{ClipRecord, ClipRecordKind, ProjectFile};

/// Serialize a project to its on-disk image.
pub fn write(project: &ProjectFile) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(HEADER_MARKER);

    out.extend_from_slice(AUDIO_MARKER);
    push_cstring(&mut out, &project.audio_path);
    push_i32(&mut out, project.play_position);

    out.extend_from_slice(TRACK_MARKER);
    for &ch in &project.track_channels {
        out.push(ch as u8);
    }

    push_i32(&mut out, project.clips.len() as i32);
    for clip in &project.clips {
        write_clip(&mut out, clip);
    }
    out
}

fn write_clip(out: &mut Vec<u8>, clip: &ClipRecord) {
    match &clip.kind {
        ClipRecordKind::Bmp { events } => {
            out.extend_from_slice(BMP_CLIP_MARKER);
            write_clip_header(out, clip, events.len());
            for ev in events {
                push_i32(out, ev.offset);
                push_cstring(out, &ev.bmp_path);
                // Height precedes width on the wire.
                push_i32(out, ev.height);
                push_i32(out, ev.width);
                push_i32(out, ev.x_offset);
                push_i32(out, ev.y_offset);
                out.push(ev.fill_index);
                out.push(ev.border_index);
                out.push(ev.composite_index);
                out.push(ev.should_composite);
                out.push(ev.load_palette);
                push_cstring(out, &ev.transition_path);
                push_i32(out, ev.transition_length);
            }
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
        } => {
            out.extend_from_slice(TEXT_CLIP_MARKER);
            write_clip_header(out, clip, events.len());
            push_cstring(out, content);
            push_cstring(out, font_name);
            push_i32(out, *font_size);
            out.extend_from_slice(colors);
            out.push(*karaoke_mode);
            out.push(*highlight_mode);
            out.push(*antialias);
            out.push(*default_palette);
            for ev in events {
                push_i32(out, ev.offset);
                push_i32(out, ev.box_left);
                push_i32(out, ev.box_top);
                push_i32(out, ev.box_width);
                push_i32(out, ev.box_height);
                push_i32(out, ev.line_index);
                push_i32(out, ev.word_index);
                out.push(ev.karaoke_type);
                push_cstring(out, &ev.transition_path);
            }
        }
        ClipRecordKind::Scroll { events } => {
            out.extend_from_slice(SCROLL_CLIP_MARKER);
            write_clip_header(out, clip, events.len());
            for ev in events {
                push_i32(out, ev.offset);
                out.push(ev.color);
                out.push(ev.h_dir);
                out.push(ev.h_offset);
                out.push(ev.v_dir);
                out.push(ev.v_offset);
            }
        }
        ClipRecordKind::PalGlobal { events } => {
            out.extend_from_slice(PAL_CLIP_MARKER);
            write_clip_header(out, clip, events.len());
            for ev in events {
                push_i32(out, ev.offset);
                for rgb in &ev.colors {
                    out.extend_from_slice(rgb);
                }
            }
        }
    }
}

fn write_clip_header(out: &mut Vec<u8>, clip: &ClipRecord, event_count: usize) {
    out.push(clip.track);
    push_i32(out, clip.start);
    push_i32(out, clip.duration);
    push_i32(out, event_count as i32);
}

fn push_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_cstring(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}
