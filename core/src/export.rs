//! Top-level export orchestration: register clips, drive the
//! scheduler, validate, and emit the binary stream.
//!
//! An exporter is a pure function of its inputs: every piece of mutable
//! state (VRAM, compositor, palette, slot array) is created when `run`
//! starts and dropped when it returns. Two exports from the same input
//! produce byte-identical output; independent exports share nothing.

use crate::model::Clip;
use crate::packet::PACKET_SIZE;
use crate::schedule::Scheduler;

/// Errors surfaced by the export pipeline.
#[derive(Debug)]
pub enum ExportError {
    /// The computed total duration is zero packets.
    NoPackets,

    /// Clips were registered but none of them could be scheduled.
    NoClipsScheduled,

    /// A clip failed validation at registration.
    InvalidClip {
        index: usize,
        kind: &'static str,
        reason: String,
    },

    /// A packet targeted a slot beyond the stream. Placements fail
    /// loudly rather than wrap.
    PlacementOutOfRange { packet: u32, total: u32 },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPackets => write!(f, "export duration is zero packets"),
            Self::NoClipsScheduled => write!(f, "no registered clip could be scheduled"),
            Self::InvalidClip { index, kind, reason } => {
                write!(f, "clip {index} ({kind}): {reason}")
            }
            Self::PlacementOutOfRange { packet, total } => {
                write!(f, "packet {packet} outside stream of {total} packets")
            }
        }
    }
}

impl std::error::Error for ExportError {}

/// Result of a completed export.
pub struct ExportOutput {
    /// The full CDG stream, exactly `24 * total_packets` bytes.
    pub bytes: Vec<u8>,
    pub total_packets: u32,
    /// Destructive overwrites the allocator had to perform.
    pub overwrites: u32,
}

/// Builder for one export run.
pub struct Exporter {
    explicit_duration: u32,
    clips: Vec<Clip>,
    track_channels: [u8; 8],
}

impl Exporter {
    /// `duration` is the explicit stream length in packets; the actual
    /// length grows to cover the latest clip end.
    pub fn new(duration: u32) -> Self {
        Self {
            explicit_duration: duration,
            clips: Vec::new(),
            track_channels: [0; 8],
        }
    }

    /// Per-track subcode channel assignment from the project's track
    /// options.
    pub fn set_track_channels(&mut self, channels: [u8; 8]) {
        self.track_channels = channels;
    }

    /// Register a clip. Clips are immutable once registered; order of
    /// registration breaks start-packet ties during scheduling.
    pub fn register(&mut self, clip: Clip) -> Result<(), ExportError> {
        if clip.track > 7 {
            return Err(ExportError::InvalidClip {
                index: self.clips.len(),
                kind: clip.kind_name(),
                reason: format!("track {} out of range 0-7", clip.track),
            });
        }
        self.clips.push(clip);
        Ok(())
    }

    /// Total stream length: the explicit duration or the highest clip
    /// end, whichever is later.
    pub fn total_packets(&self) -> u32 {
        self.clips
            .iter()
            .map(Clip::end)
            .max()
            .unwrap_or(0)
            .max(self.explicit_duration)
    }

    /// Run the export to completion.
    pub fn run(self) -> Result<ExportOutput, ExportError> {
        let total = self.total_packets();
        if total == 0 {
            return Err(ExportError::NoPackets);
        }

        let mut scheduler = Scheduler::new(total, self.track_channels);
        scheduler.run(&self.clips)?;

        if !self.clips.is_empty() && scheduler.clips_scheduled() == 0 {
            return Err(ExportError::NoClipsScheduled);
        }

        let bytes = scheduler.emit();
        debug_assert_eq!(bytes.len(), total as usize * PACKET_SIZE);
        Ok(ExportOutput {
            bytes,
            total_packets: total,
            overwrites: scheduler.overwrite_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClipKind;

    fn scroll_clip(track: u8, start: u32, duration: u32) -> Clip {
        Clip {
            track,
            start,
            duration,
            kind: ClipKind::Scroll {
                color: 0,
                h_dir: 0,
                h_offset: 0,
                v_dir: 0,
                v_offset: 0,
            },
        }
    }

    #[test]
    fn zero_duration_export_fails() {
        assert!(matches!(
            Exporter::new(0).run(),
            Err(ExportError::NoPackets)
        ));
    }

    #[test]
    fn empty_project_exports_padding() {
        let out = Exporter::new(300).run().unwrap();
        assert_eq!(out.bytes.len(), 300 * PACKET_SIZE);
        assert_eq!(out.total_packets, 300);
        assert_eq!(out.overwrites, 0);
    }

    #[test]
    fn duration_grows_to_cover_clips() {
        let mut exp = Exporter::new(300);
        exp.register(scroll_clip(0, 400, 200)).unwrap();
        assert_eq!(exp.total_packets(), 600);
    }

    #[test]
    fn track_out_of_range_rejected() {
        let mut exp = Exporter::new(300);
        let err = exp.register(scroll_clip(8, 0, 10)).unwrap_err();
        assert!(matches!(err, ExportError::InvalidClip { .. }));
    }

    #[test]
    fn deterministic_output() {
        let build = || {
            let mut exp = Exporter::new(1200);
            exp.register(scroll_clip(0, 300, 100)).unwrap();
            exp.register(scroll_clip(1, 300, 100)).unwrap();
            exp.run().unwrap().bytes
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn output_length_is_exact() {
        let mut exp = Exporter::new(500);
        exp.register(scroll_clip(0, 300, 100)).unwrap();
        let out = exp.run().unwrap();
        assert_eq!(out.bytes.len(), out.total_packets as usize * PACKET_SIZE);
    }
}
