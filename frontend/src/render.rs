//! The render subcommand: project in, packet stream out, with an
//! optional byte diff against a reference stream.

use std::error::Error;
use std::path::Path;

use cdg_core::model::ClipKind;
use cdg_core::packet::PACKET_SIZE;
use cdg_core::prelude::*;
use cdg_project::{AssetResolver, load_project, resolve_clips};

use crate::checksum::crc32;
use crate::config::Config;

/// Returns `Ok(true)` on success (and reference match when one is
/// given), `Ok(false)` on a reference mismatch.
pub fn run(
    input: &Path,
    output: &Path,
    reference: Option<&Path>,
    no_text_clips: bool,
    assets_root: Option<String>,
) -> Result<bool, Box<dyn Error>> {
    let config = Config::load();
    let root = assets_root
        .or(config.assets_root)
        .unwrap_or_default();

    let project = load_project(input)?;
    tracing::info!(
        clips = project.clips.len(),
        audio = %project.audio_path,
        "project loaded"
    );

    let resolver = AssetResolver::new(root);
    let mut clips = resolve_clips(&project, &resolver);
    if no_text_clips {
        let before = clips.len();
        clips.retain(|c| !matches!(c.kind, ClipKind::Text { .. }));
        tracing::info!(excluded = before - clips.len(), "text clips excluded");
    }

    // The stored play position doubles as the explicit stream length;
    // clips past it grow the stream.
    let mut exporter = Exporter::new(project.play_position.max(0) as u32);
    let mut channels = [0u8; 8];
    for (dst, &src) in channels.iter_mut().zip(project.track_channels.iter()) {
        *dst = src.max(0) as u8;
    }
    exporter.set_track_channels(channels);
    for clip in clips {
        exporter.register(clip)?;
    }

    let out = exporter.run()?;
    std::fs::write(output, &out.bytes)?;
    let checksum = format!("{:08X}", crc32(&out.bytes));
    tracing::info!(
        packets = out.total_packets,
        bytes = out.bytes.len(),
        crc32 = %checksum,
        overwrites = out.overwrites,
        "stream written"
    );

    match reference {
        None => Ok(true),
        Some(ref_path) => {
            let reference_bytes = std::fs::read(ref_path)?;
            Ok(diff_streams(&out.bytes, &reference_bytes))
        }
    }
}

/// Byte-compare two streams; on mismatch report the first differing
/// packet with hex context and return false.
fn diff_streams(produced: &[u8], reference: &[u8]) -> bool {
    if produced == reference {
        println!("match: {} bytes identical to reference", produced.len());
        return true;
    }

    if produced.len() != reference.len() {
        println!(
            "length mismatch: produced {} bytes, reference {} bytes",
            produced.len(),
            reference.len()
        );
    }

    if let Some(offset) = produced
        .iter()
        .zip(reference.iter())
        .position(|(a, b)| a != b)
    {
        let packet = offset / PACKET_SIZE;
        println!("first mismatch at byte {offset} (packet {packet})");
        let at = packet * PACKET_SIZE;
        println!("  produced:  {}", hex_frame(produced, at));
        println!("  reference: {}", hex_frame(reference, at));
    }
    false
}

fn hex_frame(bytes: &[u8], at: usize) -> String {
    bytes[at..(at + PACKET_SIZE).min(bytes.len())]
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
