//! The inspect subcommand: stream statistics, a per-subcommand packet
//! histogram, hex dumps of the leading and trailing packets, and an
//! optional PNG of the replayed screen at a chosen packet.

use std::error::Error;
use std::io::BufWriter;
use std::path::Path;

use cdg_core::packet::{self, PACKETS_PER_SECOND, Packet};
use cdg_core::replay::{ReplayState, Replayer};
use cdg_core::vram::{SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::checksum::crc32;
use crate::config::Config;

const DUMP_PACKETS: usize = 4;

pub fn run(
    file: &Path,
    dump_frame: Option<u32>,
    png_out: &Path,
    scale: Option<u32>,
) -> Result<bool, Box<dyn Error>> {
    let bytes = std::fs::read(file)?;
    let replayer = Replayer::from_bytes(&bytes)?;
    let count = replayer.packet_count();

    println!("file:     {}", file.display());
    println!("size:     {} bytes", bytes.len());
    println!("crc32:    {:08X}", crc32(&bytes));
    println!(
        "packets:  {} ({:.1} s at {} pps)",
        count,
        f64::from(count) / f64::from(PACKETS_PER_SECOND),
        PACKETS_PER_SECOND
    );

    print_histogram(replayer.packets());
    print_dumps(replayer.packets());

    if let Some(at) = dump_frame {
        if at >= count {
            return Err(format!("packet {at} out of range (stream has {count})").into());
        }
        let scale = scale.or(Config::load().default_scale).unwrap_or(1).max(1);
        write_png(&replayer.state_at(at), png_out, scale)?;
        println!("frame:    packet {} -> {}", at, png_out.display());
    }
    Ok(true)
}

fn subcommand_name(sub: u8) -> &'static str {
    match sub {
        packet::SUB_MEMORY_PRESET => "memory-preset",
        packet::SUB_BORDER_PRESET => "border-preset",
        packet::SUB_TILE_COPY => "tile-copy",
        packet::SUB_TILE_XOR => "tile-xor",
        packet::SUB_SCROLL_PRESET => "scroll-preset",
        packet::SUB_SCROLL_COPY => "scroll-copy",
        packet::SUB_TRANSPARENT => "transparent",
        packet::SUB_PALETTE_LOW => "palette-low",
        packet::SUB_PALETTE_HIGH => "palette-high",
        _ => "unknown",
    }
}

fn print_histogram(packets: &[Packet]) {
    let mut counts: [u32; 64] = [0; 64];
    let mut noops = 0u32;
    for p in packets {
        if p.is_graphics() {
            counts[p.subcommand() as usize] += 1;
        } else {
            noops += 1;
        }
    }
    println!("histogram:");
    println!("  {:>8}  no-op", noops);
    for (sub, &count) in counts.iter().enumerate() {
        if count > 0 {
            println!("  {:>8}  {} (0x{:02X})", count, subcommand_name(sub as u8), sub);
        }
    }
}

fn print_dumps(packets: &[Packet]) {
    let n = packets.len();
    println!("head:");
    for (i, p) in packets.iter().take(DUMP_PACKETS).enumerate() {
        println!("  [{i:>6}] {}", hex_packet(p));
    }
    if n > DUMP_PACKETS {
        println!("tail:");
        for (i, p) in packets.iter().enumerate().skip(n.saturating_sub(DUMP_PACKETS)) {
            println!("  [{i:>6}] {}", hex_packet(p));
        }
    }
}

fn hex_packet(p: &Packet) -> String {
    p.as_bytes()
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write the replayed screen as an RGB PNG, nearest-neighbor upscaled
/// by `scale`.
fn write_png(state: &ReplayState, path: &Path, scale: u32) -> Result<(), Box<dyn Error>> {
    let scale = scale as usize;
    let (w, h) = (SCREEN_WIDTH * scale, SCREEN_HEIGHT * scale);
    let mut rgb = vec![0u8; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let color = state.palette[state.vram.get_pixel(x / scale, y / scale) as usize];
            let at = (y * w + x) * 3;
            rgb[at] = color.r;
            rgb[at + 1] = color.g;
            rgb[at + 2] = color.b;
        }
    }

    let file = std::fs::File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), w as u32, h as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgb)?;
    Ok(())
}
