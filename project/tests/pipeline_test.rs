//! Whole-pipeline test: serialize a project to disk, parse it back,
//! resolve assets, and export, checking stream invariants at the end.

use cdg_core::prelude::*;
use cdg_project::record::{
    BmpEventRecord, ClipRecord, ClipRecordKind, ProjectFile, TextEventRecord,
};
use cdg_project::{AssetResolver, bmp, load_project, resolve_clips, writer};

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("cdg_pipeline_test_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn project_on_disk_exports_end_to_end() {
    let dir = temp_dir("end_to_end");

    // A solid white-on-index-5 bitmap asset
    let mut palette = [Rgb::BLACK; 16];
    palette[5] = Rgb::new(255, 255, 255);
    let image = IndexedImage::solid(300, 216, 5, palette);
    let bmp_path = dir.join("title.bmp");
    std::fs::write(&bmp_path, bmp::encode(&image)).unwrap();

    let project = ProjectFile {
        audio_path: "song.mp3".into(),
        play_position: 0,
        track_channels: [0; 8],
        clips: vec![
            ClipRecord {
                track: 0,
                start: 300,
                duration: 1800,
                kind: ClipRecordKind::Bmp {
                    events: vec![BmpEventRecord {
                        offset: 0,
                        bmp_path: bmp_path.to_str().unwrap().into(),
                        height: 216,
                        width: 300,
                        x_offset: 0,
                        y_offset: 0,
                        fill_index: 0,
                        border_index: 0,
                        composite_index: 0,
                        should_composite: 0,
                        load_palette: 1,
                        transition_path: String::new(),
                        transition_length: 900,
                    }],
                },
            },
            ClipRecord {
                track: 1,
                start: 2200,
                duration: 400,
                kind: ClipRecordKind::Text {
                    content: "CHORUS".into(),
                    font_name: "Sans".into(),
                    font_size: 12,
                    colors: [3, 0, 0, 0],
                    karaoke_mode: 0,
                    highlight_mode: 0,
                    antialias: 0,
                    default_palette: 1,
                    events: vec![TextEventRecord {
                        offset: 0,
                        box_left: 10,
                        box_top: 8,
                        box_width: 30,
                        box_height: 1,
                        line_index: 0,
                        word_index: 0,
                        karaoke_type: 0,
                        transition_path: String::new(),
                    }],
                },
            },
        ],
    };

    let cmp_path = dir.join("song.cmp");
    std::fs::write(&cmp_path, writer::write(&project)).unwrap();

    let loaded = load_project(&cmp_path).unwrap();
    assert_eq!(loaded, project);

    let clips = resolve_clips(&loaded, &AssetResolver::new(""));
    assert_eq!(clips.len(), 2);

    let mut exporter = Exporter::new(0);
    for clip in clips {
        exporter.register(clip).unwrap();
    }
    let out = exporter.run().unwrap();

    // Duration grows to the latest clip end
    assert_eq!(out.total_packets, 2600);
    assert_eq!(out.bytes.len(), 2600 * PACKET_SIZE);

    // Every occupied slot is a graphics or no-op command
    for frame in out.bytes.chunks_exact(PACKET_SIZE) {
        assert!(frame[0] == 0x00 || frame[0] == 0x09);
    }

    // Last slot non-empty
    assert!(
        out.bytes[out.bytes.len() - PACKET_SIZE..]
            .iter()
            .any(|&b| b != 0)
    );

    // After the BMP prelude the replayed palette is the BMP's table
    let replayer = Replayer::from_bytes(&out.bytes).unwrap();
    let state = replayer.state_at(400);
    for i in 0..16 {
        assert_eq!(state.palette[i], palette[i].quantize());
    }

    // Determinism across full pipeline runs
    let clips2 = resolve_clips(&loaded, &AssetResolver::new(""));
    let mut exporter2 = Exporter::new(0);
    for clip in clips2 {
        exporter2.register(clip).unwrap();
    }
    assert_eq!(exporter2.run().unwrap().bytes, out.bytes);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_assets_produce_smaller_but_valid_export() {
    let dir = temp_dir("missing_assets");

    let project = ProjectFile {
        audio_path: String::new(),
        play_position: 0,
        track_channels: [0; 8],
        clips: vec![ClipRecord {
            track: 0,
            start: 300,
            duration: 600,
            kind: ClipRecordKind::Bmp {
                events: vec![BmpEventRecord {
                    offset: 0,
                    bmp_path: dir.join("gone.bmp").to_str().unwrap().into(),
                    height: 216,
                    width: 300,
                    x_offset: 0,
                    y_offset: 0,
                    fill_index: 0,
                    border_index: 0,
                    composite_index: 0,
                    should_composite: 0,
                    load_palette: 1,
                    transition_path: String::new(),
                    transition_length: 900,
                }],
            },
        }],
    };

    let clips = resolve_clips(&project, &AssetResolver::new(""));
    assert!(clips.is_empty());

    // With the clip skipped, an explicit duration still exports padding
    let out = Exporter::new(300).run().unwrap();
    assert_eq!(out.bytes.len(), 300 * PACKET_SIZE);

    std::fs::remove_dir_all(&dir).unwrap();
}
