use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod checksum;
mod config;
mod inspect;
mod render;

#[derive(Parser)]
#[command(name = "cdgc", about = "CD+Graphics composition compiler", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a project file into a CDG packet stream.
    Render {
        /// Input project file (.cmp)
        input: PathBuf,
        /// Output stream (.cdg)
        output: PathBuf,
        /// Byte-compare the output against a reference stream
        #[arg(long)]
        reference: Option<PathBuf>,
        /// Exclude text clips (isolates transition behavior)
        #[arg(long)]
        no_text_clips: bool,
        /// Assets root for legacy path rewriting (overrides config)
        #[arg(long)]
        assets_root: Option<String>,
    },
    /// Report size, checksums, packet histogram, and packet dumps for
    /// a CDG stream.
    Inspect {
        /// Stream to inspect (.cdg)
        file: PathBuf,
        /// Render the replayed screen at this packet index to a PNG
        #[arg(long)]
        dump_frame: Option<u32>,
        /// PNG output path for --dump-frame
        #[arg(long, default_value = "frame.png")]
        out: PathBuf,
        /// Integer upscale for the PNG (overrides config)
        #[arg(long)]
        scale: Option<u32>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Render {
            input,
            output,
            reference,
            no_text_clips,
            assets_root,
        } => render::run(
            &input,
            &output,
            reference.as_deref(),
            no_text_clips,
            assets_root,
        ),
        Command::Inspect {
            file,
            dump_frame,
            out,
            scale,
        } => inspect::run(&file, dump_frame, &out, scale),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}
