// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Command-line driver for the wavehide library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use wavehide::{embed_message, estimate_capacity, extract_message, StegoError};

#[derive(Parser)]
#[command(name = "wavehide", version, about = "Hide text messages in images via wavelet coefficients")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Embed a message into an image, rewriting the file in place.
    Embed {
        /// Path to the carrier image (PNG or BMP recommended).
        image: PathBuf,
        /// The message to hide.
        message: String,
    },
    /// Extract the hidden message from an image.
    Extract {
        /// Path to the stego image.
        image: PathBuf,
    },
    /// Report how many message bytes an image can carry.
    Capacity {
        /// Path to the carrier image.
        image: PathBuf,
    },
}

fn run(command: Command) -> Result<(), StegoError> {
    match command {
        Command::Embed { image, message } => {
            let report = embed_message(&image, &message)?;
            for event in &report.events {
                eprintln!("warning: {event}");
            }
            println!("embedded {} bytes into {}", message.len(), image.display());
        }
        Command::Extract { image } => {
            let report = extract_message(&image)?;
            for event in &report.events {
                eprintln!("warning: {event}");
            }
            if report.rs_errors_corrected > 0 {
                eprintln!("corrected {} corrupted symbols", report.rs_errors_corrected);
            }
            println!("{}", report.message);
        }
        Command::Capacity { image } => {
            let planes = wavehide::pixels::load(&image)?;
            let cap = estimate_capacity(planes.width() as u32, planes.height() as u32);
            println!("{cap}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
