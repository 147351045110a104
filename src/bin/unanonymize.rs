//! Replace entity tags in anonymized text with their surface values.
//!
//! Reads a text file (one anonymized line per row) and an identifier list
//! aligned with it line-by-line, loads each document's
//! `{identifier}.entities` mapping from the entities directory, and writes
//! the deanonymized text, one output line per input line:
//!
//!     unanonymize -f test/stories --file-list test/entities \
//!         -d test -o test/stories.restored
//!
//! The two input files must stay aligned: one ending before the other, or
//! an empty line in either, aborts the run.

use anyhow::{Context, Result};
use clap::Parser;
use newsqa_prep::pipeline::unanonymize_streams;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "unanonymize",
    about = "Replace entity tags in anonymized text with their surface values"
)]
struct Cli {
    /// Anonymized text file, one line per document
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// Identifier list aligned line-by-line with the text file
    #[arg(long)]
    file_list: PathBuf,

    /// Directory containing {identifier}.entities files
    #[arg(short = 'd', long)]
    entities_dir: PathBuf,

    /// Output file
    #[arg(short = 'o', long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = BufReader::new(
        File::open(&cli.file)
            .with_context(|| format!("Failed to open text file {}", cli.file.display()))?,
    );
    let identifiers = BufReader::new(
        File::open(&cli.file_list)
            .with_context(|| format!("Failed to open file list {}", cli.file_list.display()))?,
    );
    let out = BufWriter::new(
        File::create(&cli.output)
            .with_context(|| format!("Failed to create output {}", cli.output.display()))?,
    );

    let count = unanonymize_streams(text, identifiers, &cli.entities_dir, out)?;
    println!("Restored {} lines to {}", count, cli.output.display());
    Ok(())
}
