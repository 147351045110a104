//! Preprocess a news question-answering dataset tree.
//!
//! For each corpus under the dataset root (`cnn`, `dailymail`), tokenizes
//! the story files with Stanford's PTBTokenizer, then processes each
//! question split: entities are renumbered per document, story text is
//! normalized, lowercased, and anonymized, and the results land in
//! `<output>/<corpus>/<split>/{stories,highlights,entities}` plus one
//! `{identifier}.entities` file per document.
//!
//!     qa-prep -d /data/rc-data -o /data/processed -c ./stanford-corenlp
//!
//! Pass `--skip-tokenizer` when the story files are already tokenized.

use anyhow::Result;
use clap::Parser;
use newsqa_prep::pipeline::{process_dataset, DatasetConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qa-prep",
    about = "Tokenize, anonymize, and section a news QA dataset"
)]
struct Cli {
    /// Dataset directory containing <corpus>/questions and <corpus>/stories
    #[arg(short = 'd', long)]
    dataset_dir: PathBuf,

    /// Output directory for all artifacts
    #[arg(short = 'o', long)]
    output_dir: PathBuf,

    /// Stanford CoreNLP tools directory
    #[arg(short = 'c', long, default_value = "./stanford-corenlp")]
    corenlp_dir: PathBuf,

    /// Skip the tokenization pass (story files are already tokenized)
    #[arg(long)]
    skip_tokenizer: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = DatasetConfig {
        dataset_root: cli.dataset_dir,
        output_root: cli.output_dir,
        corenlp_dir: cli.corenlp_dir,
        skip_tokenizer: cli.skip_tokenizer,
    };

    process_dataset(&config)
}
