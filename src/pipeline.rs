//! Batch processing workflows for programmatic use by the CLI binaries.
//!
//! `process_dataset` drives the full preprocessing run: tokenize story
//! directories, then walk each corpus split's question files, anonymize,
//! and write the per-split artifacts. `unanonymize_streams` is the reverse
//! path used by the `unanonymize` binary.

use crate::entity::{build_mapping, EntityMapping};
use crate::error::PrepError;
use crate::normalize::line_to_sentence;
use crate::split::split_story;
use crate::substitute::{substitute, Direction};
use crate::tokenize::tokenize_dir;
use crate::writer::{hash_url, SplitWriter};
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Dataset splits processed per corpus, in order.
pub const DATASET_SPLITS: [&str; 3] = ["training", "validation", "test"];

/// Corpora expected under the dataset root.
pub const CORPORA: [&str; 2] = ["cnn", "dailymail"];

/// Question files put the source URL on line 0 and the pre-computed entity
/// records on every line from here on. Lines 2, 4, and 6 hold the
/// tokenized article, the question, and the answer; the preprocessing run
/// only needs the URL and the entities.
const ENTITY_LINES_OFFSET: usize = 8;

// ============================================================================
// Question-set processing
// ============================================================================

/// Counters for one split's processing run.
#[derive(Debug, Default, Clone)]
pub struct ProcessStats {
    /// Documents fully processed and written
    pub processed: usize,
    /// Records skipped because their identifier was already claimed
    pub duplicates: usize,
    /// Records skipped because no story file exists for their identifier
    pub missing_stories: usize,
    /// Records skipped because an entity line would not parse
    pub malformed: usize,
}

impl ProcessStats {
    /// One-line summary for logs and stdout.
    pub fn summary(&self) -> String {
        format!(
            "{} processed ({} duplicates, {} missing stories, {} malformed)",
            self.processed, self.duplicates, self.missing_stories, self.malformed
        )
    }
}

/// The parts of a question file this pipeline consumes.
struct QuestionRecord {
    url: String,
    entity_lines: Vec<String>,
}

/// Read a question file: source URL from line 0, entity records from
/// line 8 onward.
fn parse_question_record(path: &Path) -> Result<QuestionRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read question file {}", path.display()))?;
    let lines: Vec<&str> = content.lines().collect();

    let url = lines.first().map(|l| l.trim()).unwrap_or("");
    if url.is_empty() {
        anyhow::bail!("question file {} has no source URL", path.display());
    }

    let entity_lines = lines
        .get(ENTITY_LINES_OFFSET..)
        .unwrap_or(&[])
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.to_string())
        .collect();

    Ok(QuestionRecord {
        url: url.to_string(),
        entity_lines,
    })
}

/// Normalize a section's lines into one anonymized string: sentence-fix
/// each line, join, lowercase, then substitute values for tags.
fn render_section(lines: &[&str], mapping: &EntityMapping) -> String {
    let joined = lines
        .iter()
        .map(|l| line_to_sentence(l))
        .collect::<Vec<_>>()
        .join(" ");
    substitute(mapping, &joined.to_lowercase(), Direction::Anonymize)
}

/// Count regular files directly under a directory.
fn count_files(dir: &Path) -> Result<usize> {
    let count = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .count();
    Ok(count)
}

/// Process a set of question files against a story directory, writing all
/// artifacts through `writer`.
///
/// Per-document conditions (duplicate identifier, missing story, malformed
/// entity record) are counted and skipped; only structural failures abort.
/// Stops early once as many distinct identifiers have been claimed as
/// there are story files on disk — every question file past that point
/// refers to a story already handled.
pub fn process_question_set(
    question_files: &[PathBuf],
    stories_root: &Path,
    writer: &mut SplitWriter,
) -> Result<ProcessStats> {
    let n_stories = count_files(stories_root)?;
    let mut stats = ProcessStats::default();

    for question_file in question_files {
        if writer.claimed_count() == n_stories {
            break;
        }

        let record = match parse_question_record(question_file) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("{}", e);
                stats.malformed += 1;
                continue;
            }
        };

        let identifier = hash_url(&record.url);
        if !writer.claim(&identifier) {
            stats.duplicates += 1;
            continue;
        }

        let story_path = stories_root.join(format!("{}.story", identifier));
        if !story_path.is_file() {
            log::warn!(
                "no story file {} for question {}",
                story_path.display(),
                question_file.display()
            );
            stats.missing_stories += 1;
            continue;
        }

        let (remapping, mapping) =
            match build_mapping(record.entity_lines.iter().map(|l| l.as_str())) {
                Ok(built) => built,
                Err(PrepError::MalformedRecord(line)) => {
                    log::warn!(
                        "malformed entity record {:?} in {}",
                        line,
                        question_file.display()
                    );
                    stats.malformed += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
        log::debug!("{}: remapped {} entities", identifier, remapping.len());

        let story_text = fs::read_to_string(&story_path)
            .with_context(|| format!("Failed to read story {}", story_path.display()))?;
        let (body_lines, highlight_lines) = split_story(story_text.lines());

        let story = render_section(&body_lines, &mapping);
        let highlight = render_section(&highlight_lines, &mapping);
        writer.write_document(&identifier, &story, &highlight, &mapping)?;
        stats.processed += 1;
    }

    Ok(stats)
}

/// Process every split under a corpus question root into
/// `output_root/<split>/`.
pub fn process_question_root(
    questions_root: &Path,
    stories_root: &Path,
    output_root: &Path,
) -> Result<Vec<(String, ProcessStats)>> {
    let mut results = Vec::new();

    for split in DATASET_SPLITS {
        let split_dir = questions_root.join(split);
        let mut question_files: Vec<PathBuf> = fs::read_dir(&split_dir)
            .with_context(|| format!("Failed to read question split {}", split_dir.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        question_files.sort();

        println!(
            "Processing {} ({} question files)",
            split,
            question_files.len()
        );

        let mut writer = SplitWriter::create(&output_root.join(split))?;
        let stats = process_question_set(&question_files, stories_root, &mut writer)?;
        writer.finish()?;

        println!("  {}: {}", split, stats.summary());
        results.push((split.to_string(), stats));
    }

    Ok(results)
}

// ============================================================================
// Full dataset run
// ============================================================================

/// Configuration for a full preprocessing run.
pub struct DatasetConfig {
    /// Root containing `<corpus>/questions/<split>/` and `<corpus>/stories/`
    pub dataset_root: PathBuf,
    /// Root for all output artifacts
    pub output_root: PathBuf,
    /// Stanford CoreNLP installation directory
    pub corenlp_dir: PathBuf,
    /// Skip tokenization (story files are already tokenized)
    pub skip_tokenizer: bool,
}

/// Run the full pipeline over every corpus: tokenize its stories (unless
/// skipped), then process its question splits into
/// `output_root/<corpus>/<split>/`.
///
/// Tokenized stories for all corpora share `output_root/tok_stories`;
/// identifiers are content hashes, so names cannot collide across corpora.
pub fn process_dataset(config: &DatasetConfig) -> Result<()> {
    fs::create_dir_all(&config.output_root)?;
    let tok_stories_root = config.output_root.join("tok_stories");

    for corpus in CORPORA {
        println!("Working on {}:", corpus);
        let corpus_root = config.dataset_root.join(corpus);
        let questions_root = corpus_root.join("questions");
        let stories_root = corpus_root.join("stories");

        let effective_stories_root = if config.skip_tokenizer {
            stories_root
        } else {
            fs::create_dir_all(&tok_stories_root)?;
            let mapping_path = config
                .output_root
                .join(format!("tokmap_{}_story.txt", corpus));
            tokenize_dir(
                &stories_root,
                &tok_stories_root,
                &config.corenlp_dir,
                &mapping_path,
            )?;
            tok_stories_root.clone()
        };

        process_question_root(
            &questions_root,
            &effective_stories_root,
            &config.output_root.join(corpus),
        )?;
    }

    Ok(())
}

// ============================================================================
// Unanonymize
// ============================================================================

/// Walk two aligned line streams — anonymized text and document
/// identifiers — and write the deanonymized text, one output line per
/// input line.
///
/// Each identifier names a `{identifier}.entities` file under
/// `entities_dir` whose mapping is applied in `Deanonymize` direction.
/// One stream ending before the other is fatal, as is an empty line in
/// either stream.
pub fn unanonymize_streams(
    text: impl BufRead,
    identifiers: impl BufRead,
    entities_dir: &Path,
    mut out: impl Write,
) -> Result<usize> {
    let mut text_lines = text.lines();
    let mut id_lines = identifiers.lines();
    let mut count = 0usize;

    loop {
        let (line, identifier) = match (text_lines.next(), id_lines.next()) {
            (None, None) => break,
            (Some(_), None) => {
                return Err(PrepError::MisalignedStreams(format!(
                    "identifier list ended at line {} but text continues",
                    count
                ))
                .into());
            }
            (None, Some(_)) => {
                return Err(PrepError::MisalignedStreams(format!(
                    "text ended at line {} but identifier list continues",
                    count
                ))
                .into());
            }
            (Some(line), Some(identifier)) => (line?, identifier?),
        };

        let identifier = identifier.trim();
        if line.is_empty() {
            return Err(PrepError::EmptyLine {
                line: count,
                file: "text input".to_string(),
            }
            .into());
        }
        if identifier.is_empty() {
            return Err(PrepError::EmptyLine {
                line: count,
                file: "identifier list".to_string(),
            }
            .into());
        }

        let entities_path = entities_dir.join(format!("{}.entities", identifier));
        let entities_text = fs::read_to_string(&entities_path)
            .with_context(|| format!("Failed to read {}", entities_path.display()))?;
        let mapping = EntityMapping::from_entities_str(&entities_text)?;

        writeln!(out, "{}", substitute(&mapping, &line, Direction::Deanonymize))?;
        count += 1;
    }

    out.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_render_section_normalizes_and_anonymizes() {
        let (_, mapping) = build_mapping(["@e:George Bush"]).unwrap();
        let lines = ["George  Bush spoke", "Nothing followed"];
        let out = render_section(&lines, &mapping);
        assert_eq!(out, "@entity0 spoke . nothing followed .");
    }

    #[test]
    fn test_misaligned_streams_fail() {
        let dir = tempfile::tempdir().unwrap();
        let text = Cursor::new("line one\nline two\n");
        let ids = Cursor::new("");
        let mut out = Vec::new();
        let err = unanonymize_streams(text, ids, dir.path(), &mut out).unwrap_err();
        assert!(err.to_string().contains("misaligned"));
    }

    #[test]
    fn test_empty_line_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("h1.entities"), "@entity0:cnn").unwrap();
        let text = Cursor::new("\n");
        let ids = Cursor::new("h1\n");
        let mut out = Vec::new();
        let err = unanonymize_streams(text, ids, dir.path(), &mut out).unwrap_err();
        assert!(err.to_string().contains("empty line"));
    }

    #[test]
    fn test_unanonymize_applies_mapping_per_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("h1.entities"), "@entity0:cnn").unwrap();
        fs::write(dir.path().join("h2.entities"), "@entity0:the bbc").unwrap();

        let text = Cursor::new("@entity0 reported .\n@entity0 reported .\n");
        let ids = Cursor::new("h1\nh2\n");
        let mut out = Vec::new();
        let count = unanonymize_streams(text, ids, dir.path(), &mut out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "cnn reported .\nthe bbc reported .\n"
        );
    }
}
