//! Content-addressed output for one dataset split.
//!
//! Each processed document contributes one line to three parallel
//! accumulator files — `stories`, `highlights`, and the `entities` index —
//! plus a per-document `{identifier}.entities` side file. Line N of every
//! accumulator refers to the same document, so the three files must only
//! ever be written together.

use crate::entity::EntityMapping;
use crate::error::Result;
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stable identifier for a document: lowercase hex SHA-1 of its UTF-8
/// source URL. Used as the filename key across all artifacts.
pub fn hash_url(url: &str) -> String {
    hex::encode(Sha1::digest(url.as_bytes()))
}

/// Writer for one dataset split's output directory.
///
/// Owns the accumulator handles for the duration of a run and the
/// run-scoped set of already-processed identifiers. Call [`finish`] to
/// flush; dropping without it still closes the handles.
///
/// [`finish`]: SplitWriter::finish
pub struct SplitWriter {
    output_root: PathBuf,
    stories: BufWriter<File>,
    highlights: BufWriter<File>,
    index: BufWriter<File>,
    seen: HashSet<String>,
}

impl SplitWriter {
    /// Create the split output directory and its accumulator files,
    /// truncating any previous run's output.
    pub fn create(output_root: &Path) -> Result<Self> {
        fs::create_dir_all(output_root)?;
        let open = |name: &str| -> std::io::Result<BufWriter<File>> {
            Ok(BufWriter::new(File::create(output_root.join(name))?))
        };
        Ok(Self {
            output_root: output_root.to_path_buf(),
            stories: open("stories")?,
            highlights: open("highlights")?,
            index: open("entities")?,
            seen: HashSet::new(),
        })
    }

    /// Check-and-mark an identifier in one step. Returns `false` when the
    /// identifier was already claimed this run (first occurrence wins);
    /// callers must skip the document in that case.
    pub fn claim(&mut self, identifier: &str) -> bool {
        self.seen.insert(identifier.to_string())
    }

    /// Number of identifiers claimed so far this run.
    pub fn claimed_count(&self) -> usize {
        self.seen.len()
    }

    /// Append one document's artifacts: a story line, a highlight line,
    /// an index line, and the `{identifier}.entities` side file.
    pub fn write_document(
        &mut self,
        identifier: &str,
        story: &str,
        highlight: &str,
        mapping: &EntityMapping,
    ) -> Result<()> {
        writeln!(self.stories, "{}", story)?;
        writeln!(self.highlights, "{}", highlight)?;
        writeln!(self.index, "{}", identifier)?;

        let entities_path = self.output_root.join(format!("{}.entities", identifier));
        fs::write(entities_path, mapping.to_entities_string())?;
        Ok(())
    }

    /// Flush all accumulator files.
    pub fn finish(mut self) -> Result<()> {
        self.stories.flush()?;
        self.highlights.flush()?;
        self.index.flush()?;
        Ok(())
    }
}
