//! Entity records, per-document mappings, and `.entities` files.
//!
//! Question files carry one pre-computed entity per line in `tag:value`
//! form. Tags are remapped per document to the canonical `@entity<N>`
//! numbering (N = position in the document's entity list), and the
//! canonical mapping is what gets persisted next to the anonymized text
//! and used for substitution in both directions.

use crate::error::{PrepError, Result};
use crate::normalize::collapse_whitespace;
use regex::Regex;
use std::collections::HashSet;

/// A single entity record as supplied by a question file: the tag assigned
/// upstream and the surface text it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// Tag as written in the source record.
    pub original_tag: String,
    /// Surface text, whitespace-normalized and lowercased.
    pub value: String,
}

/// Parse a `tag:value text...` record line.
///
/// The value may span several colon-separated fields; every colon after the
/// first becomes a single space, so colons never survive into the canonical
/// form. Returns `MalformedRecord` when the line has no tag or no value
/// token.
pub fn parse_entity_record(line: &str) -> Result<EntityRecord> {
    let mut parts = line.split(':');
    let tag = parts.next().unwrap_or("").trim().to_string();
    let value = collapse_whitespace(&parts.collect::<Vec<_>>().join(" ")).to_lowercase();

    if tag.is_empty() || value.is_empty() {
        return Err(PrepError::MalformedRecord(line.to_string()));
    }
    Ok(EntityRecord {
        original_tag: tag,
        value,
    })
}

/// Canonical placeholder tag for the i-th entity of a document.
pub fn canonical_tag(index: usize) -> String {
    format!("@entity{}", index)
}

/// True if `tag` has the canonical `@entity<N>` shape.
pub fn is_canonical_tag(tag: &str) -> bool {
    lazy_static::lazy_static! {
        static ref TAG_PATTERN: Regex = Regex::new(r"^@entity\d+$").unwrap();
    }
    TAG_PATTERN.is_match(tag)
}

/// Ordered tag -> value pairs for one document.
///
/// Tags are unique by construction (assigned positionally); iteration
/// follows insertion order. This is the unit of record persisted to a
/// `{identifier}.entities` side file and consumed by the substitution
/// engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMapping {
    pairs: Vec<(String, String)>,
}

impl EntityMapping {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn push(&mut self, tag: String, value: String) {
        self.pairs.push((tag, value));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Surface value for a canonical tag, if present.
    pub fn value_of(&self, tag: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.pairs.iter()
    }

    /// Serialize as one `tag:value` pair per line (no trailing newline).
    pub fn to_entities_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(tag, value)| format!("{}:{}", tag, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse the `.entities` file format. Blank lines are ignored;
    /// non-canonical tags are tolerated with a warning so hand-edited
    /// files still load.
    pub fn from_entities_str(text: &str) -> Result<Self> {
        let mut mapping = Self::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let record = parse_entity_record(line)?;
            if !is_canonical_tag(&record.original_tag) {
                log::warn!("non-canonical entity tag {:?} in entities data", record.original_tag);
            }
            mapping.push(record.original_tag, record.value);
        }
        Ok(mapping)
    }
}

/// Build the per-document mappings from an ordered sequence of raw entity
/// record lines.
///
/// Returns the forward remapping (original tag -> canonical tag, kept for
/// provenance) and the canonical mapping (canonical tag -> value) used for
/// substitution and persistence. Duplicate surface values make reverse
/// substitution ambiguous, so they are logged; the first tag with a given
/// value wins during anonymization.
pub fn build_mapping<'a, I>(records: I) -> Result<(Vec<(String, String)>, EntityMapping)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut remapping = Vec::new();
    let mut mapping = EntityMapping::new();
    let mut seen_values = HashSet::new();

    for (i, line) in records.into_iter().enumerate() {
        let record = parse_entity_record(line)?;
        let new_tag = canonical_tag(i);

        if !seen_values.insert(record.value.clone()) {
            log::warn!(
                "duplicate surface value {:?} ({}); reverse substitution is ambiguous",
                record.value,
                new_tag
            );
        }

        remapping.push((record.original_tag, new_tag.clone()));
        mapping.push(new_tag, record.value);
    }

    Ok((remapping, mapping))
}
