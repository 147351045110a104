//! Bidirectional entity substitution over free text.
//!
//! The engine rewrites whole whitespace-delimited tokens (or multi-word
//! phrases) only: a key never matches inside a larger token, so a value
//! `bush` leaves `bushfire` alone and `@entity1` never swallows the front
//! of `@entity10`. At every position the longest candidate key wins.
//!
//! Matching is an explicit scanner over the token stream, not a regex
//! alternation: alternation order decides ties in a regex engine, and that
//! must not be what makes `@entity10` beat `@entity1`.

use crate::entity::EntityMapping;
use std::collections::HashMap;

/// Which side of the mapping is searched for in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Replace surface values with their entity tags.
    Anonymize,
    /// Replace entity tags with their surface values.
    Deanonymize,
}

/// One search key (as a token sequence) and its replacement text.
struct Candidate<'a> {
    key_tokens: Vec<&'a str>,
    replacement: &'a str,
}

/// Rewrite every whole-word occurrence of one side of `mapping` in `text`
/// with the other side, per `direction`.
///
/// The result is always whitespace-collapsed and trimmed, replacements
/// included, so adjacent rewrites can neither fuse tokens nor stack up
/// spaces. With an empty mapping the text passes through collapsed but
/// otherwise unchanged. Deterministic for identical inputs.
pub fn substitute(mapping: &EntityMapping, text: &str, direction: Direction) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if mapping.is_empty() {
        return tokens.join(" ");
    }

    // Index candidates by first key token; longer keys are tried first so
    // `bush administration` outranks `bush` at the same position. The sort
    // is stable, so equal-length keys keep mapping order and ties stay
    // deterministic.
    let mut candidates: HashMap<&str, Vec<Candidate>> = HashMap::new();
    for (tag, value) in mapping.iter() {
        let (key, replacement) = match direction {
            Direction::Anonymize => (value.as_str(), tag.as_str()),
            Direction::Deanonymize => (tag.as_str(), value.as_str()),
        };
        let key_tokens: Vec<&str> = key.split_whitespace().collect();
        if let Some(&first) = key_tokens.first() {
            candidates.entry(first).or_default().push(Candidate {
                key_tokens,
                replacement,
            });
        }
    }
    for list in candidates.values_mut() {
        list.sort_by(|a, b| b.key_tokens.len().cmp(&a.key_tokens.len()));
    }

    // Single left-to-right pass over the token stream.
    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let matched = candidates.get(tokens[i]).and_then(|list| {
            list.iter().find(|c| {
                let k = c.key_tokens.len();
                i + k <= tokens.len() && c.key_tokens == tokens[i..i + k]
            })
        });

        match matched {
            Some(c) => {
                out.push(c.replacement);
                i += c.key_tokens.len();
            }
            None => {
                out.push(tokens[i]);
                i += 1;
            }
        }
    }

    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::build_mapping;

    fn mapping_of(lines: &[&str]) -> EntityMapping {
        build_mapping(lines.iter().copied()).unwrap().1
    }

    #[test]
    fn test_anonymize_replaces_values_with_tags() {
        let m = mapping_of(&["@e:george bush", "@f:washington"]);
        let out = substitute(&m, "george bush went to washington", Direction::Anonymize);
        assert_eq!(out, "@entity0 went to @entity1");
    }

    #[test]
    fn test_deanonymize_replaces_tags_with_values() {
        let m = mapping_of(&["@e:george bush", "@f:washington"]);
        let out = substitute(&m, "@entity0 went to @entity1", Direction::Deanonymize);
        assert_eq!(out, "george bush went to washington");
    }

    #[test]
    fn test_no_keys_means_collapse_only() {
        let m = mapping_of(&["@e:absent"]);
        let out = substitute(&m, "  plain   text here ", Direction::Anonymize);
        assert_eq!(out, "plain text here");
    }

    #[test]
    fn test_empty_mapping_passthrough() {
        let m = EntityMapping::new();
        assert_eq!(
            substitute(&m, "a  b\tc", Direction::Deanonymize),
            "a b c"
        );
    }

    #[test]
    fn test_boundary_safety() {
        let m = mapping_of(&["@e:bush"]);
        let out = substitute(&m, "bush bushfire", Direction::Anonymize);
        assert_eq!(out, "@entity0 bushfire");
    }

    #[test]
    fn test_longest_tag_wins() {
        // Eleven entities so both @entity1 and @entity10 exist.
        let lines: Vec<String> = (0..11).map(|i| format!("@x{}:value{}", i, i)).collect();
        let m = mapping_of(&lines.iter().map(|s| s.as_str()).collect::<Vec<_>>());
        let out = substitute(&m, "@entity10 and @entity1", Direction::Deanonymize);
        assert_eq!(out, "value10 and value1");
    }

    #[test]
    fn test_longest_phrase_wins() {
        let m = mapping_of(&["@e:bush", "@f:bush administration"]);
        let out = substitute(
            &m,
            "the bush administration and bush agreed",
            Direction::Anonymize,
        );
        assert_eq!(out, "the @entity1 and @entity0 agreed");
    }

    #[test]
    fn test_adjacent_replacements_keep_spacing() {
        let m = mapping_of(&["@e:alpha", "@f:beta"]);
        let out = substitute(&m, "alpha beta alpha", Direction::Anonymize);
        assert_eq!(out, "@entity0 @entity1 @entity0");
        assert!(!out.contains("  "));
    }

    #[test]
    fn test_round_trip() {
        let m = mapping_of(&["@e:george bush", "@f:texas"]);
        let original = "george bush flew home to texas yesterday .";
        let anon = substitute(&m, original, Direction::Anonymize);
        let back = substitute(&m, &anon, Direction::Deanonymize);
        assert_eq!(back, original);
    }

    #[test]
    fn test_deterministic() {
        let m = mapping_of(&["@e:a b", "@f:a", "@g:b"]);
        let first = substitute(&m, "a b a b a", Direction::Anonymize);
        for _ in 0..5 {
            assert_eq!(substitute(&m, "a b a b a", Direction::Anonymize), first);
        }
        assert_eq!(first, "@entity0 @entity0 @entity1");
    }
}
