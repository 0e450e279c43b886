//! Item name scanning
//!
//! Finds known item names inside free-form chat text. Matching is
//! case-insensitive and only accepts whole tokens: `Copper Disc` is found in
//! `"Copper Disc woot"` but not in `"Copper Discs"`.
use crate::auction::{ItemName, ItemNameRef};
use anyhow::Result;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

/// An item name found in a text, with its byte span
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemMatch {
    pub item: ItemName,
    pub start: usize,
    pub end: usize,
}

pub struct ItemMatcher {
    /// `None` when the dictionary is empty
    pattern: Option<Regex>,
    /// lowercased name -> name as configured
    canonical: BTreeMap<String, ItemName>,
}

impl ItemMatcher {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical = BTreeMap::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() {
                canonical
                    .entry(name.to_lowercase())
                    .or_insert_with(|| name.to_owned());
            }
        }

        // Alternation is leftmost-first, so longer names must come first for
        // `Copper Disc Fragment` to win over `Copper Disc`.
        let mut alternatives: Vec<_> = canonical.keys().collect();
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let pattern = if alternatives.is_empty() {
            None
        } else {
            let alternation = alternatives
                .into_iter()
                .map(|name| whole_token(name))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&format!("(?:{alternation})"))
                    .case_insensitive(true)
                    .size_limit(64 * (1 << 20))
                    .build()?,
            )
        };

        Ok(Self { pattern, canonical })
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Every non-overlapping item occurrence, left to right
    pub fn find_all(&self, text: &str) -> Vec<ItemMatch> {
        let Some(pattern) = &self.pattern else {
            return vec![];
        };
        pattern
            .find_iter(text)
            .filter_map(|m| {
                let item = self.canonical.get(&m.as_str().to_lowercase())?;
                Some(ItemMatch {
                    item: item.clone(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect()
    }
}

/// Whole-token, ASCII case-insensitive occurrences of a single `name`
///
/// For small ad-hoc name sets that don't warrant building an [`ItemMatcher`].
pub fn find_name(text: &str, name: ItemNameRef) -> Vec<ItemMatch> {
    let name = name.trim();
    if name.is_empty() {
        return vec![];
    }
    let haystack = text.to_ascii_lowercase();
    let needle = name.to_ascii_lowercase();
    let needs_boundary_before = is_word(name.chars().next());
    let needs_boundary_after = is_word(name.chars().last());

    haystack
        .match_indices(&needle)
        .filter(|(start, _)| {
            let end = start + needle.len();
            (!needs_boundary_before || !is_word(text[..*start].chars().last()))
                && (!needs_boundary_after || !is_word(text[end..].chars().next()))
        })
        .map(|(start, _)| ItemMatch {
            item: name.to_owned(),
            start,
            end: start + needle.len(),
        })
        .collect()
}

fn is_word(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Escape `name` and anchor it on word boundaries where its ends are word
/// characters; names like `Ring of the Ancients'` can't use a trailing `\b`.
fn whole_token(name: &str) -> String {
    let mut token = String::new();
    if is_word(name.chars().next()) {
        token.push_str(r"\b");
    }
    token.push_str(&regex::escape(name));
    if is_word(name.chars().last()) {
        token.push_str(r"\b");
    }
    token
}

/// Drop every match lying inside a longer one
///
/// Matches coming from different sources can nest: `Copper Disc` inside
/// `Copper Disc Fragment`. Only the longest name counts, same as in
/// [`ItemMatcher::find_all`].
pub fn outermost(matches: &[ItemMatch]) -> Vec<ItemMatch> {
    let nested = |m: &ItemMatch, other: &ItemMatch| {
        other.start <= m.start && m.end <= other.end && other.end - other.start > m.end - m.start
    };
    let mut kept: Vec<ItemMatch> = matches
        .iter()
        .filter(|m| !matches.iter().any(|other| nested(m, other)))
        .cloned()
        .collect();
    kept.sort_by_key(|m| m.start);
    kept
}

/// Keep only the first occurrence of every item, preserving order
pub fn distinct_items(matches: &[ItemMatch]) -> Vec<ItemName> {
    let mut items: Vec<ItemName> = Vec::new();
    for m in matches {
        if !items.contains(&m.item) {
            items.push(m.item.clone());
        }
    }
    items
}
