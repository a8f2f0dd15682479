//! `WordTree`: an in-memory trie of ranked words.
//!
//! # Dictionary format
//!
//! ```text
//! 4          <- optional entry count, ignored
//! the 1
//! hello 52
//! help 60
//! held       <- rank defaults to the entry position
//! ```
//!
//! Lower ranks are better. Lookups return the `k` best-ranked words under a
//! prefix, ties broken alphabetically.

use super::{CompletionEngine, DELIMITER};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, BinaryHeap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Default)]
struct Node {
    /// Rank of the word ending here, if one does.
    rank: Option<u32>,
    children: BTreeMap<char, Node>,
}

/// Prefix tree mapping words to ranks.
#[derive(Debug, Default)]
pub struct WordTree {
    root: Node,
    len: usize,
}

impl WordTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|err| match err {
            Error::System(source) => Error::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse a dictionary from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut tree = Self::new();
        let mut seen_entry = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let rank_field = fields.next();
            if fields.next().is_some() {
                return Err(Error::Dictionary {
                    line: index + 1,
                    message: "expected `word rank`".to_string(),
                });
            }

            // A lone number on the first line is the entry count header.
            if !seen_entry && rank_field.is_none() && word.parse::<u64>().is_ok() {
                seen_entry = true;
                continue;
            }
            seen_entry = true;

            let rank = match rank_field {
                Some(field) => field.parse::<u32>().map_err(|_| Error::Dictionary {
                    line: index + 1,
                    message: format!("rank `{field}` is not a non-negative integer"),
                })?,
                None => u32::try_from(tree.len).unwrap_or(u32::MAX),
            };
            tree.insert(word, rank);
        }

        Ok(tree)
    }

    /// Insert `word`, keeping the better rank if it already exists.
    pub fn insert(&mut self, word: &str, rank: u32) {
        if word.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }
        match node.rank {
            Some(existing) => node.rank = Some(existing.min(rank)),
            None => {
                node.rank = Some(rank);
                self.len += 1;
            }
        }
    }

    /// Number of distinct words.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no words.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether `word` is in the tree.
    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.rank.is_some())
    }

    /// The `k` best-ranked words starting with `prefix`, best first.
    pub fn complete(&self, prefix: &str, k: usize) -> Vec<String> {
        if prefix.is_empty() || k == 0 {
            return Vec::new();
        }
        let Some(start) = self.find(prefix) else {
            return Vec::new();
        };

        // Max-heap of the best `k` so far; the worst sits on top.
        let mut best: BinaryHeap<(u32, String)> = BinaryHeap::with_capacity(k + 1);
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((node, word)) = stack.pop() {
            if let Some(rank) = node.rank {
                best.push((rank, word.clone()));
                if best.len() > k {
                    best.pop();
                }
            }
            for (c, child) in &node.children {
                let mut next = word.clone();
                next.push(*c);
                stack.push((child, next));
            }
        }

        best.into_sorted_vec().into_iter().map(|(_, word)| word).collect()
    }

    fn find(&self, prefix: &str) -> Option<&Node> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }
}

impl CompletionEngine for WordTree {
    fn set_dictionary(&mut self, path: &Path) -> Result<()> {
        let tree = Self::load(path)?;
        if tree.is_empty() {
            return Err(Error::EngineUnavailable {
                reason: format!("dictionary {} has no words", path.display()),
            });
        }
        tracing::debug!(words = tree.len(), "word tree loaded");
        *self = tree;
        Ok(())
    }

    fn get_autocomplete(&self, prefix: &str, k: usize) -> String {
        let mut response = String::new();
        for word in self.complete(prefix, k) {
            if !response.is_empty() {
                response.push(DELIMITER);
            }
            response.push_str(&word);
        }
        response
    }
}
