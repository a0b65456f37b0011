use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Lines of one file that belong to a slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FileLines {
    file: String,
    lines: BTreeSet<u32>,
}

/// Per-file set of 1-based line numbers making up a slice.
///
/// File keys keep the order in which they were first seen, which is the order
/// extracted text is emitted in. The empty key collects lines the engine could
/// not attribute to a source file; it is kept here and skipped at extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSelection {
    files: Vec<FileLines>,
}

impl LineSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line set for `file`, created empty (and appended to the key order) if unseen.
    pub fn entry(&mut self, file: &str) -> &mut BTreeSet<u32> {
        let idx = match self.files.iter().position(|f| f.file == file) {
            Some(idx) => idx,
            None => {
                self.files.push(FileLines { file: file.to_string(), lines: BTreeSet::new() });
                self.files.len() - 1
            }
        };
        &mut self.files[idx].lines
    }

    pub fn insert(&mut self, file: &str, line: u32) -> bool {
        self.entry(file).insert(line)
    }

    pub fn extend<I: IntoIterator<Item = u32>>(&mut self, file: &str, lines: I) {
        self.entry(file).extend(lines);
    }

    pub fn get(&self, file: &str) -> Option<&BTreeSet<u32>> {
        self.files.iter().find(|f| f.file == file).map(|f| &f.lines)
    }

    pub fn contains(&self, file: &str, line: u32) -> bool {
        self.get(file).is_some_and(|lines| lines.contains(&line))
    }

    /// File keys in encounter order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.file.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<u32>)> {
        self.files.iter().map(|f| (f.file.as_str(), &f.lines))
    }

    /// Number of file keys, the empty key included.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total selected lines across all files.
    pub fn line_count(&self) -> usize {
        self.files.iter().map(|f| f.lines.len()).sum()
    }

    /// Drop the empty key (lines with no source file).
    pub fn without_unattributed(mut self) -> Self {
        self.files.retain(|f| !f.file.is_empty());
        self
    }

    /// Add every file and line of `other`, keeping this selection's key order
    /// and appending keys only `other` has in their order.
    pub fn union_with(&mut self, other: &LineSelection) {
        for (file, lines) in other.iter() {
            self.extend(file, lines.iter().copied());
        }
    }

    /// Merge the backward and forward slices of one criterion.
    ///
    /// For every file the result holds `backward[f] ∪ forward[f]`. Keys from
    /// `backward` come first, then keys only `forward` reported.
    pub fn merged(backward: &LineSelection, forward: &LineSelection) -> LineSelection {
        let mut merged = backward.clone();
        merged.union_with(forward);
        merged
    }
}
