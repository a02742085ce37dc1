//! The ordered class-index -> label mapping shared read-only by every request

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// An immutable, index-addressable list of class labels, loaded once at
/// process start
#[derive(Debug)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Load labels from a newline-delimited file, one label per line
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read label file {path:?}"))?;
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self> {
        let labels: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if labels.is_empty() {
            bail!("label file contains no labels");
        }
        Ok(LabelTable { labels })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl From<Vec<String>> for LabelTable {
    fn from(labels: Vec<String>) -> Self {
        LabelTable { labels }
    }
}
