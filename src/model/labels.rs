//! Class label tables for image models.

use std::path::Path;

use crate::{Result, WhatFlowerError};

/// Class labels in logit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    /// Load a newline-separated labels file. Blank lines are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WhatFlowerError::Model(format!("Failed to read labels file {path:?}: {e}"))
        })?;
        let labels = Self::parse(&content);
        if labels.is_empty() {
            return Err(WhatFlowerError::Model(format!(
                "Labels file {path:?} contains no labels"
            )));
        }
        Ok(labels)
    }

    /// Parse labels from text, one per line.
    pub fn parse(content: &str) -> Self {
        Self {
            names: content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Labels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
