// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::Result;
use crate::seq::fasta::DEFAULT_LINE_WIDTH;

pub const CONFIG_FILE_NAME: &str = ".seqbenchconfig";
pub const DEFAULT_OBJECT_NAME: &str = "documents";

/// User settings, read from a JSON file. Every key is optional; command-line flags take
/// precedence over the file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeqBenchConfig {
    pub line_width: Option<usize>,
    pub object_name: Option<String>,
    pub pmax: Option<usize>,
    pub rmax: Option<usize>,
}

impl SeqBenchConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn line_width(&self) -> usize {
        self.line_width.unwrap_or(DEFAULT_LINE_WIDTH)
    }

    pub fn object_name(&self) -> &str {
        self.object_name.as_deref().unwrap_or(DEFAULT_OBJECT_NAME)
    }
}

/// Looks for the config file in $HOME, then in the current directory.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
