// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fmt, io};

#[derive(Debug)]
pub enum SeqBenchError {
    Io(io::Error),
    Format(String),
    EmptyInput(String),
    UnknownField(String),
}

// These allow conversion to SeqBenchError, required for main() to return Result<()> and for '?'
// to work.

impl From<io::Error> for SeqBenchError {
    fn from(e: io::Error) -> Self {
        SeqBenchError::Io(e)
    }
}

impl From<String> for SeqBenchError {
    fn from(s: String) -> Self {
        SeqBenchError::Format(s)
    }
}

impl From<serde_json::Error> for SeqBenchError {
    fn from(e: serde_json::Error) -> Self {
        SeqBenchError::Format(format!("JSON: {}", e))
    }
}

impl fmt::Display for SeqBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqBenchError::Io(e) => write!(f, "I/O error: {}", e),
            SeqBenchError::Format(msg) => write!(f, "Format error: {}", msg),
            SeqBenchError::EmptyInput(what) => write!(f, "Empty input: {}", what),
            SeqBenchError::UnknownField(field) => write!(f, "Unknown field: {}", field),
        }
    }
}

impl std::error::Error for SeqBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeqBenchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SeqBenchError>;
