// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

pub mod bench;
pub mod config;
pub mod errors;
pub mod records;
pub mod report;
mod runner;
pub mod seq;
pub mod sets;
pub mod table;

use crate::errors::SeqBenchError;

pub fn run() -> Result<(), SeqBenchError> {
    runner::run()
}
