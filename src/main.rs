// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use seqbench::errors::SeqBenchError;

fn main() -> Result<(), SeqBenchError> {
    seqbench::run()
}
