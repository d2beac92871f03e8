// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use crate::seq::record::SeqRecord;

// For our purposes, a sequence file is just a Vec of sequence records.
//

pub type SeqFile = Vec<SeqRecord>;

/// Opens `name` for buffered reading. "-" and "stdin" mean standard input.
pub fn open_input(name: &str) -> io::Result<Box<dyn BufRead>> {
    match name {
        "-" | "stdin" => Ok(Box::new(BufReader::new(io::stdin()))),
        path => Ok(Box::new(BufReader::new(File::open(path)?))),
    }
}

/// Opens `name` for buffered writing. "-" and "stdout" mean standard output; "none" (in any case)
/// means there is no sink at all, and yields `None`.
pub fn open_output(name: &str) -> io::Result<Option<Box<dyn Write>>> {
    if name.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match name {
        "-" | "stdout" => Ok(Some(Box::new(BufWriter::new(io::stdout())))),
        path => Ok(Some(Box::new(BufWriter::new(File::create(path)?)))),
    }
}
