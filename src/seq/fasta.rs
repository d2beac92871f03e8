// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::mem;
use std::path::Path;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::errors::{Result, SeqBenchError};
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

/// Standard FASTA line width.
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Pull-based FastA parser over any buffered source.
///
/// Yields one record per '>' header, in file order. Blank lines and lines starting with '#' are
/// ignored; all other lines are sequence data, with any whitespace removed. A header followed
/// directly by another header (or by EOF) yields a record with an empty sequence. The reader
/// is single-pass: to read the data again, open a new reader over the source.
pub struct FastaReader<R: BufRead> {
    lines: Lines<R>,
    pending_header: Option<String>,
    sequence: String,
    empty_sequences: usize,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(source: R) -> Self {
        FastaReader {
            lines: source.lines(),
            pending_header: None,
            sequence: String::new(),
            empty_sequences: 0,
            done: false,
        }
    }

    /// Number of back-to-back headers seen so far, i.e. records that had to be emitted with an
    /// empty sequence.
    pub fn empty_sequences(&self) -> usize {
        self.empty_sequences
    }

    fn take_record(&mut self) -> SeqRecord {
        let header = match self.pending_header.take() {
            Some(hdr) => hdr,
            None => {
                warn!("sequence data found before the first FastA header");
                String::new()
            }
        };
        SeqRecord {
            header,
            sequence: mem::take(&mut self.sequence),
        }
    }

    // Returns a completed record if this header closes one.
    fn start_record(&mut self, raw_line: &str, hdr: &str) -> Option<SeqRecord> {
        let header = hdr.trim_matches('>').trim().to_string();
        if self.sequence.is_empty() && self.pending_header.is_none() {
            // very first header
            self.pending_header = Some(header);
            return None;
        }
        if self.sequence.is_empty() {
            warn!("empty sequence in FastA input, before header: {}", raw_line);
            self.empty_sequences += 1;
        }
        let record = self.take_record();
        self.pending_header = Some(header);
        Some(record)
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(l)) => l,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(SeqBenchError::from(e)));
                }
                None => {
                    self.done = true;
                    if self.sequence.is_empty() && self.pending_header.is_none() {
                        return None;
                    }
                    if self.sequence.is_empty() {
                        debug!("last FastA record has an empty sequence");
                    }
                    return Some(Ok(self.take_record()));
                }
            };
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(hdr) = line.strip_prefix('>') {
                if let Some(record) = self.start_record(&line, hdr) {
                    return Some(Ok(record));
                }
            } else {
                self.sequence
                    .extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }
    }
}

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile> {
    let file = File::open(path)?;
    FastaReader::new(BufReader::new(file)).collect()
}

/// Reads a FastA file into a map of header -> sequence. Later duplicates overwrite earlier ones.
pub fn parse_fasta_as_map<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    info!("Parsing {}", path.as_ref().display());
    let file = File::open(path)?;
    let mut map = HashMap::new();
    for record in FastaReader::new(BufReader::new(file)) {
        let record = record?;
        map.insert(record.header, record.sequence);
    }
    Ok(map)
}

/// Writes one FastA record to `out`: the header line, then the sequence in lines of exactly
/// `width` characters (the last one may be shorter). An empty sequence gives one empty line.
pub fn write_fasta<W: Write>(out: &mut W, header: &str, sequence: &str, width: usize) -> Result<()> {
    if width == 0 {
        return Err(SeqBenchError::Format(String::from(
            "FastA line width must be at least 1",
        )));
    }
    writeln!(out, ">{}", header)?;
    if sequence.is_empty() {
        writeln!(out)?;
        return Ok(());
    }
    for chunk in &sequence.chars().chunks(width) {
        let line: String = chunk.collect();
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn write_fasta_record<W: Write>(out: &mut W, record: &SeqRecord, width: usize) -> Result<()> {
    write_fasta(out, &record.header, &record.sequence, width)
}

/// Writes all `records` to a new file at `path`; the file is flushed and closed on return.
pub fn write_fasta_file<P: AsRef<Path>>(path: P, records: &[SeqRecord], width: usize) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for record in records {
        write_fasta_record(&mut out, record, width)?;
    }
    out.flush()?;
    Ok(())
}
