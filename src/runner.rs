// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::io::{stdout, BufWriter, Write};

use log::{info, warn};

use clap::{Args, Parser, Subcommand};

use crate::bench::benchmark;
use crate::config::{find_config, SeqBenchConfig};
use crate::errors::SeqBenchError;
use crate::records::{best_per_group, FieldSelector};
use crate::report::{write_error_details, BenchmarkReport, SetSummary};
use crate::seq::fasta::{write_fasta_record, FastaReader};
use crate::seq::file::{open_input, open_output};
use crate::sets::{read_set_map, read_set_map_file, remove_big_sets, SetMap};
use crate::table::{read_tsv_records, write_tsv_row};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Re-wrap the sequences of a FastA file
    Rewrap {
        /// Input FastA file ("-" for stdin)
        input: String,

        /// Output file ("-" for stdout, "none" to only check the input)
        #[arg(short, long, default_value = "-")]
        output: String,

        /// Sequence line width (default: config file, else 80)
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Compare predicted key/value sets against reference sets
    Bench(BenchArgs),

    /// Keep the best-scoring rows for each id of a tab-separated table
    Best {
        /// Table with a header line ("-" for stdin)
        table: String,

        /// Column (name or 0-based position) holding the id
        #[arg(short, long = "id-field")]
        id_field: FieldSelector,

        /// Column (name or 0-based position) holding the score
        #[arg(short, long = "score-field")]
        score_field: FieldSelector,
    },
}

#[derive(Debug, Args)]
struct BenchArgs {
    /// Predictions: key<TAB>value lines
    predicted: String,

    /// Reference: key<TAB>value lines
    reference: String,

    /// Ignore keys with more than this many predicted values
    #[arg(long)]
    pmax: Option<usize>,

    /// Ignore keys with more than this many reference values
    #[arg(long)]
    rmax: Option<usize>,

    /// What the keys are called in the report (default: config file, else "documents")
    #[arg(short = 'n', long = "object-name")]
    object_name: Option<String>,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Also list every key whose prediction was not exact
    #[arg(short, long)]
    errors: bool,
}

fn load_config() -> SeqBenchConfig {
    let Some(path) = find_config() else {
        return SeqBenchConfig::default();
    };
    match SeqBenchConfig::from_file(&path) {
        Ok(cfg) => {
            info!("Using config {}", path.display());
            cfg
        }
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            SeqBenchConfig::default()
        }
    }
}

fn rewrap(input: &str, output: &str, width: usize) -> Result<(), SeqBenchError> {
    let mut sink = open_output(output)?;
    let mut count = 0;
    for record in FastaReader::new(open_input(input)?) {
        let record = record?;
        if let Some(out) = sink.as_mut() {
            write_fasta_record(out, &record, width)?;
        }
        count += 1;
    }
    if let Some(out) = sink.as_mut() {
        out.flush()?;
    }
    info!("{} records from {}", count, input);
    Ok(())
}

// "-" and "stdin" name standard input on the command line only.
fn read_sets(name: &str) -> Result<SetMap<String, String>, SeqBenchError> {
    match name {
        "-" | "stdin" => {
            info!("Parsing stdin");
            read_set_map(open_input(name)?)
        }
        _ => read_set_map_file(name),
    }
}

fn bench(args: BenchArgs, config: &SeqBenchConfig) -> Result<(), SeqBenchError> {
    let mut predicted = read_sets(&args.predicted)?;
    let mut reference = read_sets(&args.reference)?;
    let prediction_summary = SetSummary::of(args.predicted.as_str(), &predicted);
    let reference_summary = SetSummary::of(args.reference.as_str(), &reference);
    let common_keys = predicted
        .keys()
        .filter(|key| reference.contains_key(*key))
        .count();

    let pmax = args.pmax.or(config.pmax);
    let rmax = args.rmax.or(config.rmax);
    if let Some(max) = pmax {
        predicted = remove_big_sets(predicted, max);
    }
    if let Some(max) = rmax {
        reference = remove_big_sets(reference, max);
    }
    let object_name = args
        .object_name
        .as_deref()
        .unwrap_or_else(|| config.object_name());

    let Some(result) = benchmark(&predicted, &reference) else {
        return Err(SeqBenchError::EmptyInput(format!(
            "number of {} in common between prediction and reference is zero",
            object_name
        )));
    };

    let mut out = BufWriter::new(stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        let report = BenchmarkReport {
            object_name,
            prediction: prediction_summary,
            reference: reference_summary,
            common_keys,
            pmax,
            rmax,
            result: &result,
        };
        write!(out, "{}", report)?;
        if args.errors {
            writeln!(out)?;
            write_error_details(&mut out, &result.errors)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn best(
    table: &str,
    id_field: &FieldSelector,
    score_field: &FieldSelector,
) -> Result<(), SeqBenchError> {
    let (names, rows) = read_tsv_records(open_input(table)?)?;
    let kept = best_per_group(rows, id_field, score_field)?;
    info!("kept {} rows", kept.len());
    let mut out = BufWriter::new(stdout().lock());
    write_tsv_row(&mut out, &names)?;
    for row in &kept {
        write_tsv_row(&mut out, row.values())?;
    }
    out.flush()?;
    Ok(())
}

pub fn run() -> Result<(), SeqBenchError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let config = load_config();

    match cli.command {
        Command::Rewrap {
            input,
            output,
            width,
        } => rewrap(&input, &output, width.unwrap_or_else(|| config.line_width())),
        Command::Bench(args) => bench(args, &config),
        Command::Best {
            table,
            id_field,
            score_field,
        } => best(&table, &id_field, &score_field),
    }
}
