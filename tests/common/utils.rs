#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use seqbench::sets::{read_set_map_file, SetMap};

/// Runs the seqbench binary from the package root, with no config file in reach.
pub fn run_seqbench(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seqbench"))
        .args(args)
        .env("HOME", "data")
        .output()
        .expect("running seqbench")
}

pub fn stdout_text(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

/// A fresh path in the system temp dir, unique to this process and `name`.
pub fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("seqbench-{}-{}", std::process::id(), name));
    path
}

pub fn load_sets(path: &str) -> SetMap<String, String> {
    read_set_map_file(path).expect("Test file not found")
}
