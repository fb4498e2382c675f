//! `cccd analyze` and `cccd batch-analyze`.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cccd_analyzer::{AnalyzeOptions, Analyzer};
use cccd_core::Limits;
use clap::Args;

use crate::output::emit;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Identifier to analyze.
    pub identifier: String,

    /// Include legal basis, structure breakdown and accuracy notes.
    #[arg(long)]
    pub detailed: bool,

    /// Include the registration location block.
    #[arg(long)]
    pub location: bool,
}

#[derive(Args, Debug)]
pub struct BatchAnalyzeArgs {
    /// File with one identifier per line, or `-` for stdin.
    pub input: PathBuf,
}

pub fn run_analyze(args: &AnalyzeArgs, output: Option<&Path>) -> Result<u8> {
    let analyzer = Analyzer::new().limits(Limits::from_env()?);
    let options = AnalyzeOptions {
        detailed: args.detailed,
        include_location: args.location,
    };
    let result = analyzer.analyze(args.identifier.trim(), options);
    emit(&result, output)?;
    Ok(if result.valid { 0 } else { 1 })
}

pub fn run_batch_analyze(args: &BatchAnalyzeArgs, output: Option<&Path>) -> Result<u8> {
    let identifiers = if args.input.as_os_str() == "-" {
        read_identifiers(std::io::stdin().lock())?
    } else {
        let file = std::fs::File::open(&args.input)
            .with_context(|| format!("failed to open {}", args.input.display()))?;
        read_identifiers(file)?
    };
    tracing::debug!(count = identifiers.len(), "identifiers read");

    let analyzer = Analyzer::new().limits(Limits::from_env()?);
    let batch = analyzer.batch_analyze(&identifiers);
    emit(&batch, output)?;
    Ok(0)
}

/// One identifier per line. Blank lines and `#` comments are skipped.
pub fn read_identifiers<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut identifiers = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line.context("failed to read identifier list")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        identifiers.push(trimmed.to_string());
    }
    Ok(identifiers)
}
