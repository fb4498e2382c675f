//! `cccd check-digit` and `cccd verify`.

use std::path::Path;

use anyhow::{Context, Result};
use cccd_core::{check_format, checksum, FormatFailure, Limits, Operation};
use clap::Args;
use serde::Serialize;

use crate::output::emit;

#[derive(Args, Debug)]
pub struct CheckDigitArgs {
    /// The first eleven digits of an identifier.
    pub body: String,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Identifiers to verify.
    #[arg(required = true, num_args = 1..)]
    pub identifiers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckDigitOutput<'a> {
    body: &'a str,
    check_digit: u8,
    identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyOutcome {
    pub identifier: String,
    pub valid: bool,
    pub failure: Option<FormatFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub requested: usize,
    pub limit: usize,
    pub truncated: bool,
    pub valid_count: usize,
    pub results: Vec<VerifyOutcome>,
}

impl VerifyReport {
    pub fn all_valid(&self) -> bool {
        self.valid_count == self.results.len()
    }
}

pub fn run_check_digit(args: &CheckDigitArgs, output: Option<&Path>) -> Result<u8> {
    let body = args.body.trim();
    let check_digit = checksum::compute_check_digit(body)
        .with_context(|| format!("cannot compute a check digit for \"{body}\""))?;
    emit(
        &CheckDigitOutput {
            body,
            check_digit,
            identifier: format!("{body}{check_digit}"),
        },
        output,
    )?;
    Ok(0)
}

pub fn run_verify(args: &VerifyArgs, output: Option<&Path>) -> Result<u8> {
    let limits = Limits::from_env()?;
    let report = verify_all(&args.identifiers, &limits);
    emit(&report, output)?;
    Ok(if report.all_valid() { 0 } else { 1 })
}

/// Verify under the single or batch ceiling, depending on input count.
pub fn verify_all(identifiers: &[String], limits: &Limits) -> VerifyReport {
    let op = if identifiers.len() <= 1 {
        Operation::VerificationSingle
    } else {
        Operation::VerificationBatch
    };
    let check = limits.check_input(op, identifiers.len());
    if check.truncated {
        tracing::warn!(
            requested = check.requested,
            limit = check.limit,
            "verification input truncated"
        );
    }

    let results: Vec<VerifyOutcome> = identifiers[..check.allowed]
        .iter()
        .map(|id| {
            let failure = check_format(id.trim()).err();
            VerifyOutcome {
                identifier: id.clone(),
                valid: failure.is_none(),
                failure,
            }
        })
        .collect();

    VerifyReport {
        requested: check.requested,
        limit: check.limit,
        truncated: check.truncated,
        valid_count: results.iter().filter(|r| r.valid).count(),
        results,
    }
}
