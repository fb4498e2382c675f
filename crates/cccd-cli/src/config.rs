//! `cccd config`.

use std::path::Path;

use anyhow::{Context, Result};
use cccd_core::{config_summary, Limits, STRUCTURE_BREAKDOWN};
use clap::Args;

use crate::output::emit;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also print the identifier layout.
    #[arg(long)]
    pub structure: bool,
}

pub fn run_config(args: &ConfigArgs, output: Option<&Path>) -> Result<u8> {
    let limits = Limits::from_env().context("invalid CCCD_* environment configuration")?;
    let summary = config_summary(&limits);
    if args.structure {
        let mut value = serde_json::to_value(&summary)?;
        value["structure"] = STRUCTURE_BREAKDOWN
            .iter()
            .map(|&(positions, meaning)| (positions.to_string(), meaning.into()))
            .collect::<serde_json::Map<_, _>>()
            .into();
        emit(&value, output)?;
    } else {
        emit(&summary, output)?;
    }
    Ok(0)
}
