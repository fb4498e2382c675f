//! `cccd jurisdictions`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use cccd_core::{Jurisdiction, JurisdictionKind, JurisdictionTable, Region};
use clap::Args;
use serde::Serialize;

use crate::output::emit;

#[derive(Args, Debug, Default)]
pub struct JurisdictionsArgs {
    /// Only this region (north|central|south).
    #[arg(long)]
    pub region: Option<Region>,

    /// Case-insensitive name substring.
    #[arg(long)]
    pub search: Option<String>,

    /// Print per-region and per-kind counts instead of rows.
    #[arg(long, conflicts_with_all = ["region", "search"])]
    pub stats: bool,
}

#[derive(Debug, Serialize)]
struct Statistics {
    total: usize,
    by_region: BTreeMap<Region, usize>,
    by_kind: BTreeMap<JurisdictionKind, usize>,
}

pub fn run_jurisdictions(args: &JurisdictionsArgs, output: Option<&Path>) -> Result<u8> {
    let table = JurisdictionTable::global();
    if args.stats {
        emit(
            &Statistics {
                total: table.len(),
                by_region: table.region_statistics(),
                by_kind: table.kind_statistics(),
            },
            output,
        )?;
        return Ok(0);
    }

    let rows = select(table, args);
    emit(&rows, output)?;
    Ok(0)
}

/// Rows matching both filters, in code order.
pub fn select(table: &JurisdictionTable, args: &JurisdictionsArgs) -> Vec<&'static Jurisdiction> {
    let mut rows = match args.search.as_deref() {
        Some(keyword) => table.search(keyword),
        None => table.all().collect(),
    };
    if let Some(region) = args.region {
        rows.retain(|j| j.region == region);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_lists_everything() {
        let table = JurisdictionTable::global();
        assert_eq!(select(table, &JurisdictionsArgs::default()).len(), 63);
    }

    #[test]
    fn search_and_region_combine() {
        let table = JurisdictionTable::global();
        let args = JurisdictionsArgs {
            region: Some(Region::South),
            search: Some("giang".into()),
            stats: false,
        };
        let codes: Vec<&str> = select(table, &args).iter().map(|j| j.code).collect();
        assert_eq!(codes, vec!["082", "089", "091", "093"]);
    }

    #[test]
    fn region_only() {
        let table = JurisdictionTable::global();
        let args = JurisdictionsArgs {
            region: Some(Region::Central),
            ..JurisdictionsArgs::default()
        };
        assert_eq!(select(table, &args).len(), 16);
    }
}
