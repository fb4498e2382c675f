//! # cccd-cli
//!
//! The `cccd` command-line tool. Argument parsing lives here; every
//! handler delegates to the codec crates and writes pretty JSON to stdout
//! or to the global `--output` file.
//!
//! ```bash
//! cccd check-digit 00120001150
//! cccd verify 001200011504 079095050512
//! cccd generate --jurisdiction 001,079 --sex female --from 1980 --to 1990 --quantity 50
//! cccd analyze 001200011504 --detailed --location
//! cccd batch-analyze ids.txt
//! cccd jurisdictions --region south --search giang
//! cccd config
//! cccd registry cities
//! ```
//!
//! Handlers return the process exit code: `0` on success, `1` when the
//! command ran but its subject failed (an invalid identifier, a failed
//! generation, an unknown company).

pub mod analyze;
pub mod checksum;
pub mod config;
pub mod generate;
pub mod jurisdictions;
pub mod output;
pub mod registry;
