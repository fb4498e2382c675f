//! # cccd-core — Foundational Types for the CCCD Codec Stack
//!
//! Every other crate in the workspace depends on `cccd-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One table per rule.** The era/sex table and the jurisdiction table
//!    are the only places their mappings are written down. Generation and
//!    analysis both read them, so encode and decode cannot drift apart.
//!
//! 2. **Validated newtypes.** [`Identifier`], [`JurisdictionCode`] and
//!    [`Era`] validate at construction and through `Deserialize`.
//!
//! 3. **Truncate and report.** Ceilings in [`Limits`] cap counts; they
//!    never turn into hard failures.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cccd-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod calendar;
pub mod checksum;
pub mod config;
pub mod era;
pub mod error;
pub mod identity;
pub mod jurisdiction;

// Re-export primary types for ergonomic imports.
pub use checksum::{compute_check_digit, verify};
pub use config::{
    config_summary, ConfigSummary, GeneratorDefaults, LegalBasis, LimitCheck, Limits, Operation,
    OutputKind, LEGAL_BASIS, STRUCTURE_BREAKDOWN,
};
pub use era::{Era, EraSex, EraSexEntry, Sex, ERA_SEX_TABLE, MAX_BIRTH_YEAR, MIN_BIRTH_YEAR};
pub use error::{CccdError, ConfigError, ValidationError};
pub use identity::{check_format, FormatFailure, Identifier};
pub use jurisdiction::{Jurisdiction, JurisdictionCode, JurisdictionKind, JurisdictionTable, Region};
