//! # cccd-analyzer — Identifier Analysis
//!
//! Turns arbitrary input strings into structured [`AnalysisResult`]s: a
//! format verdict, a per-field breakdown, four scored validity checks and
//! optional summary, location and regulatory blocks.
//!
//! Analysis never returns an error. Malformed input is a result with
//! `valid = false` and a [`FormatFailure`](cccd_core::FormatFailure).

pub mod analyzer;
pub mod batch;
pub mod result;

pub use analyzer::{AnalyzeOptions, Analyzer};
pub use batch::{AgeBucket, BatchAnalysis, BatchLimits, BatchSummary, JurisdictionCount};
pub use result::{
    AnalysisResult, BirthDateField, DetailedAnalysis, EraSexField, Fields, JurisdictionField,
    LocationInfo, SequenceField, StructureEntry, Summary, ValidationScores,
};
