//! # cccd-generator — Synthetic Identifier Generation
//!
//! [`Generator::generate`] draws a batch of identifiers from a
//! [`GenerationRequest`]: jurisdiction, sex, birth date and sequence are
//! chosen at random within the request's bounds, assembled through
//! `cccd_core::Identifier::compose`, and optionally re-verified.
//!
//! Quantities above the configured ceiling are capped and reported in
//! [`BatchMetadata`]; per-identifier failures become error records.
//! Sequence uniqueness is per generator instance and best-effort, see
//! [`sequence`].

pub mod generator;
pub mod request;
pub mod sequence;
pub mod stats;

pub use generator::{
    chunk_size_for, BatchMetadata, GeneratedIdentity, GeneratedRecord, GenerationBatch,
    GenerationFailure, Generator,
};
pub use request::{ExplicitFields, GenerationRequest, DEFAULT_BIRTH_YEARS};
pub use sequence::{SequenceDraw, SequenceKey, SequenceRegistry};
pub use stats::{GeneratorStats, Kpis, PerformanceReport};
