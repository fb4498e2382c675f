//! # Generator
//!
//! Draws synthetic identifiers that are checksum-valid and whose fields
//! are mutually consistent. Every random choice goes through the
//! generator's own `StdRng`, so a seeded generator replays the same batch
//! apart from the rare clock-based sequence fallback.
//!
//! Failures never abort a batch: each identifier becomes either an ok
//! record or an error record, and the caller sees both in order.

use std::time::Instant;

use cccd_core::calendar::{self, days_in_month};
use cccd_core::era::{self, Era};
use cccd_core::{
    checksum, CccdError, Identifier, JurisdictionCode, JurisdictionTable, LimitCheck, Limits,
    Operation, OutputKind, Sex, ValidationError,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::request::{ExplicitFields, GenerationRequest};
use crate::sequence::{SequenceKey, SequenceRegistry};
use crate::stats::{GeneratorStats, Kpis, PerformanceReport};

/// One successfully generated identifier with its semantic fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedIdentity {
    pub identifier: Identifier,
    pub jurisdiction_code: String,
    pub jurisdiction_name: &'static str,
    pub sex: Sex,
    pub era: Era,
    pub era_sex_code: u8,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    /// `DD/MM/YYYY`.
    pub birth_date: String,
    /// `identifier[10..12]`, which ends in the check digit.
    pub sequence: String,
    /// Two-digit value drawn before assembly.
    pub drawn_sequence: String,
    pub check_digit: u8,
    pub generated_at: DateTime<Utc>,
}

/// A per-item failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationFailure {
    /// Stable error code, see [`CccdError::code`].
    pub code: &'static str,
    pub message: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub error: CccdError,
}

impl GenerationFailure {
    fn new(error: CccdError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
            generated_at: Utc::now(),
            error,
        }
    }
}

/// One slot in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeneratedRecord {
    Ok(GeneratedIdentity),
    Error(GenerationFailure),
}

impl GeneratedRecord {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn identity(&self) -> Option<&GeneratedIdentity> {
        match self {
            Self::Ok(identity) => Some(identity),
            Self::Error(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            Self::Ok(_) => None,
            Self::Error(failure) => Some(failure),
        }
    }
}

/// Batch-level metadata.
#[derive(Debug, Clone, Serialize)]
pub struct BatchMetadata {
    pub batch_id: Uuid,
    pub operation: Operation,
    pub requested_quantity: usize,
    pub actual_quantity: usize,
    pub input_limit: usize,
    pub output_limit: usize,
    pub truncated: bool,
    /// Messages for every ceiling that was breached.
    pub limit_warnings: Vec<String>,
    pub elapsed_secs: f64,
    pub chunk_size: usize,
    pub kpis: Kpis,
    /// Generator counters after this batch.
    pub stats: GeneratorStats,
}

/// Result of [`Generator::generate`].
#[derive(Debug, Clone, Serialize)]
pub struct GenerationBatch {
    pub records: Vec<GeneratedRecord>,
    pub metadata: BatchMetadata,
}

impl GenerationBatch {
    pub fn identities(&self) -> impl Iterator<Item = &GeneratedIdentity> {
        self.records.iter().filter_map(GeneratedRecord::identity)
    }

    pub fn failures(&self) -> impl Iterator<Item = &GenerationFailure> {
        self.records.iter().filter_map(GeneratedRecord::failure)
    }
}

/// Chunk size used for progress logging.
pub fn chunk_size_for(quantity: usize) -> usize {
    match quantity {
        0..=100 => 50,
        101..=1_000 => 200,
        1_001..=10_000 => 1_000,
        _ => 2_000,
    }
}

/// Identifier generator. Owns its RNG, sequence registry and counters.
#[derive(Debug)]
pub struct Generator {
    rng: StdRng,
    limits: Limits,
    sequences: SequenceRegistry,
    stats: GeneratorStats,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Entropy-seeded generator with default limits.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            limits: Limits::default(),
            sequences: SequenceRegistry::new(),
            stats: GeneratorStats::default(),
        }
    }

    /// Replace the ceilings.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn stats(&self) -> &GeneratorStats {
        &self.stats
    }

    /// Generate a batch. Never fails as a whole.
    pub fn generate(&mut self, request: &GenerationRequest) -> GenerationBatch {
        let started = Instant::now();
        let batch_id = Uuid::new_v4();

        let mut limit_warnings = Vec::new();
        let capped = self.limits.check_quantity(request.quantity);
        note_breach(&capped, &mut limit_warnings);
        let input = self.limits.check_input(request.operation, capped.allowed);
        note_breach(&input, &mut limit_warnings);

        let quantity = input.allowed;
        let chunk_size = chunk_size_for(quantity);
        let pool: Vec<JurisdictionCode> = if request.jurisdictions.is_empty() {
            JurisdictionTable::global().codes()
        } else {
            request.jurisdictions.clone()
        };
        let years = request.normalized_years();

        let mut records = Vec::with_capacity(quantity);
        let mut done = 0;
        while done < quantity {
            let this_chunk = chunk_size.min(quantity - done);
            for _ in 0..this_chunk {
                let record = self.draw(&pool, request.sex, years, request.validate_output);
                records.push(record);
            }
            done += this_chunk;
            tracing::debug!(
                batch_id = %batch_id,
                generated = done,
                total = quantity,
                "generation chunk complete"
            );
        }

        let output = self
            .limits
            .check_output(OutputKind::MaxResultsPerRequest, records.len());
        note_breach(&output, &mut limit_warnings);
        records.truncate(output.allowed);

        let elapsed_secs = started.elapsed().as_secs_f64();
        let valid = records.iter().filter(|r| r.is_ok()).count();
        let kpis = Kpis::compute(valid, records.len(), elapsed_secs);

        tracing::info!(
            batch_id = %batch_id,
            requested = request.quantity,
            generated = records.len(),
            valid,
            coverage = kpis.coverage_rate,
            elapsed_secs,
            "generation batch complete"
        );

        GenerationBatch {
            metadata: BatchMetadata {
                batch_id,
                operation: request.operation,
                requested_quantity: request.quantity,
                actual_quantity: records.len(),
                input_limit: input.limit,
                output_limit: output.limit,
                truncated: capped.truncated || input.truncated || output.truncated,
                limit_warnings,
                elapsed_secs,
                chunk_size,
                kpis,
                stats: self.stats.clone(),
            },
            records,
        }
    }

    /// Build one identifier from explicit field values.
    ///
    /// The sequence is registered so later random draws avoid it.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::UnknownJurisdiction`] for an unassigned code.
    /// - [`CccdError::UnsupportedEra`] for a year outside 1900-2399.
    /// - [`ValidationError::InvalidDate`] / [`ValidationError::InvalidSequence`].
    pub fn generate_one(&mut self, fields: &ExplicitFields) -> Result<GeneratedIdentity, CccdError> {
        let result = self.build_explicit(fields);
        self.stats.total_generated += 1;
        match &result {
            Ok(_) => self.stats.valid += 1,
            Err(e) => self.record_error(e),
        }
        result
    }

    fn build_explicit(&mut self, fields: &ExplicitFields) -> Result<GeneratedIdentity, CccdError> {
        let code = &fields.jurisdiction;
        if !JurisdictionTable::global().contains(code.as_str()) {
            return Err(ValidationError::UnknownJurisdiction(code.to_string()).into());
        }
        let era = Era::for_year(fields.year)?;
        let era_sex_code = era::code_for_sex(i32::from(era.value()), fields.sex)?;
        let identifier = Identifier::compose(
            code,
            era_sex_code,
            fields.year,
            fields.month,
            fields.day,
            fields.sequence,
        )?;
        let key = SequenceKey::new(code.as_str(), fields.year, fields.month, fields.day);
        if !self.sequences.mark_used(key.clone(), fields.sequence) {
            self.stats.duplicate_sequences += 1;
            tracing::debug!(key = %key, sequence = fields.sequence, "explicit sequence slot reused");
        }
        Ok(identity(
            identifier,
            code,
            fields.sex,
            era,
            era_sex_code,
            (fields.year, fields.month, fields.day),
            fields.sequence,
        ))
    }

    /// Counters plus registry and table sizes.
    pub fn performance_report(&self) -> PerformanceReport {
        PerformanceReport {
            stats: self.stats.clone(),
            registry_size: self.sequences.len(),
            registry_keys: self.sequences.key_count(),
            jurisdiction_coverage: JurisdictionTable::global().len(),
            supported_eras: Era::all().map(Era::value).collect(),
        }
    }

    /// Forget every sequence handed out so far. Counters are kept.
    pub fn clear_sequences(&mut self) {
        let released = self.sequences.len();
        self.sequences.clear();
        tracing::debug!(released, "sequence registry cleared");
    }

    fn draw(
        &mut self,
        pool: &[JurisdictionCode],
        sex: Option<Sex>,
        years: (i32, i32),
        validate_output: bool,
    ) -> GeneratedRecord {
        self.stats.total_generated += 1;
        match self.try_draw(pool, sex, years, validate_output) {
            Ok(identity) => {
                self.stats.valid += 1;
                GeneratedRecord::Ok(identity)
            }
            Err(e) => {
                self.record_error(&e);
                GeneratedRecord::Error(GenerationFailure::new(e))
            }
        }
    }

    fn try_draw(
        &mut self,
        pool: &[JurisdictionCode],
        sex: Option<Sex>,
        (lo, hi): (i32, i32),
        validate_output: bool,
    ) -> Result<GeneratedIdentity, CccdError> {
        let code = pool
            .choose(&mut self.rng)
            .ok_or_else(|| ValidationError::UnknownJurisdiction(String::new()))?
            .clone();
        if !JurisdictionTable::global().contains(code.as_str()) {
            return Err(ValidationError::UnknownJurisdiction(code.to_string()).into());
        }

        let year = self.rng.gen_range(lo..=hi);
        let era = Era::for_year(year)?;
        let era_sex_code = era::code_for(i32::from(era.value()), sex, &mut self.rng)?;
        let month = self.rng.gen_range(1..=12);
        let day = self.rng.gen_range(1..=days_in_month(year, month).unwrap_or(28));

        let key = SequenceKey::new(code.as_str(), year, month, day);
        let draw = self.sequences.draw(key.clone(), &mut self.rng);
        if draw.fallback {
            self.stats.duplicate_sequences += 1;
            tracing::warn!(
                key = %key,
                sequence = draw.value,
                "sequence space exhausted, using clock fallback"
            );
        }

        let identifier = Identifier::compose(&code, era_sex_code, year, month, day, draw.value)?;
        if validate_output && !checksum::verify(identifier.as_str()) {
            tracing::error!(identifier = %identifier, "generated identifier fails its own checksum");
            return Err(CccdError::InternalConsistencyAlarm {
                identifier: identifier.to_string(),
            });
        }

        let sex = era::decode(era_sex_code)
            .sex()
            .unwrap_or_else(|| Sex::from_parity(era_sex_code));
        Ok(identity(
            identifier,
            &code,
            sex,
            era,
            era_sex_code,
            (year, month, day),
            draw.value,
        ))
    }

    fn record_error(&mut self, error: &CccdError) {
        self.stats.invalid += 1;
        match error {
            CccdError::UnsupportedEra { .. } => self.stats.era_errors += 1,
            CccdError::InternalConsistencyAlarm { .. } => self.stats.checksum_errors += 1,
            CccdError::Validation(ValidationError::UnknownJurisdiction(_)) => {
                self.stats.jurisdiction_errors += 1
            }
            _ => {}
        }
    }
}

fn note_breach(check: &LimitCheck, warnings: &mut Vec<String>) {
    if let Some(err) = check.exceeded() {
        tracing::warn!(
            operation = check.operation,
            requested = check.requested,
            limit = check.limit,
            "request truncated to limit"
        );
        warnings.push(err.to_string());
    }
}

fn identity(
    identifier: Identifier,
    code: &JurisdictionCode,
    sex: Sex,
    era: Era,
    era_sex_code: u8,
    (year, month, day): (i32, u32, u32),
    drawn_sequence: u32,
) -> GeneratedIdentity {
    let birth_date = calendar::birth_date(year, month, day)
        .map(calendar::format_date)
        .unwrap_or_else(|| format!("{day:02}/{month:02}/{year:04}"));
    GeneratedIdentity {
        jurisdiction_code: code.to_string(),
        jurisdiction_name: code.info().map_or("unknown", |j| j.name),
        sex,
        era,
        era_sex_code,
        birth_year: year,
        birth_month: month,
        birth_day: day,
        birth_date,
        sequence: identifier.sequence_code().to_string(),
        drawn_sequence: format!("{drawn_sequence:02}"),
        check_digit: identifier.check_digit(),
        generated_at: Utc::now(),
        identifier,
    }
}
