//! # Limits and Defaults
//!
//! Plain-data configuration consumed by the generator, the analyzer and
//! the CLI. Every field has a documented default; `from_env` overrides
//! individual fields from `CCCD_*` environment variables.
//!
//! Breaching a ceiling never fails an operation. [`Limits::check_input`]
//! and [`Limits::check_output`] return a [`LimitCheck`] describing the
//! cap, and the caller proceeds with [`LimitCheck::allowed`].

use serde::{Deserialize, Serialize};

use crate::era::{Era, ERA_SEX_TABLE, MAX_BIRTH_YEAR, MIN_BIRTH_YEAR};
use crate::error::{CccdError, ConfigError};
use crate::jurisdiction::JurisdictionTable;

/// Operations with an input ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SingleAnalysis,
    BatchAnalysis,
    GenerationSingle,
    GenerationBatch,
    VerificationSingle,
    VerificationBatch,
}

impl Operation {
    pub fn all() -> &'static [Operation] {
        &[
            Self::SingleAnalysis,
            Self::BatchAnalysis,
            Self::GenerationSingle,
            Self::GenerationBatch,
            Self::VerificationSingle,
            Self::VerificationBatch,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleAnalysis => "single_analysis",
            Self::BatchAnalysis => "batch_analysis",
            Self::GenerationSingle => "generation_single",
            Self::GenerationBatch => "generation_batch",
            Self::VerificationSingle => "verification_single",
            Self::VerificationBatch => "verification_batch",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    MaxResultsPerRequest,
    MaxExportRecords,
}

impl OutputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MaxResultsPerRequest => "max_results_per_request",
            Self::MaxExportRecords => "max_export_records",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-operation ceilings and generation bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub single_analysis: usize,
    pub batch_analysis: usize,
    pub generation_single: usize,
    pub generation_batch: usize,
    pub verification_single: usize,
    pub verification_batch: usize,
    pub max_results_per_request: usize,
    pub max_export_records: usize,
    pub min_birth_year: i32,
    pub max_birth_year: i32,
    pub default_quantity: usize,
    pub max_quantity: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            single_analysis: 1,
            batch_analysis: 1_000,
            generation_single: 10_000,
            generation_batch: 50_000,
            verification_single: 1,
            verification_batch: 1_000,
            max_results_per_request: 100_000,
            max_export_records: 100_000,
            min_birth_year: MIN_BIRTH_YEAR,
            max_birth_year: MAX_BIRTH_YEAR,
            default_quantity: 100,
            max_quantity: 100_000,
        }
    }
}

impl Limits {
    /// Defaults overridden from the process environment.
    ///
    /// Variables:
    /// - `CCCD_GENERATION_SINGLE_LIMIT` (default: 10000)
    /// - `CCCD_GENERATION_BATCH_LIMIT` (default: 50000)
    /// - `CCCD_BATCH_ANALYSIS_LIMIT` (default: 1000)
    /// - `CCCD_MAX_RESULTS` (default: 100000)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a value that does not
    /// parse, or any error from [`Limits::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`Limits::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut limits = Self::default();
        if let Some(v) = parse_var(&lookup, "CCCD_GENERATION_SINGLE_LIMIT")? {
            limits.generation_single = v;
        }
        if let Some(v) = parse_var(&lookup, "CCCD_GENERATION_BATCH_LIMIT")? {
            limits.generation_batch = v;
        }
        if let Some(v) = parse_var(&lookup, "CCCD_BATCH_ANALYSIS_LIMIT")? {
            limits.batch_analysis = v;
        }
        if let Some(v) = parse_var(&lookup, "CCCD_MAX_RESULTS")? {
            limits.max_results_per_request = v;
        }
        limits.validate()?;
        Ok(limits)
    }

    /// Check that individually valid settings agree with each other.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Inconsistent`] when the default quantity
    /// exceeds the maximum, the year range is empty or outside the era
    /// table, or any ceiling is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_quantity > self.max_quantity {
            return Err(ConfigError::Inconsistent(format!(
                "default quantity {} exceeds max quantity {}",
                self.default_quantity, self.max_quantity
            )));
        }
        if self.min_birth_year >= self.max_birth_year {
            return Err(ConfigError::Inconsistent(format!(
                "min birth year {} must be below max birth year {}",
                self.min_birth_year, self.max_birth_year
            )));
        }
        if self.min_birth_year < MIN_BIRTH_YEAR || self.max_birth_year > MAX_BIRTH_YEAR {
            return Err(ConfigError::Inconsistent(format!(
                "birth year range {}-{} is outside {MIN_BIRTH_YEAR}-{MAX_BIRTH_YEAR}",
                self.min_birth_year, self.max_birth_year
            )));
        }
        for op in Operation::all() {
            if self.input_limit(*op) == 0 {
                return Err(ConfigError::Inconsistent(format!("{op} limit is zero")));
            }
        }
        if self.max_results_per_request == 0 || self.max_export_records == 0 {
            return Err(ConfigError::Inconsistent("output limit is zero".into()));
        }
        Ok(())
    }

    /// Input ceiling for `op`.
    pub fn input_limit(&self, op: Operation) -> usize {
        match op {
            Operation::SingleAnalysis => self.single_analysis,
            Operation::BatchAnalysis => self.batch_analysis,
            Operation::GenerationSingle => self.generation_single,
            Operation::GenerationBatch => self.generation_batch,
            Operation::VerificationSingle => self.verification_single,
            Operation::VerificationBatch => self.verification_batch,
        }
    }

    /// Output ceiling for `kind`.
    pub fn output_limit(&self, kind: OutputKind) -> usize {
        match kind {
            OutputKind::MaxResultsPerRequest => self.max_results_per_request,
            OutputKind::MaxExportRecords => self.max_export_records,
        }
    }

    pub fn check_input(&self, op: Operation, requested: usize) -> LimitCheck {
        LimitCheck::new(op.as_str(), requested, self.input_limit(op))
    }

    pub fn check_output(&self, kind: OutputKind, requested: usize) -> LimitCheck {
        LimitCheck::new(kind.as_str(), requested, self.output_limit(kind))
    }

    /// Cap a generation quantity at `max_quantity`.
    pub fn check_quantity(&self, requested: usize) -> LimitCheck {
        LimitCheck::new("max_quantity", requested, self.max_quantity)
    }
}

/// Outcome of comparing a requested count against a ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitCheck {
    /// Operation or output kind checked.
    pub operation: &'static str,
    pub requested: usize,
    pub limit: usize,
    /// `min(requested, limit)`.
    pub allowed: usize,
    pub truncated: bool,
}

impl LimitCheck {
    fn new(operation: &'static str, requested: usize, limit: usize) -> Self {
        Self {
            operation,
            requested,
            limit,
            allowed: requested.min(limit),
            truncated: requested > limit,
        }
    }

    /// The breach as an error value, for recording in metadata.
    pub fn exceeded(&self) -> Option<CccdError> {
        self.truncated.then(|| CccdError::LimitExceeded {
            operation: self.operation.to_string(),
            requested: self.requested,
            limit: self.limit,
        })
    }
}

/// Regulations defining the identifier structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegalBasis {
    pub decree: &'static str,
    pub circular: &'static str,
    pub description: &'static str,
    pub effective_date: &'static str,
}

pub const LEGAL_BASIS: LegalBasis = LegalBasis {
    decree: "Decree 137/2015/NĐ-CP",
    circular: "Circular 07/2016/TT-BCA",
    description: "Personal identification numbers and citizen identity card structure",
    effective_date: "01/01/2016",
};

/// Human description of each field, 1-based positions.
pub const STRUCTURE_BREAKDOWN: [(&str, &str); 6] = [
    ("positions_1_3", "jurisdiction of birth registration"),
    ("position_4", "era and sex"),
    ("positions_5_6", "last two digits of birth year"),
    ("positions_7_8", "birth month (MM)"),
    ("positions_9_10", "birth day (DD)"),
    ("positions_11_12", "sequence; position 12 is the check digit"),
];

/// Serializable overview of the active configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub jurisdiction_count: usize,
    pub era_sex_code_count: usize,
    pub supported_eras: Vec<u8>,
    pub birth_year_range: (i32, i32),
    pub limits: Limits,
    pub legal_basis: LegalBasis,
}

pub fn config_summary(limits: &Limits) -> ConfigSummary {
    ConfigSummary {
        jurisdiction_count: JurisdictionTable::global().len(),
        era_sex_code_count: ERA_SEX_TABLE.len(),
        supported_eras: Era::all().map(Era::value).collect(),
        birth_year_range: (limits.min_birth_year, limits.max_birth_year),
        limits: limits.clone(),
        legal_basis: LEGAL_BASIS,
    }
}

/// Generation defaults for the command-line front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDefaults {
    pub birth_year_from: i32,
    pub birth_year_to: i32,
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for GeneratorDefaults {
    fn default() -> Self {
        Self {
            birth_year_from: 1990,
            birth_year_to: 2000,
            count: 100,
            seed: None,
        }
    }
}

impl GeneratorDefaults {
    /// Variables:
    /// - `CCCD_BIRTH_YEAR_FROM` (default: 1990)
    /// - `CCCD_BIRTH_YEAR_TO` (default: 2000)
    /// - `CCCD_COUNT` (default: 100)
    /// - `CCCD_RANDOM_SEED` (default: unset, entropy-seeded)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            birth_year_from: parse_var(&lookup, "CCCD_BIRTH_YEAR_FROM")?
                .unwrap_or(defaults.birth_year_from),
            birth_year_to: parse_var(&lookup, "CCCD_BIRTH_YEAR_TO")?
                .unwrap_or(defaults.birth_year_to),
            count: parse_var(&lookup, "CCCD_COUNT")?.unwrap_or(defaults.count),
            seed: parse_var(&lookup, "CCCD_RANDOM_SEED")?,
        })
    }
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            }),
    }
}
