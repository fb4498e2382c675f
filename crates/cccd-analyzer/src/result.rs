//! Analysis result types.
//!
//! Everything here is a plain serializable value. A result is produced for
//! every input, including malformed ones; [`AnalysisResult::valid`] is the
//! single verdict.

use cccd_core::{Era, FormatFailure, JurisdictionKind, LegalBasis, Region, Sex};
use serde::Serialize;

/// Jurisdiction prefix, positions `[0, 3)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionField {
    pub code: String,
    pub name: Option<&'static str>,
    pub region: Option<Region>,
    pub kind: Option<JurisdictionKind>,
    pub valid: bool,
    pub description: &'static str,
}

/// Era/sex digit, position 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EraSexField {
    pub code: u8,
    pub era: Option<Era>,
    pub sex: Option<Sex>,
    pub valid: bool,
    pub description: &'static str,
}

/// Birth date, positions `[4, 10)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthDateField {
    pub year_code: String,
    pub month_code: String,
    pub day_code: String,
    /// Present only for a valid date.
    pub full_year: Option<i32>,
    pub month: u32,
    pub day: u32,
    /// `DD/MM/YYYY`, present only for a valid date.
    pub formatted: Option<String>,
    /// Whole years at the analyzer's reference date.
    pub age: Option<u32>,
    pub valid: bool,
    pub description: String,
}

/// Sequence slice, positions `[10, 12)`. Reported, never scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceField {
    pub code: String,
    pub number: u32,
    pub valid: bool,
    pub description: &'static str,
}

/// Per-field breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fields {
    pub jurisdiction: JurisdictionField,
    pub era_sex: EraSexField,
    pub birth_date: BirthDateField,
    pub sequence: SequenceField,
}

/// Individual checks and the aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationScores {
    pub jurisdiction_valid: bool,
    pub era_sex_valid: bool,
    pub birth_date_valid: bool,
    pub sequence_valid: bool,
    /// Era/sex code agrees with the birth year and decoded sex.
    pub consistent: bool,
    pub overall_valid: bool,
    /// Percentage of the four scored checks that pass.
    pub score: f64,
}

/// One-line human summary, present when the birth date is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub jurisdiction_name: Option<&'static str>,
    pub sex: Option<Sex>,
    pub birth_date: String,
    pub age: Option<u32>,
    pub description: String,
}

/// Registration location, present for a known jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationInfo {
    pub code: String,
    pub name: &'static str,
    pub region: Region,
    pub region_name: &'static str,
    pub kind: JurisdictionKind,
    pub description: String,
}

/// Regulatory context and layout notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedAnalysis {
    pub legal_basis: LegalBasis,
    pub structure_breakdown: Vec<StructureEntry>,
    pub accuracy_notes: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureEntry {
    pub positions: &'static str,
    pub meaning: &'static str,
}

/// Outcome of analyzing one input string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub identifier: String,
    pub valid: bool,
    /// Set when the input is not a well-formed identifier; nothing else
    /// is decoded in that case.
    pub format_failure: Option<FormatFailure>,
    pub error: Option<String>,
    pub fields: Option<Fields>,
    pub validation: Option<ValidationScores>,
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<DetailedAnalysis>,
}

impl AnalysisResult {
    pub(crate) fn malformed(input: &str, failure: FormatFailure) -> Self {
        Self {
            identifier: input.to_string(),
            valid: false,
            format_failure: Some(failure),
            error: Some(failure.to_string()),
            fields: None,
            validation: None,
            summary: None,
            location: None,
            detailed: None,
        }
    }

    /// Decoded sex, if any.
    pub fn sex(&self) -> Option<Sex> {
        self.fields.as_ref().and_then(|f| f.era_sex.sex)
    }

    /// Age at the reference date, if the birth date is valid.
    pub fn age(&self) -> Option<u32> {
        self.fields.as_ref().and_then(|f| f.birth_date.age)
    }

    /// Validation score, zero for malformed input.
    pub fn score(&self) -> f64 {
        self.validation.as_ref().map_or(0.0, |v| v.score)
    }
}
