//! # Analyzer
//!
//! Decodes an arbitrary string into an [`AnalysisResult`].
//!
//! 1. Format check, failing closed in priority order: empty, non-digit,
//!    wrong length, bad checksum.
//! 2. Field decode by position.
//! 3. Birth date: the full year exists only when the era is known, and
//!    the date must fall in 1900-2399 and exist in the Gregorian calendar.
//! 4. Consistency: the era/sex digit must equal the code a correct
//!    identifier would carry for the decoded year and sex.
//! 5. Verdict: jurisdiction, era/sex, birth date and consistency must all
//!    pass. The sequence is reported but not scored.

use cccd_core::calendar;
use cccd_core::era::{self, EraSex};
use cccd_core::{Identifier, JurisdictionTable, Limits, LEGAL_BASIS, STRUCTURE_BREAKDOWN};
use chrono::{Datelike, NaiveDate, Utc};

use crate::result::{
    AnalysisResult, BirthDateField, DetailedAnalysis, EraSexField, Fields, JurisdictionField,
    LocationInfo, SequenceField, StructureEntry, Summary, ValidationScores,
};

const SCORED_CHECKS: f64 = 4.0;

const ACCURACY_NOTES: [&str; 4] = [
    "structure follows the published regulation",
    "jurisdiction code checked against the official table",
    "era/sex digit checked against the birth year",
    "birth date checked against the Gregorian calendar, leap years included",
];

/// Which optional blocks to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub detailed: bool,
    pub include_location: bool,
}

impl AnalyzeOptions {
    /// Both optional blocks.
    pub fn full() -> Self {
        Self {
            detailed: true,
            include_location: true,
        }
    }
}

/// Stateless identifier analyzer.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    reference_date: Option<NaiveDate>,
    pub(crate) limits: Limits,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute ages relative to `date` instead of today.
    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Analyze one input. Never fails; malformed input yields
    /// `valid = false` with a [`FormatFailure`](cccd_core::FormatFailure).
    pub fn analyze(&self, input: &str, options: AnalyzeOptions) -> AnalysisResult {
        let id = match Identifier::parse(input) {
            Ok(id) => id,
            Err(failure) => {
                tracing::debug!(%failure, "identifier rejected by format check");
                return AnalysisResult::malformed(input, failure);
            }
        };

        let jurisdiction = jurisdiction_field(&id);
        let decoded = era::decode(id.era_sex_code());
        let era_sex = era_sex_field(id.era_sex_code(), decoded);
        let birth_date = self.birth_date_field(&id, decoded);
        let sequence = sequence_field(&id);

        let consistent = match (birth_date.full_year, decoded.sex()) {
            (Some(year), Some(sex)) => era::expected_code(year, sex) == Some(id.era_sex_code()),
            _ => false,
        };
        let checks = [jurisdiction.valid, era_sex.valid, birth_date.valid, consistent];
        let passing = checks.iter().filter(|c| **c).count();
        let validation = ValidationScores {
            jurisdiction_valid: jurisdiction.valid,
            era_sex_valid: era_sex.valid,
            birth_date_valid: birth_date.valid,
            sequence_valid: sequence.valid,
            consistent,
            overall_valid: passing == checks.len(),
            score: passing as f64 / SCORED_CHECKS * 100.0,
        };

        let summary = birth_date.formatted.as_ref().map(|formatted| {
            let place = jurisdiction.name.unwrap_or("an unknown jurisdiction");
            let who = decoded.sex().map_or("person".to_string(), |s| s.to_string());
            let age = birth_date
                .age
                .map_or(String::new(), |a| format!(", aged {a}"));
            Summary {
                jurisdiction_name: jurisdiction.name,
                sex: decoded.sex(),
                birth_date: formatted.clone(),
                age: birth_date.age,
                description: format!("{who} born {formatted} in {place}{age}"),
            }
        });

        let location = if options.include_location {
            location_info(&jurisdiction)
        } else {
            None
        };
        let detailed = options.detailed.then(detailed_analysis);

        AnalysisResult {
            identifier: id.to_string(),
            valid: validation.overall_valid,
            format_failure: None,
            error: None,
            fields: Some(Fields {
                jurisdiction,
                era_sex,
                birth_date,
                sequence,
            }),
            validation: Some(validation),
            summary,
            location,
            detailed,
        }
    }

    fn birth_date_field(&self, id: &Identifier, decoded: EraSex) -> BirthDateField {
        let year_code: u8 = parse_digits(id.year_code()) as u8;
        let month = parse_digits(id.month_code());
        let day = parse_digits(id.day_code());

        let date = decoded
            .era()
            .map(|era| era.full_year(year_code))
            .and_then(|year| calendar::birth_date(year, month, day));

        let (full_year, formatted, age, description) = match date {
            Some(d) => {
                let formatted = calendar::format_date(d);
                let description = format!("born {formatted}");
                (
                    Some(d.year()),
                    Some(formatted),
                    Some(calendar::age_on(d, self.today())),
                    description,
                )
            }
            None => (None, None, None, "birth date is not valid".to_string()),
        };

        BirthDateField {
            year_code: id.year_code().to_string(),
            month_code: id.month_code().to_string(),
            day_code: id.day_code().to_string(),
            full_year,
            month,
            day,
            valid: date.is_some(),
            formatted,
            age,
            description,
        }
    }
}

fn jurisdiction_field(id: &Identifier) -> JurisdictionField {
    let code = id.jurisdiction_code();
    let info = JurisdictionTable::global().lookup(code);
    JurisdictionField {
        code: code.to_string(),
        name: info.map(|j| j.name),
        region: info.map(|j| j.region),
        kind: info.map(|j| j.kind),
        valid: info.is_some(),
        description: "jurisdiction of birth registration",
    }
}

fn era_sex_field(code: u8, decoded: EraSex) -> EraSexField {
    EraSexField {
        code,
        era: decoded.era(),
        sex: decoded.sex(),
        valid: matches!(decoded, EraSex::Known { .. }),
        description: era::entry(code).map_or("code is not in the era/sex table", |e| e.description),
    }
}

fn sequence_field(id: &Identifier) -> SequenceField {
    SequenceField {
        code: id.sequence_code().to_string(),
        number: parse_digits(id.sequence_code()),
        valid: true,
        description: "sequence disambiguator; last digit is the check digit",
    }
}

fn location_info(jurisdiction: &JurisdictionField) -> Option<LocationInfo> {
    let info = JurisdictionTable::global().lookup(&jurisdiction.code)?;
    Some(LocationInfo {
        code: info.code.to_string(),
        name: info.name,
        region: info.region,
        region_name: info.region.local_name(),
        kind: info.kind,
        description: format!("{} ({}), place of birth registration", info.name, info.kind.local_name()),
    })
}

fn detailed_analysis() -> DetailedAnalysis {
    DetailedAnalysis {
        legal_basis: LEGAL_BASIS,
        structure_breakdown: STRUCTURE_BREAKDOWN
            .iter()
            .map(|&(positions, meaning)| StructureEntry { positions, meaning })
            .collect(),
        accuracy_notes: ACCURACY_NOTES.to_vec(),
    }
}

/// Caller guarantees ASCII digits.
fn parse_digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
