//! # Identifier Newtype and Field Layout
//!
//! An [`Identifier`] is exactly 12 ASCII digits whose last digit is the
//! check digit of the first 11. Construction goes through
//! [`check_format`], so holding an `Identifier` proves the format and
//! checksum are correct. It does not prove the fields are meaningful:
//! an unknown jurisdiction or an impossible date still parses, and the
//! analyzer reports those separately.
//!
//! ## Layout
//!
//! | Field | Positions |
//! |---|---|
//! | jurisdiction | `[0, 3)` |
//! | era/sex | `[3, 4)` |
//! | year | `[4, 6)` |
//! | month | `[6, 8)` |
//! | day | `[8, 10)` |
//! | sequence | `[10, 12)` |
//! | check digit | `11` |
//!
//! The sequence slice overlaps the check digit. Only the first digit of a
//! drawn sequence survives into the identifier.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::checksum::{self, BODY_LEN};
use crate::era::{self, Era};
use crate::error::{CccdError, ValidationError};
use crate::jurisdiction::JurisdictionCode;

/// Total identifier length.
pub const IDENTIFIER_LEN: usize = 12;

/// Jurisdiction code positions.
pub const JURISDICTION: Range<usize> = 0..3;
/// Era/sex code position.
pub const ERA_SEX: Range<usize> = 3..4;
/// Two-digit year positions.
pub const YEAR: Range<usize> = 4..6;
/// Month positions.
pub const MONTH: Range<usize> = 6..8;
/// Day positions.
pub const DAY: Range<usize> = 8..10;
/// Sequence positions, overlapping [`CHECK_DIGIT`].
pub const SEQUENCE: Range<usize> = 10..12;
/// Check digit position.
pub const CHECK_DIGIT: usize = 11;

/// Why a string is not a well-formed identifier.
///
/// Checks run in declaration order and the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatFailure {
    /// Empty input.
    Empty,
    /// At least one character is not an ASCII digit.
    NonDigit,
    /// All digits, but not 12 of them.
    WrongLength {
        /// Number of digits found.
        length: usize,
    },
    /// Twelve digits, but the check digit does not match.
    BadChecksum,
}

impl std::fmt::Display for FormatFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("identifier must not be empty"),
            Self::NonDigit => f.write_str("identifier may contain digits only"),
            Self::WrongLength { length } => {
                write!(f, "identifier must have exactly {IDENTIFIER_LEN} digits, got {length}")
            }
            Self::BadChecksum => f.write_str("identifier check digit does not match"),
        }
    }
}

/// Check that `input` is a well-formed identifier.
///
/// # Errors
///
/// Returns the first [`FormatFailure`] in priority order: empty,
/// non-digit, wrong length, bad checksum.
pub fn check_format(input: &str) -> Result<(), FormatFailure> {
    if input.is_empty() {
        return Err(FormatFailure::Empty);
    }
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatFailure::NonDigit);
    }
    if input.len() != IDENTIFIER_LEN {
        return Err(FormatFailure::WrongLength { length: input.len() });
    }
    if !checksum::verify(input) {
        return Err(FormatFailure::BadChecksum);
    }
    Ok(())
}

/// A format- and checksum-valid 12-digit identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Identifier(String);

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Identifier {
    /// Validate and wrap a 12-digit string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentifier`] carrying the
    /// [`FormatFailure`] message.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        match check_format(&s) {
            Ok(()) => Ok(Self(s)),
            Err(failure) => Err(ValidationError::InvalidIdentifier {
                value: s,
                reason: failure.to_string(),
            }),
        }
    }

    /// Validate `input`, keeping the structured [`FormatFailure`].
    ///
    /// # Errors
    ///
    /// Returns the same failure [`check_format`] reports.
    pub fn parse(input: &str) -> Result<Self, FormatFailure> {
        check_format(input).map(|()| Self(input.to_string()))
    }

    /// Build an identifier from explicit field values.
    ///
    /// Only the first digit of `sequence` is kept; the last position is
    /// always the check digit.
    ///
    /// # Errors
    ///
    /// - [`CccdError::UnsupportedEra`] if `year` is outside 1900-2399.
    /// - [`ValidationError::InvalidIdentifier`] if `era_sex_code` is not
    ///   in the table or belongs to a different era than `year`.
    /// - [`ValidationError::InvalidDate`] for an impossible date.
    /// - [`ValidationError::InvalidSequence`] if `sequence > 99`.
    pub fn compose(
        jurisdiction: &JurisdictionCode,
        era_sex_code: u8,
        year: i32,
        month: u32,
        day: u32,
        sequence: u32,
    ) -> Result<Self, CccdError> {
        let era = Era::for_year(year)?;
        match era::decode(era_sex_code).era() {
            Some(code_era) if code_era == era => {}
            Some(code_era) => {
                return Err(ValidationError::InvalidIdentifier {
                    value: jurisdiction.to_string(),
                    reason: format!(
                        "era/sex code {era_sex_code} belongs to era {code_era}, birth year {year} is era {era}"
                    ),
                }
                .into())
            }
            None => {
                return Err(ValidationError::InvalidIdentifier {
                    value: jurisdiction.to_string(),
                    reason: format!("era/sex code {era_sex_code} is not in the table"),
                }
                .into())
            }
        }
        if calendar::birth_date(year, month, day).is_none() {
            return Err(ValidationError::InvalidDate { year, month, day }.into());
        }
        if sequence > 99 {
            return Err(ValidationError::InvalidSequence(sequence).into());
        }

        let body = format!(
            "{}{}{:02}{:02}{:02}{}",
            jurisdiction.as_str(),
            era_sex_code,
            year.rem_euclid(100),
            month,
            day,
            sequence / 10,
        );
        debug_assert_eq!(body.len(), BODY_LEN);
        let check = checksum::compute_check_digit(&body)?;
        Ok(Self(format!("{body}{check}")))
    }

    /// The 12 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Positions `[0, 3)`.
    pub fn jurisdiction_code(&self) -> &str {
        &self.0[JURISDICTION]
    }

    /// Position 3 as a number.
    pub fn era_sex_code(&self) -> u8 {
        self.digit(ERA_SEX.start)
    }

    /// Positions `[4, 6)`.
    pub fn year_code(&self) -> &str {
        &self.0[YEAR]
    }

    /// Positions `[6, 8)`.
    pub fn month_code(&self) -> &str {
        &self.0[MONTH]
    }

    /// Positions `[8, 10)`.
    pub fn day_code(&self) -> &str {
        &self.0[DAY]
    }

    /// Positions `[10, 12)`, including the check digit.
    pub fn sequence_code(&self) -> &str {
        &self.0[SEQUENCE]
    }

    /// Position 11.
    pub fn check_digit(&self) -> u8 {
        self.digit(CHECK_DIGIT)
    }

    fn digit(&self, pos: usize) -> u8 {
        self.0.as_bytes()[pos] - b'0'
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
