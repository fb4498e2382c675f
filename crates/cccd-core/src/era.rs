//! # Era/Sex Code Table
//!
//! The fourth digit of an identifier encodes both the holder's sex and the
//! century bracket ("era") of their birth year. Even codes are male, odd
//! codes are female, and `code / 2` indexes eras 20 through 24.
//!
//! [`ERA_SEX_TABLE`] is the single source of truth for this mapping. The
//! generator and the analyzer both go through the functions in this module
//! rather than repeating the arithmetic, which keeps encode and decode
//! symmetric.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CccdError, ValidationError};

/// Earliest supported full birth year.
pub const MIN_BIRTH_YEAR: i32 = 1900;

/// Latest supported full birth year.
pub const MAX_BIRTH_YEAR: i32 = 2399;

/// Holder sex as encoded by the parity of the era/sex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Even codes.
    Male,
    /// Odd codes.
    Female,
}

impl Sex {
    /// Both variants, male first.
    pub fn all() -> &'static [Sex] {
        &[Self::Male, Self::Female]
    }

    /// The sex a code's parity denotes.
    pub fn from_parity(code: u8) -> Self {
        if code % 2 == 0 {
            Self::Male
        } else {
            Self::Female
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = ValidationError;

    /// Accepts `male`/`m`/`nam` and `female`/`f`/`nữ`/`nu`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "nam" => Ok(Self::Male),
            "female" | "f" | "nữ" | "nu" => Ok(Self::Female),
            _ => Err(ValidationError::InvalidSex(s.to_string())),
        }
    }
}

/// A century bracket, 20 (1900-1999) through 24 (2300-2399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Era(u8);

impl<'de> Deserialize<'de> for Era {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i32::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Era {
    /// Lowest era in the table.
    pub const FIRST: Era = Era(20);
    /// Highest era in the table.
    pub const LAST: Era = Era(24);

    /// Validate an era number.
    ///
    /// # Errors
    ///
    /// Returns [`CccdError::UnsupportedEra`] outside 20-24.
    pub fn new(era: i32) -> Result<Self, CccdError> {
        if (i32::from(Self::FIRST.0)..=i32::from(Self::LAST.0)).contains(&era) {
            Ok(Self(era as u8))
        } else {
            Err(CccdError::UnsupportedEra { era })
        }
    }

    /// The era a full birth year belongs to: `year / 100 + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`CccdError::UnsupportedEra`] for years outside
    /// [`MIN_BIRTH_YEAR`]..=[`MAX_BIRTH_YEAR`].
    pub fn for_year(year: i32) -> Result<Self, CccdError> {
        let era = year.div_euclid(100) + 1;
        if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&year) {
            return Err(CccdError::UnsupportedEra { era });
        }
        Self::new(era)
    }

    /// Every supported era in ascending order.
    pub fn all() -> impl Iterator<Item = Era> {
        (Self::FIRST.0..=Self::LAST.0).map(Era)
    }

    /// The era number.
    pub fn value(self) -> u8 {
        self.0
    }

    /// First year of the bracket (1900 for era 20).
    pub fn first_year(self) -> i32 {
        (i32::from(self.0) - 1) * 100
    }

    /// Last year of the bracket (1999 for era 20).
    pub fn last_year(self) -> i32 {
        self.first_year() + 99
    }

    /// Rebuild a full year from the two-digit year code.
    pub fn full_year(self, year_code: u8) -> i32 {
        self.first_year() + i32::from(year_code)
    }
}

impl std::fmt::Display for Era {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the era/sex table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EraSexEntry {
    /// The digit stored at position 3.
    pub code: u8,
    /// Century bracket.
    pub era: Era,
    /// Holder sex.
    pub sex: Sex,
    /// Human-readable description.
    pub description: &'static str,
}

/// The ten era/sex codes.
pub const ERA_SEX_TABLE: [EraSexEntry; 10] = [
    EraSexEntry { code: 0, era: Era(20), sex: Sex::Male, description: "male, born 1900-1999" },
    EraSexEntry { code: 1, era: Era(20), sex: Sex::Female, description: "female, born 1900-1999" },
    EraSexEntry { code: 2, era: Era(21), sex: Sex::Male, description: "male, born 2000-2099" },
    EraSexEntry { code: 3, era: Era(21), sex: Sex::Female, description: "female, born 2000-2099" },
    EraSexEntry { code: 4, era: Era(22), sex: Sex::Male, description: "male, born 2100-2199" },
    EraSexEntry { code: 5, era: Era(22), sex: Sex::Female, description: "female, born 2100-2199" },
    EraSexEntry { code: 6, era: Era(23), sex: Sex::Male, description: "male, born 2200-2299" },
    EraSexEntry { code: 7, era: Era(23), sex: Sex::Female, description: "female, born 2200-2299" },
    EraSexEntry { code: 8, era: Era(24), sex: Sex::Male, description: "male, born 2300-2399" },
    EraSexEntry { code: 9, era: Era(24), sex: Sex::Female, description: "female, born 2300-2399" },
];

/// Result of decoding an era/sex digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EraSex {
    /// The code is in the table.
    Known {
        /// Century bracket.
        era: Era,
        /// Holder sex.
        sex: Sex,
    },
    /// The code is not in the table.
    Unknown,
}

impl EraSex {
    /// The era, if known.
    pub fn era(self) -> Option<Era> {
        match self {
            Self::Known { era, .. } => Some(era),
            Self::Unknown => None,
        }
    }

    /// The sex, if known.
    pub fn sex(self) -> Option<Sex> {
        match self {
            Self::Known { sex, .. } => Some(sex),
            Self::Unknown => None,
        }
    }
}

/// Shorthand for [`Era::for_year`].
///
/// # Errors
///
/// Returns [`CccdError::UnsupportedEra`] outside 1900-2399.
pub fn era_for_year(year: i32) -> Result<Era, CccdError> {
    Era::for_year(year)
}

/// Look up a code's table row.
pub fn entry(code: u8) -> Option<&'static EraSexEntry> {
    ERA_SEX_TABLE.iter().find(|e| e.code == code)
}

/// Decode a code into its era and sex. Codes outside the table decode to
/// [`EraSex::Unknown`].
pub fn decode(code: u8) -> EraSex {
    match entry(code) {
        Some(e) => EraSex::Known { era: e.era, sex: e.sex },
        None => EraSex::Unknown,
    }
}

/// The code for an era and a known sex.
///
/// # Errors
///
/// Returns [`CccdError::UnsupportedEra`] if `era` is outside 20-24.
pub fn code_for_sex(era: i32, sex: Sex) -> Result<u8, CccdError> {
    let era = Era::new(era)?;
    ERA_SEX_TABLE
        .iter()
        .find(|e| e.era == era && e.sex == sex)
        .map(|e| e.code)
        .ok_or(CccdError::UnsupportedEra { era: i32::from(era.value()) })
}

/// The code for an era, honouring `sex` when given and otherwise picking
/// uniformly between the era's two codes.
///
/// # Errors
///
/// Returns [`CccdError::UnsupportedEra`] if `era` is outside 20-24.
pub fn code_for<R: Rng + ?Sized>(era: i32, sex: Option<Sex>, rng: &mut R) -> Result<u8, CccdError> {
    if let Some(sex) = sex {
        return code_for_sex(era, sex);
    }
    let era = Era::new(era)?;
    let candidates: Vec<u8> = ERA_SEX_TABLE
        .iter()
        .filter(|e| e.era == era)
        .map(|e| e.code)
        .collect();
    candidates
        .choose(rng)
        .copied()
        .ok_or(CccdError::UnsupportedEra { era: i32::from(era.value()) })
}

/// The code a correctly formed identifier carries for a holder of `sex`
/// born in `year`. `None` when the year is outside the supported range.
pub fn expected_code(year: i32, sex: Sex) -> Option<u8> {
    let era = Era::for_year(year).ok()?;
    code_for_sex(i32::from(era.value()), sex).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn table_has_ten_consecutive_codes() {
        assert_eq!(ERA_SEX_TABLE.len(), 10);
        for (i, e) in ERA_SEX_TABLE.iter().enumerate() {
            assert_eq!(usize::from(e.code), i);
        }
    }

    #[test]
    fn table_matches_parity_and_index_rules() {
        for e in &ERA_SEX_TABLE {
            assert_eq!(e.sex, Sex::from_parity(e.code));
            assert_eq!(e.era.value(), 20 + e.code / 2);
        }
    }

    #[test]
    fn decode_every_code() {
        assert_eq!(decode(0), EraSex::Known { era: Era(20), sex: Sex::Male });
        assert_eq!(decode(5), EraSex::Known { era: Era(22), sex: Sex::Female });
        assert_eq!(decode(9), EraSex::Known { era: Era(24), sex: Sex::Female });
    }

    #[test]
    fn decode_out_of_table_is_unknown() {
        assert_eq!(decode(10), EraSex::Unknown);
        assert_eq!(decode(u8::MAX), EraSex::Unknown);
        assert_eq!(decode(10).era(), None);
    }

    #[test]
    fn code_for_known_sex() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(code_for(20, Some(Sex::Male), &mut rng).unwrap(), 0);
        assert_eq!(code_for(21, Some(Sex::Female), &mut rng).unwrap(), 3);
        assert_eq!(code_for(22, Some(Sex::Female), &mut rng).unwrap(), 5);
        assert_eq!(code_for(24, Some(Sex::Male), &mut rng).unwrap(), 8);
    }

    #[test]
    fn code_for_unspecified_sex_covers_both_codes() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(code_for(23, None, &mut rng).unwrap());
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![6, 7]);
    }

    #[test]
    fn code_for_rejects_unsupported_era() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            code_for(19, None, &mut rng),
            Err(CccdError::UnsupportedEra { era: 19 })
        );
        assert_eq!(
            code_for(25, Some(Sex::Male), &mut rng),
            Err(CccdError::UnsupportedEra { era: 25 })
        );
    }

    #[test]
    fn era_for_year_boundaries() {
        assert_eq!(Era::for_year(1900).unwrap().value(), 20);
        assert_eq!(Era::for_year(1999).unwrap().value(), 20);
        assert_eq!(Era::for_year(2000).unwrap().value(), 21);
        assert_eq!(Era::for_year(2399).unwrap().value(), 24);
        assert_eq!(Era::for_year(1899), Err(CccdError::UnsupportedEra { era: 19 }));
        assert_eq!(Era::for_year(2400), Err(CccdError::UnsupportedEra { era: 25 }));
    }

    #[test]
    fn full_year_reconstruction() {
        assert_eq!(Era(20).full_year(90), 1990);
        assert_eq!(Era(21).full_year(0), 2000);
        assert_eq!(Era(22).full_year(50), 2150);
        assert_eq!(Era(24).last_year(), 2399);
    }

    #[test]
    fn expected_code_for_years() {
        assert_eq!(expected_code(1990, Sex::Male), Some(0));
        assert_eq!(expected_code(1990, Sex::Female), Some(1));
        assert_eq!(expected_code(2000, Sex::Male), Some(2));
        assert_eq!(expected_code(2150, Sex::Female), Some(5));
        assert_eq!(expected_code(2400, Sex::Male), None);
    }

    #[test]
    fn sex_parsing() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("Nữ".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("Nam".parse::<Sex>().unwrap(), Sex::Male);
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn era_serde_validates() {
        let era: Era = serde_json::from_str("22").unwrap();
        assert_eq!(era.value(), 22);
        assert!(serde_json::from_str::<Era>("25").is_err());
    }

    proptest! {
        /// decode(code_for(era, sex)) == (era, sex)
        #[test]
        fn encode_decode_symmetry(era in 20i32..=24, male in any::<bool>(), seed in any::<u64>()) {
            let sex = if male { Sex::Male } else { Sex::Female };
            let mut rng = StdRng::seed_from_u64(seed);
            let code = code_for(era, Some(sex), &mut rng).unwrap();
            let decoded = decode(code);
            prop_assert_eq!(decoded.era().map(|e| i32::from(e.value())), Some(era));
            prop_assert_eq!(decoded.sex(), Some(sex));
        }

        /// Codes chosen without a sex always decode to the requested era.
        #[test]
        fn random_sex_stays_in_era(era in 20i32..=24, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let code = code_for(era, None, &mut rng).unwrap();
            prop_assert_eq!(decode(code).era().map(|e| i32::from(e.value())), Some(era));
        }

        /// Every supported year maps back into its own era bracket.
        #[test]
        fn year_lies_within_its_era(year in MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR) {
            let era = Era::for_year(year).unwrap();
            prop_assert!(era.first_year() <= year && year <= era.last_year());
            prop_assert_eq!(era.full_year((year % 100) as u8), year);
        }
    }
}
