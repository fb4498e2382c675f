//! Generation requests.

use cccd_core::{JurisdictionCode, Operation, Sex};
use serde::{Deserialize, Serialize};

/// Default birth-year range when none is given.
pub const DEFAULT_BIRTH_YEARS: (i32, i32) = (1990, 2000);

/// Parameters for a random batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Jurisdictions to draw from. Empty means every known jurisdiction.
    #[serde(default)]
    pub jurisdictions: Vec<JurisdictionCode>,
    /// Fixed sex, or `None` for a uniform choice per identifier.
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Inclusive birth-year range. Inverted bounds are swapped.
    #[serde(default = "default_birth_years")]
    pub birth_year_range: (i32, i32),
    pub quantity: usize,
    /// Re-verify every identifier after assembly.
    #[serde(default = "default_true")]
    pub validate_output: bool,
    /// Selects the input ceiling: `generation_single` or `generation_batch`.
    #[serde(default = "default_operation")]
    pub operation: Operation,
}

fn default_birth_years() -> (i32, i32) {
    DEFAULT_BIRTH_YEARS
}

fn default_true() -> bool {
    true
}

fn default_operation() -> Operation {
    Operation::GenerationSingle
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            jurisdictions: Vec::new(),
            sex: None,
            birth_year_range: DEFAULT_BIRTH_YEARS,
            quantity: 100,
            validate_output: true,
            operation: Operation::GenerationSingle,
        }
    }
}

impl GenerationRequest {
    pub fn new(quantity: usize) -> Self {
        Self {
            quantity,
            ..Self::default()
        }
    }

    pub fn jurisdictions(mut self, codes: Vec<JurisdictionCode>) -> Self {
        self.jurisdictions = codes;
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn birth_years(mut self, from: i32, to: i32) -> Self {
        self.birth_year_range = (from, to);
        self
    }

    pub fn without_validation(mut self) -> Self {
        self.validate_output = false;
        self
    }

    /// Use the `generation_batch` ceiling.
    pub fn batch(mut self) -> Self {
        self.operation = Operation::GenerationBatch;
        self
    }

    /// The birth-year range with bounds in ascending order.
    pub fn normalized_years(&self) -> (i32, i32) {
        let (a, b) = self.birth_year_range;
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Fully explicit fields for a single identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitFields {
    pub jurisdiction: JurisdictionCode,
    pub sex: Sex,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Drawn two-digit sequence, 0-99. Only its first digit survives.
    pub sequence: u32,
}
