//! `cccd generate`.

use std::path::Path;

use anyhow::{bail, Result};
use cccd_core::{GeneratorDefaults, JurisdictionCode, Limits, Sex};
use cccd_generator::{GenerationRequest, Generator};
use clap::Args;

use crate::output::emit;

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Jurisdiction codes to draw from (comma-separated or repeated).
    /// Defaults to every known jurisdiction.
    #[arg(long, value_delimiter = ',')]
    pub jurisdiction: Vec<JurisdictionCode>,

    /// Fixed holder sex (male|female). Random per identifier when unset.
    #[arg(long)]
    pub sex: Option<Sex>,

    /// First birth year (default: CCCD_BIRTH_YEAR_FROM or 1990).
    #[arg(long)]
    pub from: Option<i32>,

    /// Last birth year (default: CCCD_BIRTH_YEAR_TO or 2000).
    #[arg(long)]
    pub to: Option<i32>,

    /// Number of identifiers (default: CCCD_COUNT or 100).
    #[arg(long)]
    pub quantity: Option<usize>,

    /// Apply the batch generation ceiling instead of the single one.
    #[arg(long)]
    pub batch: bool,

    /// Skip re-verifying each generated identifier.
    #[arg(long)]
    pub no_validate: bool,

    /// RNG seed for reproducible output (default: CCCD_RANDOM_SEED).
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_generate(args: &GenerateArgs, output: Option<&Path>) -> Result<u8> {
    let limits = Limits::from_env()?;
    let defaults = GeneratorDefaults::from_env()?;
    let request = build_request(args, &defaults, &limits)?;

    let mut generator = match args.seed.or(defaults.seed) {
        Some(seed) => Generator::with_seed(seed),
        None => Generator::new(),
    }
    .limits(limits);

    let batch = generator.generate(&request);
    emit(&batch, output)?;
    Ok(if batch.failures().next().is_none() { 0 } else { 1 })
}

/// Merge command-line flags over environment defaults.
pub fn build_request(
    args: &GenerateArgs,
    defaults: &GeneratorDefaults,
    limits: &Limits,
) -> Result<GenerationRequest> {
    let quantity = args.quantity.unwrap_or(defaults.count);
    if quantity == 0 {
        bail!("--quantity must be at least 1");
    }
    if quantity > limits.max_quantity {
        tracing::warn!(
            quantity,
            max_quantity = limits.max_quantity,
            "--quantity above the maximum, output will be truncated"
        );
    }

    let from = args.from.unwrap_or(defaults.birth_year_from);
    let to = args.to.unwrap_or(defaults.birth_year_to);
    for year in [from, to] {
        if !(limits.min_birth_year..=limits.max_birth_year).contains(&year) {
            bail!(
                "birth year {year} is outside {}-{}",
                limits.min_birth_year,
                limits.max_birth_year
            );
        }
    }

    let mut request = GenerationRequest::new(quantity)
        .jurisdictions(args.jurisdiction.clone())
        .birth_years(from, to);
    if let Some(sex) = args.sex {
        request = request.sex(sex);
    }
    if args.batch {
        request = request.batch();
    }
    if args.no_validate {
        request = request.without_validation();
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cccd_core::Operation;

    #[test]
    fn defaults_fill_unset_flags() {
        let defaults = GeneratorDefaults {
            birth_year_from: 1970,
            birth_year_to: 1975,
            count: 7,
            seed: None,
        };
        let req = build_request(&GenerateArgs::default(), &defaults, &Limits::default()).unwrap();
        assert_eq!(req.quantity, 7);
        assert_eq!(req.birth_year_range, (1970, 1975));
        assert!(req.jurisdictions.is_empty());
        assert!(req.validate_output);
        assert_eq!(req.operation, Operation::GenerationSingle);
    }

    #[test]
    fn flags_override_defaults() {
        let args = GenerateArgs {
            jurisdiction: vec![JurisdictionCode::new("079").unwrap()],
            sex: Some(Sex::Female),
            from: Some(2150),
            to: Some(2150),
            quantity: Some(3),
            batch: true,
            no_validate: true,
            seed: Some(1),
        };
        let req = build_request(&args, &GeneratorDefaults::default(), &Limits::default()).unwrap();
        assert_eq!(req.quantity, 3);
        assert_eq!(req.sex, Some(Sex::Female));
        assert_eq!(req.birth_year_range, (2150, 2150));
        assert_eq!(req.operation, Operation::GenerationBatch);
        assert!(!req.validate_output);
    }

    #[test]
    fn rejects_out_of_range_input() {
        let defaults = GeneratorDefaults::default();
        let limits = Limits::default();
        let zero = GenerateArgs {
            quantity: Some(0),
            ..GenerateArgs::default()
        };
        assert!(build_request(&zero, &defaults, &limits).is_err());

        let ancient = GenerateArgs {
            from: Some(1850),
            ..GenerateArgs::default()
        };
        assert!(build_request(&ancient, &defaults, &limits).is_err());
    }

    #[test]
    fn oversized_quantity_is_truncated_not_rejected() {
        let limits = Limits {
            max_quantity: 4,
            ..Limits::default()
        };
        let huge = GenerateArgs {
            quantity: Some(limits.max_quantity + 1),
            ..GenerateArgs::default()
        };
        let req = build_request(&huge, &GeneratorDefaults::default(), &limits).unwrap();
        assert_eq!(req.quantity, 5);

        let batch = Generator::with_seed(1).limits(limits).generate(&req);
        assert!(batch.metadata.truncated);
        assert_eq!(batch.metadata.actual_quantity, 4);
        assert_eq!(batch.metadata.limit_warnings.len(), 1);
    }
}
