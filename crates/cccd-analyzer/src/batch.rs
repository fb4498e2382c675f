//! Batch analysis and histograms.
//!
//! Inputs beyond the `batch_analysis` ceiling are dropped, then results
//! beyond `max_results_per_request` are dropped; both are reported in
//! [`BatchLimits`]. Histograms count valid results only.

use std::collections::BTreeMap;

use cccd_core::{JurisdictionTable, Operation, OutputKind, Sex};
use serde::Serialize;

use crate::analyzer::{AnalyzeOptions, Analyzer};
use crate::result::AnalysisResult;

/// Age histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AgeBucket {
    #[serde(rename = "0-17")]
    Minor,
    #[serde(rename = "18-30")]
    YoungAdult,
    #[serde(rename = "31-45")]
    Adult,
    #[serde(rename = "46-60")]
    MiddleAged,
    #[serde(rename = "61+")]
    Senior,
}

impl AgeBucket {
    pub fn all() -> &'static [AgeBucket] {
        &[
            Self::Minor,
            Self::YoungAdult,
            Self::Adult,
            Self::MiddleAged,
            Self::Senior,
        ]
    }

    pub fn for_age(age: u32) -> Self {
        match age {
            0..=17 => Self::Minor,
            18..=30 => Self::YoungAdult,
            31..=45 => Self::Adult,
            46..=60 => Self::MiddleAged,
            _ => Self::Senior,
        }
    }
}

/// The jurisdiction seen most often among valid results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionCount {
    pub code: String,
    pub name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchLimits {
    pub input_limit: usize,
    pub output_limit: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Ties go to the lowest code.
    pub most_common_jurisdiction: Option<JurisdictionCount>,
    pub age_distribution: BTreeMap<AgeBucket, usize>,
    pub sex_distribution: BTreeMap<Sex, usize>,
}

/// Result of [`Analyzer::batch_analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchAnalysis {
    /// Inputs analyzed after the input ceiling. The counts, rate and
    /// summary cover all of them even when `results` is cut short.
    pub total_analyzed: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Percentage of analyzed inputs that are valid.
    pub validity_rate: f64,
    pub results: Vec<AnalysisResult>,
    pub limits: BatchLimits,
    pub summary: BatchSummary,
}

impl Analyzer {
    /// Analyze many inputs without the optional blocks.
    pub fn batch_analyze<S: AsRef<str>>(&self, inputs: &[S]) -> BatchAnalysis {
        let input = self.limits.check_input(Operation::BatchAnalysis, inputs.len());
        if input.truncated {
            tracing::warn!(
                requested = input.requested,
                limit = input.limit,
                "batch analysis input truncated"
            );
        }
        let accepted = &inputs[..input.allowed];

        let mut results: Vec<AnalysisResult> = accepted
            .iter()
            .map(|s| self.analyze(s.as_ref(), AnalyzeOptions::default()))
            .collect();

        // Counts and the summary cover every analyzed input; only the
        // returned result list is cut to the output ceiling.
        let total_analyzed = results.len();
        let valid_count = results.iter().filter(|r| r.valid).count();
        let invalid_count = total_analyzed - valid_count;
        let validity_rate = if total_analyzed == 0 {
            0.0
        } else {
            (valid_count as f64 / total_analyzed as f64 * 10_000.0).round() / 100.0
        };
        let summary = summarize(&results);

        let output = self
            .limits
            .check_output(OutputKind::MaxResultsPerRequest, results.len());
        if output.truncated {
            tracing::warn!(
                results = output.requested,
                limit = output.limit,
                "batch analysis output truncated"
            );
        }
        results.truncate(output.allowed);

        tracing::info!(
            total_analyzed,
            valid_count,
            invalid_count,
            validity_rate,
            "batch analysis complete"
        );

        BatchAnalysis {
            total_analyzed,
            valid_count,
            invalid_count,
            validity_rate,
            summary,
            limits: BatchLimits {
                input_limit: input.limit,
                output_limit: output.limit,
                truncated: input.truncated || output.truncated,
            },
            results,
        }
    }
}

fn summarize(results: &[AnalysisResult]) -> BatchSummary {
    let mut by_code: BTreeMap<&str, usize> = BTreeMap::new();
    let mut ages: BTreeMap<AgeBucket, usize> = AgeBucket::all().iter().map(|b| (*b, 0)).collect();
    let mut sexes: BTreeMap<Sex, usize> = Sex::all().iter().map(|s| (*s, 0)).collect();

    for r in results.iter().filter(|r| r.valid) {
        let Some(fields) = &r.fields else { continue };
        *by_code.entry(fields.jurisdiction.code.as_str()).or_insert(0) += 1;
        if let Some(age) = fields.birth_date.age {
            *ages.entry(AgeBucket::for_age(age)).or_insert(0) += 1;
        }
        if let Some(sex) = fields.era_sex.sex {
            *sexes.entry(sex).or_insert(0) += 1;
        }
    }

    // BTreeMap iterates in code order; keep the first maximum.
    let mut best: Option<(&str, usize)> = None;
    for (code, count) in &by_code {
        if best.map_or(true, |(_, c)| *count > c) {
            best = Some((code, *count));
        }
    }
    let most_common_jurisdiction = best.and_then(|(code, count)| {
        JurisdictionTable::global()
            .lookup(code)
            .map(|j| JurisdictionCount {
                code: code.to_string(),
                name: j.name,
                count,
            })
    });

    BatchSummary {
        most_common_jurisdiction,
        age_distribution: ages,
        sex_distribution: sexes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cccd_core::{checksum, Limits};
    use chrono::NaiveDate;

    fn analyzer() -> Analyzer {
        Analyzer::new().reference_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    fn with_check(body: &str) -> String {
        format!("{body}{}", checksum::compute_check_digit(body).unwrap())
    }

    #[test]
    fn counts_and_rate() {
        let inputs = vec![
            "001200011504".to_string(),
            with_check("07909505051"), // 1995 male, HCMC
            with_check("07919505051"), // 1995 female, HCMC
            "001200011505".to_string(),
            "".to_string(),
        ];
        let batch = analyzer().batch_analyze(&inputs);
        assert_eq!(batch.total_analyzed, 5);
        assert_eq!(batch.valid_count, 3);
        assert_eq!(batch.invalid_count, 2);
        assert_eq!(batch.validity_rate, 60.0);
        assert!(!batch.limits.truncated);
        assert_eq!(batch.results.len(), 5);

        let summary = &batch.summary;
        let top = summary.most_common_jurisdiction.as_ref().unwrap();
        assert_eq!(top.code, "079");
        assert_eq!(top.count, 2);
        assert_eq!(summary.sex_distribution[&Sex::Male], 2);
        assert_eq!(summary.sex_distribution[&Sex::Female], 1);
        // 2000-01-15 → 25, 1995-05-05 → 30
        assert_eq!(summary.age_distribution[&AgeBucket::YoungAdult], 3);
        assert_eq!(summary.age_distribution[&AgeBucket::Senior], 0);
    }

    #[test]
    fn ties_go_to_lowest_code() {
        let inputs = ["001200011504".to_string(), with_check("07909505051")];
        let batch = analyzer().batch_analyze(&inputs);
        assert_eq!(batch.summary.most_common_jurisdiction.unwrap().code, "001");
    }

    #[test]
    fn invalid_entries_are_not_counted_in_histograms() {
        let inputs = [with_check("00320001150")];
        let batch = analyzer().batch_analyze(&inputs);
        assert_eq!(batch.valid_count, 0);
        assert!(batch.summary.most_common_jurisdiction.is_none());
        assert!(batch.summary.sex_distribution.values().all(|n| *n == 0));
        assert!(batch.summary.age_distribution.values().all(|n| *n == 0));
    }

    #[test]
    fn input_ceiling_truncates() {
        let limits = Limits {
            batch_analysis: 2,
            ..Limits::default()
        };
        let inputs = vec!["001200011504"; 5];
        let batch = analyzer().limits(limits).batch_analyze(&inputs);
        assert_eq!(batch.total_analyzed, 2);
        assert_eq!(batch.results.len(), 2);
        assert!(batch.limits.truncated);
        assert_eq!(batch.limits.input_limit, 2);
    }

    #[test]
    fn output_ceiling_truncates() {
        let limits = Limits {
            max_results_per_request: 3,
            ..Limits::default()
        };
        let inputs = ["001200011504", "001200011504", "001200011504", "001200011505"];
        let batch = analyzer().limits(limits).batch_analyze(&inputs);
        assert_eq!(batch.total_analyzed, 4);
        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.valid_count, 3);
        assert_eq!(batch.invalid_count, 1);
        assert_eq!(batch.valid_count + batch.invalid_count, batch.total_analyzed);
        assert_eq!(batch.validity_rate, 75.0);
        assert!(batch.limits.truncated);
    }

    #[test]
    fn empty_batch() {
        let inputs: [&str; 0] = [];
        let batch = analyzer().batch_analyze(&inputs);
        assert_eq!(batch.total_analyzed, 0);
        assert_eq!(batch.validity_rate, 0.0);
    }

    #[test]
    fn age_buckets() {
        assert_eq!(AgeBucket::for_age(0), AgeBucket::Minor);
        assert_eq!(AgeBucket::for_age(17), AgeBucket::Minor);
        assert_eq!(AgeBucket::for_age(18), AgeBucket::YoungAdult);
        assert_eq!(AgeBucket::for_age(45), AgeBucket::Adult);
        assert_eq!(AgeBucket::for_age(60), AgeBucket::MiddleAged);
        assert_eq!(AgeBucket::for_age(61), AgeBucket::Senior);
    }

    #[test]
    fn histogram_keys_serialize_as_labels() {
        let batch = analyzer().batch_analyze(&["001200011504"]);
        let json = serde_json::to_value(&batch.summary).unwrap();
        assert_eq!(json["age_distribution"]["18-30"], 1);
        assert_eq!(json["sex_distribution"]["male"], 1);
    }
}
