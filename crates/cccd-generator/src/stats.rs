//! Generator statistics and batch KPIs.

use serde::Serialize;

/// Cumulative counters owned by one generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorStats {
    pub total_generated: u64,
    pub valid: u64,
    pub invalid: u64,
    pub checksum_errors: u64,
    pub era_errors: u64,
    pub jurisdiction_errors: u64,
    pub duplicate_sequences: u64,
}

/// Quality indicators for one batch.
///
/// `rpn` is a risk priority number, severity × occurrence × detection.
/// Severity is 10 below 95 % coverage, 5 below 99 %, otherwise 1;
/// occurrence is 10 if the batch holds any invalid record, otherwise 1;
/// detection is fixed at 5.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub valid_count: usize,
    pub invalid_count: usize,
    pub coverage_rate: f64,
    pub rpn: u32,
    pub reliability_index: f64,
    pub accuracy_rate: f64,
    /// Identifiers per second.
    pub generation_speed: f64,
}

const DETECTION: u32 = 5;

impl Kpis {
    pub fn compute(valid: usize, total: usize, elapsed_secs: f64) -> Self {
        if total == 0 {
            return Self {
                valid_count: 0,
                invalid_count: 0,
                coverage_rate: 0.0,
                rpn: 0,
                reliability_index: 0.0,
                accuracy_rate: 0.0,
                generation_speed: 0.0,
            };
        }
        let invalid = total - valid;
        let coverage = valid as f64 / total as f64 * 100.0;
        let severity = if coverage < 95.0 {
            10
        } else if coverage < 99.0 {
            5
        } else {
            1
        };
        let occurrence = if invalid > 0 { 10 } else { 1 };
        let rpn = severity * occurrence * DETECTION;
        let reliability = (coverage - f64::from(rpn) / 10.0).min(100.0);
        let speed = if elapsed_secs > 0.0 {
            total as f64 / elapsed_secs
        } else {
            0.0
        };
        Self {
            valid_count: valid,
            invalid_count: invalid,
            coverage_rate: round2(coverage),
            rpn,
            reliability_index: round2(reliability),
            accuracy_rate: round2(coverage),
            generation_speed: round2(speed),
        }
    }
}

/// Snapshot returned by `Generator::performance_report`.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub stats: GeneratorStats,
    pub registry_size: usize,
    pub registry_keys: usize,
    pub jurisdiction_coverage: usize,
    pub supported_eras: Vec<u8>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
