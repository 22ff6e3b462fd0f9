use crate::aggregate::{AggregatedSeries, Sample};
use crate::identifier::Distribution;
use crate::layout::RenderPlan;

/// Throughput ratio of one algorithm against the baseline at a single size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRatio {
    pub size: u64,
    pub ratio: f64,
}

/// An algorithm compared against the baseline within one distribution
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub algorithm: String,
    pub ratios: Vec<SizeRatio>,
}

impl Comparison {
    pub fn mean(&self) -> Option<f64> {
        if self.ratios.is_empty() {
            return None;
        }
        Some(self.ratios.iter().map(|r| r.ratio).sum::<f64>() / self.ratios.len() as f64)
    }

    /// Largest ratio and the size it was measured at
    pub fn peak(&self) -> Option<SizeRatio> {
        self.ratios
            .iter()
            .copied()
            .reduce(|best, r| if r.ratio > best.ratio { r } else { best })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSpeedup {
    pub distribution: Distribution,
    pub comparisons: Vec<Comparison>,
}

/// Speedups of every algorithm relative to a baseline, per distribution
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedupTable {
    pub baseline: String,
    pub rows: Vec<DistributionSpeedup>,
}

impl SpeedupTable {
    /// Compare against `baseline` in plan order.
    ///
    /// Returns `None` when the baseline was never measured. Distributions
    /// lacking the baseline are left out, and sizes where the baseline
    /// throughput is zero produce no ratio.
    pub fn compute(series: &AggregatedSeries, plan: &RenderPlan, baseline: &str) -> Option<Self> {
        plan.algorithm_index(baseline)?;

        let rows = plan
            .distribution_order
            .iter()
            .filter_map(|dist| {
                let base = series.samples(dist, baseline)?;
                let comparisons = plan
                    .algorithm_order
                    .iter()
                    .filter(|algo| algo.as_str() != baseline)
                    .filter_map(|algo| {
                        let samples = series.samples(dist, algo)?;
                        Some(Comparison {
                            algorithm: algo.clone(),
                            ratios: ratios(samples, base),
                        })
                    })
                    .collect();
                Some(DistributionSpeedup {
                    distribution: *dist,
                    comparisons,
                })
            })
            .collect();

        Some(Self {
            baseline: baseline.to_string(),
            rows,
        })
    }
}

// Both inputs are sorted by size; with duplicate sizes the first sample wins.
fn ratios(samples: &[Sample], base: &[Sample]) -> Vec<SizeRatio> {
    let mut out: Vec<SizeRatio> = Vec::new();
    for sample in samples {
        if out.last().is_some_and(|r| r.size == sample.size) {
            continue;
        }
        let Some(reference) = base.iter().find(|b| b.size == sample.size) else {
            continue;
        };
        if reference.throughput > 0.0 {
            out.push(SizeRatio {
                size: sample.size,
                ratio: sample.throughput / reference.throughput,
            });
        }
    }
    out
}
