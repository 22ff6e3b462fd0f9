use crate::identifier::{BenchmarkIdentifier, Distribution};
use crate::report::RawRecord;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Bytes per mebibyte
pub const MIB: f64 = 1_048_576.0;

/// One measurement within a (distribution, algorithm) series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Input buffer size in bytes
    pub size: u64,
    /// Decoding throughput in MiB/s
    pub throughput: f64,
    /// Bytes decoded per clock cycle, 0.0 when not recorded
    pub bytes_per_cycle: f64,
}

/// All samples for one (distribution, algorithm) pair, sorted by size.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub distribution: Distribution,
    pub algorithm: String,
    pub samples: Vec<Sample>,
}

/// Record counts from one aggregation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total: usize,
    pub matched: usize,
    /// Names that did not decode
    pub unrecognized: usize,
    /// Decoded names without a usable `bytes_per_second`
    pub missing_throughput: usize,
}

impl AggregateStats {
    pub fn skipped(&self) -> usize {
        self.unrecognized + self.missing_throughput
    }
}

/// Benchmark samples grouped by distribution, then algorithm.
///
/// Series are stored flat and looked up through a composite key, so every
/// key present always has at least one sample.
#[derive(Debug, Clone, Default)]
pub struct AggregatedSeries {
    series: Vec<Series>,
    index: HashMap<(Distribution, String), usize>,
    /// Distributions in first-encounter order
    distributions: Vec<Distribution>,
}

impl AggregatedSeries {
    /// Group raw records into sorted series.
    ///
    /// Unrecognized names and records without a finite, non-negative
    /// throughput are skipped and only show up in the returned stats.
    /// Duplicate (distribution, algorithm, size) samples are all kept.
    pub fn from_records<'a, I>(records: I) -> (Self, AggregateStats)
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut aggregated = Self::default();
        let mut stats = AggregateStats::default();

        for record in records {
            stats.total += 1;

            let Some(id) = BenchmarkIdentifier::parse(&record.name) else {
                debug!(name = %record.name, "skipping unrecognized benchmark");
                stats.unrecognized += 1;
                continue;
            };

            let bytes_per_second = match record.bytes_per_second {
                Some(v) if v.is_finite() && v >= 0.0 => v,
                other => {
                    warn!(name = %record.name, bytes_per_second = ?other, "skipping benchmark without usable throughput");
                    stats.missing_throughput += 1;
                    continue;
                }
            };

            let bytes_per_cycle = record
                .bytes_per_cycle
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0);

            aggregated.insert(
                id.distribution,
                id.algorithm,
                Sample {
                    size: id.message_size,
                    throughput: bytes_per_second / MIB,
                    bytes_per_cycle,
                },
            );
            stats.matched += 1;
        }

        // Stable, so duplicate sizes keep their input order.
        for series in &mut aggregated.series {
            series.samples.sort_by_key(|s| s.size);
        }

        (aggregated, stats)
    }

    fn insert(&mut self, distribution: Distribution, algorithm: String, sample: Sample) {
        let key = (distribution, algorithm);
        if let Some(&idx) = self.index.get(&key) {
            self.series[idx].samples.push(sample);
            return;
        }

        if !self.distributions.contains(&distribution) {
            self.distributions.push(distribution);
        }

        let (distribution, algorithm) = key.clone();
        self.index.insert(key, self.series.len());
        self.series.push(Series {
            distribution,
            algorithm,
            samples: vec![sample],
        });
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of (distribution, algorithm) series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Distributions in the order they were first seen
    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    /// Algorithms measured under `distribution`, in first-seen order.
    pub fn algorithms(&self, distribution: &Distribution) -> Vec<&str> {
        self.series
            .iter()
            .filter(|s| &s.distribution == distribution)
            .map(|s| s.algorithm.as_str())
            .collect()
    }

    pub fn samples(&self, distribution: &Distribution, algorithm: &str) -> Option<&[Sample]> {
        self.index
            .get(&(*distribution, algorithm.to_string()))
            .map(|&idx| self.series[idx].samples.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    fn all_samples(&self) -> impl Iterator<Item = &Sample> {
        self.series.iter().flat_map(|s| s.samples.iter())
    }

    /// Largest throughput over every sample, if any.
    pub fn max_throughput(&self) -> Option<f64> {
        self.all_samples().map(|s| s.throughput).reduce(f64::max)
    }

    /// Smallest and largest message size over every sample, if any.
    pub fn size_bounds(&self) -> Option<(u64, u64)> {
        let min = self.all_samples().map(|s| s.size).min()?;
        let max = self.all_samples().map(|s| s.size).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str, bytes_per_second: f64) -> RawRecord {
        RawRecord::new(name, bytes_per_second)
    }

    #[test]
    fn test_example_scenario() {
        let records = vec![
            record("BM<vecshift, 90, 4, 3, 2, 1>/1024", 481_755_136.0),
            record("BM<scalar, 90, 4, 3, 2, 1>/1024", 255_620_096.0),
            record("BM_SetupOverhead", 1.0),
        ];
        let (series, stats) = AggregatedSeries::from_records(&records);

        assert_eq!(
            stats,
            AggregateStats {
                total: 3,
                matched: 2,
                unrecognized: 1,
                missing_throughput: 0,
            }
        );

        let dist = Distribution::new([90, 4, 3, 2, 1]);
        assert_eq!(series.distributions(), &[dist]);
        assert_eq!(series.algorithms(&dist), vec!["vecshift", "scalar"]);

        let vec = series.samples(&dist, "vecshift").unwrap();
        assert_eq!(vec.len(), 1);
        assert_eq!(vec[0].size, 1024);
        assert!((vec[0].throughput - 459.45).abs() < 0.01);

        let scalar = series.samples(&dist, "scalar").unwrap();
        assert!((scalar[0].throughput - 243.74).abs() < 0.01);

        assert!(series.samples(&dist, "BM_SetupOverhead").is_none());
    }

    #[test]
    fn test_samples_sorted_with_metrics_paired() {
        let mut records = vec![
            record("BM<scalar, 20, 20, 20, 20, 20>/4096", 4.0 * MIB),
            record("BM<scalar, 20, 20, 20, 20, 20>/1024", 1.0 * MIB),
            record("BM<scalar, 20, 20, 20, 20, 20>/2048", 2.0 * MIB),
        ];
        records[0].bytes_per_cycle = Some(0.4);
        records[1].bytes_per_cycle = Some(0.1);

        let (series, _) = AggregatedSeries::from_records(&records);
        let samples = series
            .samples(&Distribution::new([20; 5]), "scalar")
            .unwrap();

        let sizes: Vec<u64> = samples.iter().map(|s| s.size).collect();
        assert_eq!(sizes, vec![1024, 2048, 4096]);
        let throughput: Vec<f64> = samples.iter().map(|s| s.throughput).collect();
        assert_eq!(throughput, vec![1.0, 2.0, 4.0]);
        let per_cycle: Vec<f64> = samples.iter().map(|s| s.bytes_per_cycle).collect();
        assert_eq!(per_cycle, vec![0.1, 0.0, 0.4]);
    }

    #[test]
    fn test_duplicates_are_kept_in_input_order() {
        let records = vec![
            record("BM<scalar, 90, 4, 3, 2, 1>/1024", 2.0 * MIB),
            record("BM<scalar, 90, 4, 3, 2, 1>/512", 1.0 * MIB),
            record("BM<scalar, 90, 4, 3, 2, 1>/1024", 3.0 * MIB),
        ];
        let (series, stats) = AggregatedSeries::from_records(&records);
        assert_eq!(stats.matched, 3);

        let samples = series
            .samples(&Distribution::new([90, 4, 3, 2, 1]), "scalar")
            .unwrap();
        let pairs: Vec<(u64, f64)> = samples.iter().map(|s| (s.size, s.throughput)).collect();
        assert_eq!(pairs, vec![(512, 1.0), (1024, 2.0), (1024, 3.0)]);
    }

    #[test]
    fn test_missing_throughput_is_skipped() {
        let records = vec![
            RawRecord {
                name: "BM<scalar, 90, 4, 3, 2, 1>/1024".to_string(),
                bytes_per_second: None,
                bytes_per_cycle: None,
            },
            record("BM<scalar, 90, 4, 3, 2, 1>/2048", f64::NAN),
            record("BM<scalar, 90, 4, 3, 2, 1>/4096", -1.0),
        ];
        let (series, stats) = AggregatedSeries::from_records(&records);
        assert!(series.is_empty());
        assert_eq!(stats.missing_throughput, 3);
        assert_eq!(stats.skipped(), 3);
    }

    #[test]
    fn test_empty_input() {
        let (series, stats) = AggregatedSeries::from_records(&Vec::new());
        assert!(series.is_empty());
        assert!(series.distributions().is_empty());
        assert_eq!(series.max_throughput(), None);
        assert_eq!(series.size_bounds(), None);
        assert_eq!(stats, AggregateStats::default());
    }

    #[test]
    fn test_distribution_encounter_order() {
        let records = vec![
            record("BM<a, 50, 20, 10, 10, 10>/1024", MIB),
            record("BM<a, 95, 2, 1, 1, 1>/1024", MIB),
            record("BM<b, 50, 20, 10, 10, 10>/1024", MIB),
        ];
        let (series, _) = AggregatedSeries::from_records(&records);
        assert_eq!(
            series.distributions(),
            &[
                Distribution::new([50, 20, 10, 10, 10]),
                Distribution::new([95, 2, 1, 1, 1]),
            ]
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series.size_bounds(), Some((1024, 1024)));
    }

    fn arb_records() -> impl Strategy<Value = Vec<RawRecord>> {
        let algorithms = prop::sample::select(vec!["scalar", "vecshift", "maskshift"]);
        let dists = prop::sample::select(vec![[90, 4, 3, 2, 1], [20, 20, 20, 20, 20]]);
        // Sizes are distinct per bucket so the sorted order is fully determined.
        let sizes = prop::sample::subsequence((10u32..21).collect::<Vec<_>>(), 1..8);
        prop::collection::vec((algorithms, dists, sizes), 1..6).prop_map(|groups| {
            let mut seen = std::collections::HashSet::new();
            let mut records = Vec::new();
            for (algo, [d1, d2, d3, d4, d5], exps) in groups {
                if !seen.insert((algo, d1)) {
                    continue;
                }
                for exp in exps {
                    let size = 1u64 << exp;
                    records.push(RawRecord::new(
                        format!("BM<{algo}, {d1}, {d2}, {d3}, {d4}, {d5}>/{size}"),
                        (size as f64) * 1000.0 + f64::from(d1),
                    ));
                }
            }
            records
        })
    }

    proptest! {
        #[test]
        fn prop_shuffle_invariant(
            (records, shuffled) in arb_records()
                .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle()))
        ) {
            let (a, _) = AggregatedSeries::from_records(&records);
            let (b, _) = AggregatedSeries::from_records(&shuffled);

            prop_assert_eq!(a.len(), b.len());
            for series in a.iter() {
                let other = b.samples(&series.distribution, &series.algorithm);
                prop_assert_eq!(Some(series.samples.as_slice()), other);
                prop_assert!(series.samples.windows(2).all(|w| w[0].size < w[1].size));
            }
        }
    }
}
