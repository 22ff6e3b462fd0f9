use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Number of varint byte-lengths a distribution covers (1 through 5 bytes).
pub const DISTRIBUTION_LEN: usize = 5;

// `BM<algorithm, d1, d2, d3, d4, d5>/size`, anchored at both ends so that
// aggregate rows such as `.../1024_mean` are not mistaken for raw runs.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^BM<([^,]+),\s*([0-9]+),\s*([0-9]+),\s*([0-9]+),\s*([0-9]+),\s*([0-9]+)>/([0-9]+)$",
    )
    .expect("benchmark name pattern is valid")
});

/// Percentage mix of 1- through 5-byte varints in a benchmark input.
///
/// The components are not required to sum to 100; see [`Distribution::is_normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Distribution([u32; DISTRIBUTION_LEN]);

impl Distribution {
    pub fn new(components: [u32; DISTRIBUTION_LEN]) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[u32; DISTRIBUTION_LEN] {
        &self.0
    }

    /// Percentage of values that encode to a single byte
    pub fn one_byte(&self) -> u32 {
        self.0[0]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn is_normalized(&self) -> bool {
        self.total() == 100
    }

    /// Classify by how heavily the mix leans toward 1-byte values.
    pub fn class(&self) -> DistributionClass {
        let first = self.one_byte();
        if first >= 90 {
            DistributionClass::Heavily1Byte
        } else if first >= 80 {
            DistributionClass::Mostly1Byte
        } else if first >= 70 {
            DistributionClass::Skewed1Byte
        } else if self.0.iter().all(|&c| c == first) {
            DistributionClass::Uniform
        } else {
            DistributionClass::Mixed
        }
    }

    /// Human-readable panel title, e.g. `Heavily 1-byte (90-4-3-2-1)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.class().name(), self)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("-"))
    }
}

/// Coarse shape of a distribution, used for titles and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionClass {
    /// At least 90% 1-byte values
    Heavily1Byte,
    /// At least 80%
    Mostly1Byte,
    /// At least 70%
    Skewed1Byte,
    /// All five lengths equally likely
    Uniform,
    Mixed,
}

impl DistributionClass {
    pub fn name(&self) -> &'static str {
        match self {
            DistributionClass::Heavily1Byte => "Heavily 1-byte",
            DistributionClass::Mostly1Byte => "Mostly 1-byte",
            DistributionClass::Skewed1Byte => "Skewed 1-byte",
            DistributionClass::Uniform => "Uniform",
            DistributionClass::Mixed => "Mixed",
        }
    }
}

/// The semantic fields encoded in a benchmark name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BenchmarkIdentifier {
    /// Decoder variant under test. Opaque and case-sensitive.
    pub algorithm: String,
    pub distribution: Distribution,
    /// Input buffer size in bytes
    pub message_size: u64,
}

impl BenchmarkIdentifier {
    /// Decode a benchmark name.
    ///
    /// Returns `None` for anything that does not match the full
    /// `BM<algorithm, d1, d2, d3, d4, d5>/size` shape, including names whose
    /// numbers overflow or whose size is zero. Never panics.
    pub fn parse(name: &str) -> Option<Self> {
        let caps = NAME_PATTERN.captures(name)?;

        let algorithm = caps.get(1)?.as_str().to_string();

        let mut components = [0u32; DISTRIBUTION_LEN];
        for (i, slot) in components.iter_mut().enumerate() {
            *slot = caps.get(i + 2)?.as_str().parse().ok()?;
        }

        let message_size: u64 = caps.get(7)?.as_str().parse().ok()?;
        if message_size == 0 {
            return None;
        }

        Some(Self {
            algorithm,
            distribution: Distribution::new(components),
            message_size,
        })
    }
}

impl fmt::Display for BenchmarkIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d1, d2, d3, d4, d5] = self.distribution.0;
        write!(
            f,
            "BM<{}, {}, {}, {}, {}, {}>/{}",
            self.algorithm, d1, d2, d3, d4, d5, self.message_size
        )
    }
}
