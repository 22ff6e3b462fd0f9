pub mod aggregate;
pub mod chart;
pub mod identifier;
pub mod layout;
pub mod report;
pub mod speedup;
pub mod summary;

pub use aggregate::{AggregateStats, AggregatedSeries, Sample};
pub use identifier::{BenchmarkIdentifier, Distribution};
pub use layout::{LayoutConfig, RenderPlan};
pub use report::{LoadError, Report};
