use crate::aggregate::AggregatedSeries;
use crate::identifier::Distribution;
use std::collections::BTreeSet;

/// Configuration for render planning
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Step the shared value axis is rounded to, in MiB/s
    pub granularity: f64,
    /// Panels per grid row
    pub columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            granularity: 50.0,
            columns: 2,
        }
    }
}

/// Panel grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: usize,
    pub columns: usize,
}

impl GridShape {
    /// Smallest grid with `columns` columns that holds `panels` panels.
    pub fn for_panels(panels: usize, columns: usize) -> Self {
        let columns = columns.max(1);
        Self {
            rows: panels.div_ceil(columns),
            columns,
        }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Everything renderers need to lay out a multi-panel figure consistently.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Panel order, most 1-byte-heavy first
    pub distribution_order: Vec<Distribution>,
    /// Every algorithm label, sorted; its index picks color and marker
    pub algorithm_order: Vec<String>,
    /// Upper bound of the value axis shared by all panels
    pub shared_axis_max: f64,
    pub grid: GridShape,
    /// Smallest and largest message size across all samples
    pub size_range: Option<(u64, u64)>,
}

impl RenderPlan {
    pub fn new(series: &AggregatedSeries, config: &LayoutConfig) -> Self {
        // sort_by is stable: equal 1-byte shares keep encounter order.
        let mut distribution_order = series.distributions().to_vec();
        distribution_order.sort_by(|a, b| b.one_byte().cmp(&a.one_byte()));

        let algorithm_order: Vec<String> = series
            .iter()
            .map(|s| s.algorithm.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let shared_axis_max =
            shared_axis_max(series.max_throughput().unwrap_or(0.0), config.granularity);

        Self {
            grid: GridShape::for_panels(distribution_order.len(), config.columns),
            distribution_order,
            algorithm_order,
            shared_axis_max,
            size_range: series.size_bounds(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distribution_order.is_empty()
    }

    pub fn algorithm_index(&self, algorithm: &str) -> Option<usize> {
        self.algorithm_order.iter().position(|a| a == algorithm)
    }

    /// Grid cells that have no panel to show
    pub fn hidden_cells(&self) -> std::ops::Range<usize> {
        self.distribution_order.len()..self.grid.cells()
    }
}

/// Round `max` up to a multiple of `granularity`, then add one more step of headroom.
pub fn shared_axis_max(max: f64, granularity: f64) -> f64 {
    (max / granularity).ceil() * granularity + granularity
}
