use crate::aggregate::{AggregateStats, AggregatedSeries};
use crate::chart::format_size;
use crate::layout::RenderPlan;
use crate::report::Context;
use crate::speedup::SpeedupTable;
use tracing::warn;

/// Print run metadata and the distributions found in the report
pub fn print_summary(
    context: &Context,
    series: &AggregatedSeries,
    plan: &RenderPlan,
    stats: &AggregateStats,
) {
    println!("Host: {}", context.host());
    println!("Date: {}", context.date.as_deref().unwrap_or("unknown"));
    if let (Some(cpus), Some(mhz)) = (context.num_cpus, context.mhz_per_cpu) {
        println!("CPUs: {} @ {} MHz", cpus, mhz);
    }
    println!(
        "Parsed {} of {} benchmark(s) ({} skipped)",
        stats.matched,
        stats.total,
        stats.skipped()
    );

    println!("Found {} distribution(s):", plan.distribution_order.len());
    for dist in &plan.distribution_order {
        println!("  {}: {}", dist.label(), series.algorithms(dist).join(", "));
    }

    for dist in plan.distribution_order.iter().filter(|d| !d.is_normalized()) {
        warn!(distribution = %dist, total = dist.total(), "distribution does not sum to 100");
    }
}

/// Print per-distribution speedups against the baseline algorithm
pub fn print_speedups(table: &SpeedupTable) {
    println!("\n{:=<80}", "");
    println!("Speedup vs {}", table.baseline);
    println!("{:=<80}", "");

    for row in &table.rows {
        println!("\n{}", row.distribution.label());
        println!("  {:<20} {:>10} {:>10} {:>10}", "Algorithm", "Mean", "Peak", "@ Size");
        println!("  {:-<54}", "");

        if row.comparisons.is_empty() {
            println!("  (no other algorithms)");
            continue;
        }

        for cmp in &row.comparisons {
            match (cmp.mean(), cmp.peak()) {
                (Some(mean), Some(peak)) => println!(
                    "  {:<20} {:>9.2}x {:>9.2}x {:>10}",
                    cmp.algorithm,
                    mean,
                    peak.ratio,
                    format_size(peak.size as f64)
                ),
                _ => println!("  {:<20} {:>10}", cmp.algorithm, "n/a"),
            }
        }
    }
}
